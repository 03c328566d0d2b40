//! Minimal HTTP/1.0 request formatting, used as a payload producer for
//! the protocol chain. String templating only, no real HTTP semantics.

use crate::error::{Result, StackError};

use super::Pdu;

/// Request methods understood by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// HTTP/1.0 request: request line, Host header, a Content-Length header
/// for POST only, then the raw body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: HttpMethod,
    path: String,
    host: String,
    body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        host: impl Into<String>,
        body: Vec<u8>,
    ) -> Result<HttpRequest> {
        let path = path.into();
        let host = host.into();
        if path.is_empty() || host.is_empty() {
            return Err(StackError::invalid(
                "http request: path and host must be non-empty",
            ));
        }
        Ok(HttpRequest {
            method,
            path,
            host,
            body,
        })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// ASCII header bytes, up to and including the blank line.
    pub fn header(&self) -> Vec<u8> {
        let mut header = format!(
            "{} {} HTTP/1.0\r\nHost: {}\r\n",
            self.method.as_str(),
            self.path,
            self.host
        );
        if self.method == HttpMethod::Post {
            header.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        }
        header.push_str("\r\n");
        header.into_bytes()
    }
}

impl Pdu for HttpRequest {
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header();
        out.extend_from_slice(&self.body);
        out
    }
}
