use serde::{Deserialize, Serialize};
use tracing::info;

use crate::addr::Port;
use crate::error::{Result, StackError};
use crate::pdu::{HttpMethod, HttpRequest, Pdu};
use crate::proto::UdpProtocol;
use crate::stack::{Chain, ChainBuilder};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub meta: Option<ScenarioMeta>,
    pub transport: TransportSpec,
    pub exchanges: Vec<ExchangeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSpec {
    /// Max payload bytes per segment.
    pub mss: usize,
    pub source_port: u32,
    pub destination_port: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MethodSpec {
    Get,
    Post,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeSpec {
    /// Defaults to GET when absent.
    #[serde(default)]
    pub method: Option<MethodSpec>,
    pub host: String,
    pub path: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeReport {
    pub payload_bytes: usize,
    pub wire_bytes: usize,
    pub segments: usize,
    pub round_trip_ok: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub exchanges: Vec<ExchangeReport>,
}

/// Build the symmetric chain described by the transport spec: one UDP
/// layer sealed between the builder's passthrough endpoints.
pub fn build_chain(transport: &TransportSpec) -> Result<Chain> {
    let source = spec_port(transport.source_port)?;
    let destination = spec_port(transport.destination_port)?;
    let udp = UdpProtocol::new(transport.mss, source, destination)?;
    ChainBuilder::new().push(Box::new(udp)).build()
}

fn spec_port(value: u32) -> Result<Port> {
    if value > u32::from(u16::MAX) {
        return Err(StackError::invalid(format!("port out of range: {value}")));
    }
    Ok(Port::new(value as u16))
}

fn request_from_spec(exchange: &ExchangeSpec) -> Result<HttpRequest> {
    let method = match exchange.method.unwrap_or(MethodSpec::Get) {
        MethodSpec::Get => HttpMethod::Get,
        MethodSpec::Post => HttpMethod::Post,
    };
    let body = exchange.body.clone().unwrap_or_default().into_bytes();
    HttpRequest::new(method, exchange.path.clone(), exchange.host.clone(), body)
}

/// Run every exchange through its own freshly built chain and report
/// per-exchange stats. One chain per logical exchange.
pub fn run_scenario(spec: &ScenarioSpec) -> Result<ScenarioReport> {
    let mut exchanges = Vec::with_capacity(spec.exchanges.len());
    for (i, exchange) in spec.exchanges.iter().enumerate() {
        let chain = build_chain(&spec.transport)?;
        let request = request_from_spec(exchange)?;
        let payload = request.to_bytes();

        let wire = chain.transmit(&payload)?;
        let restored = chain.receive(&wire)?;

        let segments = payload.len().div_ceil(spec.transport.mss);
        let round_trip_ok = restored == payload;
        info!(
            exchange = i,
            payload_bytes = payload.len(),
            wire_bytes = wire.len(),
            segments,
            round_trip_ok,
            "exchange complete"
        );
        exchanges.push(ExchangeReport {
            payload_bytes: payload.len(),
            wire_bytes: wire.len(),
            segments,
            round_trip_ok,
        });
    }
    Ok(ScenarioReport { exchanges })
}
