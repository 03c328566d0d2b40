//! 端口地址
//!
//! 传输层端口（0–65535），大端 2 字节格式。

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StackError};

/// 传输层端口。相等与排序都按原始数值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(u16);

impl Port {
    /// 字节长度（大端 2 字节）
    pub const LENGTH: usize = 2;

    pub fn new(value: u16) -> Port {
        Port(value)
    }

    /// 端口数值
    pub fn value(&self) -> u16 {
        self.0
    }

    /// 转为大端 2 字节
    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        self.0.to_be_bytes()
    }

    /// 从恰好 2 字节（大端）还原
    pub fn from_bytes(data: &[u8]) -> Result<Port> {
        if data.len() != Self::LENGTH {
            return Err(StackError::invalid(format!(
                "port: expected {} bytes but received {}",
                Self::LENGTH,
                data.len()
            )));
        }
        Ok(Port(u16::from_be_bytes([data[0], data[1]])))
    }
}

impl FromStr for Port {
    type Err = StackError;

    /// 解析十进制端口字符串。先按宽整数解析再检查 0–65535 范围，
    /// "-1" 与 "65536" 都报越界。
    fn from_str(s: &str) -> Result<Port> {
        let trimmed = s.trim();
        let parsed: i64 = trimmed
            .parse()
            .map_err(|_| StackError::invalid(format!("invalid port format: {trimmed:?}")))?;
        if !(0..=i64::from(u16::MAX)).contains(&parsed) {
            return Err(StackError::invalid(format!("port out of range: {parsed}")));
        }
        Ok(Port(parsed as u16))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
