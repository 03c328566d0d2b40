//! 地址类型
//!
//! 定长、带校验的二进制标识符：端口与 IPv4 地址。
//! 字符串构造失败即报错；转字节总是成功；按原始数值比较。

mod ipv4;
mod port;

pub use ipv4::Ipv4Address;
pub use port::Port;
