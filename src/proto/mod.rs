//! 协议层实现
//!
//! 目前只有 UDP 变体承载真正的二进制分帧逻辑；链条端点的直通层
//! 见 `stack` 模块。

mod segment;
mod udp;

pub use segment::{HEADER_BITS, HEADER_LEN, MAX_PAYLOAD, UdpSegment};
pub use udp::UdpProtocol;
