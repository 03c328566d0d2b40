//! 协议链模块
//!
//! 协议层通过 next/previous 链接组成栈；封装自顶向下，解封装自底向上。
//! 链接是链内下标，拓扑归 [`Chain`] 所有，层之间互不持有。

// 子模块声明
mod chain;
mod id;
mod passthrough;
mod protocol;

// 重新导出公共接口
pub use chain::{Chain, ChainBuilder};
pub use id::LayerId;
pub use passthrough::Passthrough;
pub use protocol::Protocol;
