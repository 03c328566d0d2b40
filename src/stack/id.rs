//! 标识符类型
//!
//! 定义协议层在链内的句柄。

/// 层标识符：所属 [`Chain`](super::Chain) 中的位置下标。
/// 只表示拓扑，不拥有所指的层。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);
