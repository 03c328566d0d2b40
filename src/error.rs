//! 错误类型
//!
//! 定义协议栈操作的错误分类与 Result 别名。

use thiserror::Error;

/// 协议栈操作的 Result 别名
pub type Result<T> = std::result::Result<T, StackError>;

/// 链路方向（用于 MissingLink 的报错信息）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    /// 向下（封装方向）的邻居
    Next,
    /// 向上（解封装方向）的邻居
    Previous,
}

impl std::fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkDirection::Next => write!(f, "next"),
            LinkDirection::Previous => write!(f, "previous"),
        }
    }
}

/// 协议栈错误分类
///
/// 所有错误都在检测点同步抛出并中止整个调用，没有部分成功。
#[derive(Debug, Error)]
pub enum StackError {
    /// 非法参数：空载荷、越界数值、格式错误的地址字符串
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// 链路未配置就调用了 encapsulate/decapsulate
    #[error("{layer}: {direction} link is not set")]
    MissingLink {
        layer: &'static str,
        direction: LinkDirection,
    },

    /// 字节流无法解析为合法的段序列
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// 组装输出或解析链接句柄时的意外失败
    #[error("internal failure: {0}")]
    InternalFailure(String),
}

impl StackError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        StackError::InvalidArgument(msg.into())
    }

    pub(crate) fn malformed<S: Into<String>>(msg: S) -> Self {
        StackError::MalformedFrame(msg.into())
    }
}
