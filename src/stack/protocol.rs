//! 协议层契约
//!
//! 栈中每一层都要满足的双向接口。

use std::fmt;

use crate::error::Result;

use super::chain::Chain;
use super::id::LayerId;

/// 协议层接口
///
/// 封装方向：包上本层的帧并把结果交给 `next` 层，返回值就是更下层
/// 返回的字节（本层对下层的产物保持透明）。解封装方向与之对称。
/// 两个方向都在空输入时报 `InvalidArgument`，在对应链接未设置时报
/// `MissingLink`。
pub trait Protocol: fmt::Debug + Send {
    /// 层名称（用于日志与报错）
    fn name(&self) -> &'static str;

    /// 自顶向下：加帧并转发给 `next`。
    fn encapsulate(&self, upper: &[u8], chain: &Chain) -> Result<Vec<u8>>;

    /// 自底向上：剥帧并转发给 `previous`。
    fn decapsulate(&self, lower: &[u8], chain: &Chain) -> Result<Vec<u8>>;

    /// 下方邻居
    fn next(&self) -> Option<LayerId>;

    /// 上方邻居
    fn previous(&self) -> Option<LayerId>;

    /// 重绑下方邻居。不做环路或唯一性检查，装配正确性由调用方负责。
    fn set_next(&mut self, link: LayerId);

    /// 重绑上方邻居。
    fn set_previous(&mut self, link: LayerId);

    /// 配置相同但未链接的新实例。
    fn boxed_copy(&self) -> Box<dyn Protocol>;
}
