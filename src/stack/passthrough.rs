//! 直通层
//!
//! 不加帧也不剥帧的协议层。构建器把它放在链条两端作为递归的终点；
//! 位于链条中间时按原样转发。

use crate::error::{Result, StackError};

use super::chain::Chain;
use super::id::LayerId;
use super::protocol::Protocol;

/// 直通层。行进方向上没有链接时直接返回缓冲本身。
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough {
    next: Option<LayerId>,
    previous: Option<LayerId>,
}

impl Passthrough {
    pub fn new() -> Passthrough {
        Passthrough::default()
    }
}

impl Protocol for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn encapsulate(&self, upper: &[u8], chain: &Chain) -> Result<Vec<u8>> {
        if upper.is_empty() {
            return Err(StackError::invalid("passthrough: payload is empty"));
        }
        match self.next {
            Some(id) => chain.encapsulate_at(id, upper),
            None => Ok(upper.to_vec()),
        }
    }

    fn decapsulate(&self, lower: &[u8], chain: &Chain) -> Result<Vec<u8>> {
        if lower.is_empty() {
            return Err(StackError::invalid("passthrough: payload is empty"));
        }
        match self.previous {
            Some(id) => chain.decapsulate_at(id, lower),
            None => Ok(lower.to_vec()),
        }
    }

    fn next(&self) -> Option<LayerId> {
        self.next
    }

    fn previous(&self) -> Option<LayerId> {
        self.previous
    }

    fn set_next(&mut self, link: LayerId) {
        self.next = Some(link);
    }

    fn set_previous(&mut self, link: LayerId) {
        self.previous = Some(link);
    }

    fn boxed_copy(&self) -> Box<dyn Protocol> {
        Box::new(Passthrough::new())
    }
}
