//! 协议链与构建器
//!
//! [`Chain`] 拥有所有层并负责把 `LayerId` 解析成具体的层；
//! [`ChainBuilder`] 在首次使用前一次性完成全部接线。

use tracing::{debug, trace};

use crate::error::{Result, StackError};

use super::id::LayerId;
use super::passthrough::Passthrough;
use super::protocol::Protocol;

/// 协议链：层的容器与链接解析者。
///
/// 层的生命周期归链所有；层之间只通过下标互相引用，重新装配
/// 不会产生悬空链接，最多产生能被识别的失效句柄。
#[derive(Debug, Default)]
pub struct Chain {
    layers: Vec<Box<dyn Protocol>>,
}

impl Chain {
    /// 手工装配入口：按给定顺序收养各层，不设置任何链接。
    /// 推荐路径是 [`ChainBuilder`]。
    pub fn from_layers(layers: Vec<Box<dyn Protocol>>) -> Chain {
        Chain { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// 取某层；越界下标视为失效句柄。
    pub fn layer(&self, id: LayerId) -> Result<&dyn Protocol> {
        self.layers
            .get(id.0)
            .map(|layer| layer.as_ref())
            .ok_or_else(|| {
                StackError::InternalFailure(format!("layer handle {} out of range", id.0))
            })
    }

    /// 取某层的可变引用（用于重绑链接）。
    pub fn layer_mut(&mut self, id: LayerId) -> Result<&mut (dyn Protocol + '_)> {
        match self.layers.get_mut(id.0) {
            Some(layer) => Ok(layer.as_mut()),
            None => Err(StackError::InternalFailure(format!(
                "layer handle {} out of range",
                id.0
            ))),
        }
    }

    /// 在 `id` 层进入封装方向。
    pub fn encapsulate_at(&self, id: LayerId, upper: &[u8]) -> Result<Vec<u8>> {
        self.layer(id)?.encapsulate(upper, self)
    }

    /// 在 `id` 层进入解封装方向。
    pub fn decapsulate_at(&self, id: LayerId, lower: &[u8]) -> Result<Vec<u8>> {
        self.layer(id)?.decapsulate(lower, self)
    }

    /// 顶层封装入口：载荷沿链向下，产出线缆字节。
    #[tracing::instrument(skip(self, payload), fields(payload_bytes = payload.len(), layers = self.layers.len()))]
    pub fn transmit(&self, payload: &[u8]) -> Result<Vec<u8>> {
        if self.layers.is_empty() {
            return Err(StackError::invalid("chain has no layers"));
        }
        debug!("自顶层开始封装");
        let wire = self.encapsulate_at(LayerId(0), payload)?;
        trace!(wire_bytes = wire.len(), "封装完成");
        Ok(wire)
    }

    /// 底层解封装入口：线缆字节沿链向上，还原原始载荷。
    #[tracing::instrument(skip(self, wire), fields(wire_bytes = wire.len(), layers = self.layers.len()))]
    pub fn receive(&self, wire: &[u8]) -> Result<Vec<u8>> {
        if self.layers.is_empty() {
            return Err(StackError::invalid("chain has no layers"));
        }
        debug!("自底层开始解封装");
        let payload = self.decapsulate_at(LayerId(self.layers.len() - 1), wire)?;
        trace!(payload_bytes = payload.len(), "解封装完成");
        Ok(payload)
    }
}

/// 链构建器：按自顶向下的顺序收集各层，`build` 时统一接线。
///
/// 构建出的链两端各有一个直通层，中间每一层的 next/previous 因此
/// 都已设置，不存在接了一半就能被调用的链。
#[derive(Debug, Default)]
pub struct ChainBuilder {
    layers: Vec<Box<dyn Protocol>>,
}

impl ChainBuilder {
    pub fn new() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// 追加一层，靠近应用侧的先推入。
    pub fn push(mut self, layer: Box<dyn Protocol>) -> ChainBuilder {
        self.layers.push(layer);
        self
    }

    /// 接线并产出完整链。
    pub fn build(self) -> Result<Chain> {
        if self.layers.is_empty() {
            return Err(StackError::invalid("chain builder: no layers"));
        }

        let mut layers: Vec<Box<dyn Protocol>> = Vec::with_capacity(self.layers.len() + 2);
        layers.push(Box::new(Passthrough::new()));
        layers.extend(self.layers);
        layers.push(Box::new(Passthrough::new()));

        let last = layers.len() - 1;
        for i in 0..last {
            layers[i].set_next(LayerId(i + 1));
        }
        for i in 1..=last {
            layers[i].set_previous(LayerId(i - 1));
        }

        debug!(layers = layers.len(), "协议链装配完成");
        Ok(Chain { layers })
    }
}
