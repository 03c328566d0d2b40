//! UDP（简化版）协议层
//!
//! 协议链里仅有的真正分帧逻辑：
//! - 封装：把任意长度载荷按 MSS 切块，逐块加 8 字节头后拼接
//! - 解封装：按头部位长字段重新分帧、按序号排序并还原原始字节流
//!
//! 注意：这是教学用的“极简 UDP”，不做校验和/重传/丢包检测。

use tracing::{debug, trace};

use crate::addr::Port;
use crate::error::{LinkDirection, Result, StackError};
use crate::stack::{Chain, LayerId, Protocol};

use super::segment::{self, UdpSegment};

/// UDP 协议层。只持有配置与链接，载荷不落地、只随调用流动。
#[derive(Debug, Clone)]
pub struct UdpProtocol {
    source_port: Port,
    destination_port: Port,
    mss: usize,
    next: Option<LayerId>,
    previous: Option<LayerId>,
}

impl UdpProtocol {
    /// `mss` 为每段最大载荷字节数，必须在 1..=`MAX_PAYLOAD` 内，
    /// 保证切出的每一段都能编码。
    pub fn new(mss: usize, source_port: Port, destination_port: Port) -> Result<UdpProtocol> {
        if mss == 0 {
            return Err(StackError::invalid("udp: segment size must be positive"));
        }
        if mss > segment::MAX_PAYLOAD {
            return Err(StackError::invalid(format!(
                "udp: segment size {mss} exceeds the {} byte maximum",
                segment::MAX_PAYLOAD
            )));
        }
        Ok(UdpProtocol {
            source_port,
            destination_port,
            mss,
            next: None,
            previous: None,
        })
    }

    pub fn mss(&self) -> usize {
        self.mss
    }

    pub fn source_port(&self) -> Port {
        self.source_port
    }

    pub fn destination_port(&self) -> Port {
        self.destination_port
    }

    /// 只读取单个段前 2 字节中的源端口，不做完整解析。
    pub fn extract_source(segment: &[u8]) -> Result<Port> {
        if segment.len() < 4 {
            return Err(StackError::invalid(format!(
                "udp: segment of {} bytes is too short to extract ports",
                segment.len()
            )));
        }
        Port::from_bytes(&segment[0..2])
    }

    /// 只读取单个段第 2–3 字节中的目的端口，不做完整解析。
    pub fn extract_destination(segment: &[u8]) -> Result<Port> {
        if segment.len() < 4 {
            return Err(StackError::invalid(format!(
                "udp: segment of {} bytes is too short to extract ports",
                segment.len()
            )));
        }
        Port::from_bytes(&segment[2..4])
    }

    /// 把背靠背拼接的段字节流重新分帧。
    ///
    /// 缓冲内的顺序不必与序号一致。任何无法构成完整段的字节，
    /// 包括残缺的尾部头，都使整个调用失败，不返回部分结果。
    fn parse_segments(&self, data: &[u8]) -> Result<Vec<UdpSegment>> {
        let mut segments = Vec::new();
        let mut rest = data;

        while !rest.is_empty() {
            if rest.len() < segment::HEADER_LEN {
                return Err(StackError::malformed(format!(
                    "{} trailing bytes cannot form a segment header",
                    rest.len()
                )));
            }

            let length_bits = u16::from_be_bytes([rest[6], rest[7]]);
            if length_bits % 8 != 0 {
                return Err(StackError::malformed(format!(
                    "segment length of {length_bits} bits is not a multiple of 8"
                )));
            }
            if length_bits < segment::HEADER_BITS {
                return Err(StackError::malformed(format!(
                    "segment length of {length_bits} bits is smaller than the header"
                )));
            }

            let total_bytes = usize::from(length_bits / 8);
            if total_bytes > rest.len() {
                return Err(StackError::malformed(format!(
                    "truncated segment: declared {total_bytes} bytes but only {} remain",
                    rest.len()
                )));
            }

            segments.push(UdpSegment::from_bytes(&rest[..total_bytes])?);
            rest = &rest[total_bytes..];
        }

        trace!(segments = segments.len(), "分帧完成");
        Ok(segments)
    }
}

impl Protocol for UdpProtocol {
    fn name(&self) -> &'static str {
        "udp"
    }

    /// 按 MSS 切块并为每块加 UDP 头，段序号从 0 递增。
    /// 载荷长度恰为 MSS 整数倍时不产生空尾段。
    #[tracing::instrument(skip(self, upper, chain), fields(layer = self.name(), payload_bytes = upper.len(), mss = self.mss))]
    fn encapsulate(&self, upper: &[u8], chain: &Chain) -> Result<Vec<u8>> {
        if upper.is_empty() {
            return Err(StackError::invalid(
                "udp: payload on encapsulation is empty",
            ));
        }
        let next = self.next.ok_or(StackError::MissingLink {
            layer: "udp",
            direction: LinkDirection::Next,
        })?;

        let chunks = upper.chunks(self.mss);
        let segment_count = chunks.len();
        if segment_count > usize::from(u16::MAX) + 1 {
            return Err(StackError::invalid(format!(
                "udp: payload needs {segment_count} segments, more than the 16-bit sequence space"
            )));
        }

        let mut wire = Vec::with_capacity(upper.len() + segment_count * segment::HEADER_LEN);
        for (seq, chunk) in chunks.enumerate() {
            let seg = UdpSegment::new(
                self.source_port,
                self.destination_port,
                seq as u16,
                chunk.to_vec(),
            )?;
            wire.extend_from_slice(&seg.to_bytes());
        }

        debug!(
            segments = segment_count,
            wire_bytes = wire.len(),
            "封装为 UDP 段流"
        );
        chain.encapsulate_at(next, &wire)
    }

    /// 重新分帧、按序号升序稳定排序后拼接各段载荷。
    /// 序号不要求连续或唯一：重复保持输入相对顺序，间隙原样放行。
    #[tracing::instrument(skip(self, lower, chain), fields(layer = self.name(), wire_bytes = lower.len()))]
    fn decapsulate(&self, lower: &[u8], chain: &Chain) -> Result<Vec<u8>> {
        if lower.is_empty() {
            return Err(StackError::invalid(
                "udp: decapsulation received empty segment data",
            ));
        }
        let previous = self.previous.ok_or(StackError::MissingLink {
            layer: "udp",
            direction: LinkDirection::Previous,
        })?;

        let mut segments = self.parse_segments(lower)?;
        segments.sort_by_key(|seg| seg.sequence_number());

        let mut payload =
            Vec::with_capacity(lower.len().saturating_sub(segments.len() * segment::HEADER_LEN));
        for seg in &segments {
            payload.extend_from_slice(seg.payload());
        }

        debug!(
            segments = segments.len(),
            payload_bytes = payload.len(),
            "还原上层载荷"
        );
        chain.decapsulate_at(previous, &payload)
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
        Box::new(UdpProtocol {
            next: None,
            previous: None,
            ..self.clone()
        })
    }
}
