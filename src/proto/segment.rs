//! UDP segment wire format.
//!
//! Fixed 8-byte header followed by the payload, all fields big-endian:
//! source port (2), destination port (2), sequence number (2), total
//! segment length in bits (2). The length field is what allows a
//! contiguous byte stream of segments to be re-framed without
//! delimiters.

use bytes::{BufMut, BytesMut};

use crate::addr::Port;
use crate::error::{Result, StackError};

/// Header length in bytes.
pub const HEADER_LEN: usize = 8;

/// Header length in bits, the smallest legal value of the length field.
pub const HEADER_BITS: u16 = (HEADER_LEN * 8) as u16;

/// Largest payload whose total bit length still fits the 16-bit field.
pub const MAX_PAYLOAD: usize = (u16::MAX as usize) / 8 - HEADER_LEN;

/// One framed unit of the UDP wire format.
///
/// Ephemeral: created per encapsulate/decapsulate call and discarded
/// after byte conversion. The length-in-bits field is derived from the
/// payload and never independently settable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpSegment {
    source_port: Port,
    destination_port: Port,
    sequence_number: u16,
    payload: Vec<u8>,
}

impl UdpSegment {
    pub fn new(
        source_port: Port,
        destination_port: Port,
        sequence_number: u16,
        payload: Vec<u8>,
    ) -> Result<UdpSegment> {
        if payload.len() > MAX_PAYLOAD {
            return Err(StackError::invalid(format!(
                "udp segment: payload of {} bytes exceeds the {MAX_PAYLOAD} byte maximum",
                payload.len()
            )));
        }
        Ok(UdpSegment {
            source_port,
            destination_port,
            sequence_number,
            payload,
        })
    }

    pub fn source_port(&self) -> Port {
        self.source_port
    }

    pub fn destination_port(&self) -> Port {
        self.destination_port
    }

    pub fn sequence_number(&self) -> u16 {
        self.sequence_number
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total segment length in bits: `8 * (header + payload)` bytes.
    pub fn total_length_bits(&self) -> u16 {
        ((HEADER_LEN + self.payload.len()) * 8) as u16
    }

    /// Header + payload, exactly `total_length_bits / 8` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.payload.len());
        buf.put_u16(self.source_port.value());
        buf.put_u16(self.destination_port.value());
        buf.put_u16(self.sequence_number);
        buf.put_u16(self.total_length_bits());
        buf.put_slice(&self.payload);
        buf.to_vec()
    }

    /// Parse one complete segment. The buffer must hold exactly the
    /// bytes the length field declares.
    pub fn from_bytes(data: &[u8]) -> Result<UdpSegment> {
        if data.len() < HEADER_LEN {
            return Err(StackError::malformed(format!(
                "segment buffer of {} bytes is shorter than the {HEADER_LEN} byte header",
                data.len()
            )));
        }

        let length_bits = u16::from_be_bytes([data[6], data[7]]);
        if length_bits % 8 != 0 {
            return Err(StackError::malformed(format!(
                "segment length of {length_bits} bits is not a multiple of 8"
            )));
        }
        if length_bits < HEADER_BITS {
            return Err(StackError::malformed(format!(
                "segment length of {length_bits} bits is smaller than the header"
            )));
        }
        let total_bytes = usize::from(length_bits / 8);
        if data.len() != total_bytes {
            return Err(StackError::malformed(format!(
                "segment declares {total_bytes} bytes but the buffer holds {}",
                data.len()
            )));
        }

        let source_port = Port::from_bytes(&data[0..2])?;
        let destination_port = Port::from_bytes(&data[2..4])?;
        let sequence_number = u16::from_be_bytes([data[4], data[5]]);

        UdpSegment::new(
            source_port,
            destination_port,
            sequence_number,
            data[HEADER_LEN..].to_vec(),
        )
    }
}
