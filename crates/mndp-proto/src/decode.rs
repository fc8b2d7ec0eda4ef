//! MNDP wire format decoding
//!
//! Announcements arrive as one UDP payload with this layout:
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0x00    4B    sequence number (little-endian u32)
//! 0x04..        repeated TLV records until the buffer ends:
//!               2B  type tag        (big-endian u16)
//!               2B  declared length (big-endian u16)
//!               L   payload (but see the Uptime exception below)
//! ```
//!
//! There is no checksum and no terminator; the record stream ends when
//! the buffer runs out exactly at a type-tag boundary.
//!
//! The Uptime field (tag 10) is special: its payload is always read as
//! a fixed 4-byte little-endian seconds count and the declared length
//! is ignored. Real senders always declare length 4 for this field, so
//! a compliant decoder has to replicate the quirk as-is.

use crate::packet::{Packet, Part, TlvType, Value};
use std::time::Duration;
use thiserror::Error;

/// Decode failure.
///
/// The wire format has no integrity checks, so running out of bytes is
/// the only way a buffer can be malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("packet truncated: a header field or declared payload ran past the end of the buffer")]
    Truncated,
}

/// Byte cursor over the datagram. Every read either fully succeeds or
/// fails with `Truncated`; there are no partial reads.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated);
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Decode one complete MNDP datagram.
///
/// Pure function: no I/O, no logging, no partial result. The returned
/// packet keeps fields in wire order.
pub fn decode(buf: &[u8]) -> Result<Packet, DecodeError> {
    let mut reader = Reader::new(buf);
    let seq_no = reader.read_u32_le()?;

    let mut parts = Vec::new();
    loop {
        // Exhaustion exactly at a tag boundary is the clean end of the
        // record stream. One leftover byte is a torn tag.
        if reader.remaining() == 0 {
            break;
        }
        let tlv_type = TlvType(reader.read_u16_be()?);
        let len = reader.read_u16_be()? as usize;

        let value = match tlv_type {
            TlvType::MAC_ADDRESS => Value::HardwareAddress(reader.take(len)?.to_vec()),
            TlvType::IDENTITY
            | TlvType::VERSION
            | TlvType::PLATFORM
            | TlvType::SOFTWARE_ID
            | TlvType::BOARD
            | TlvType::INTERFACE_NAME => {
                Value::Text(String::from_utf8_lossy(reader.take(len)?).into_owned())
            }
            TlvType::UPTIME => {
                // Fixed 4-byte read; the declared length is ignored on
                // purpose (see module docs).
                Value::Duration(Duration::from_secs(u64::from(reader.read_u32_le()?)))
            }
            TlvType::IPV4_ADDRESS | TlvType::IPV6_ADDRESS => {
                Value::IpAddress(reader.take(len)?.to_vec())
            }
            // Unpack (tag 14) and every unrecognized tag
            _ => Value::RawBytes(reader.take(len)?.to_vec()),
        };

        parts.push(Part { tlv_type, value });
    }

    Ok(Packet { seq_no, parts })
}
