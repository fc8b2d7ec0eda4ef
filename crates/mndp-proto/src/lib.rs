//! MNDP Proto - MikroTik Neighbor Discovery Protocol packet decoding
//!
//! This crate decodes MNDP broadcast datagrams into typed packets:
//! - Packet and Part types for the decoded TLV stream
//! - TlvType registry with display names for known field tags
//! - A decode-only wire parser (MNDP has no checksum and this crate
//!   deliberately has no encoder)
//!
//! Decoding is a pure function over a complete in-memory buffer; socket
//! handling lives in `mndp-listener`.

pub mod decode;
pub mod packet;

pub use decode::{decode, DecodeError};
pub use packet::{Packet, Part, TlvType, Value};
