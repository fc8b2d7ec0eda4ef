//! Decoded packet types and the TLV tag registry

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Numeric TLV tag from the wire.
///
/// Tags outside the known set are legal; they decode as opaque fields
/// rather than errors, so devices can ship new fields without breaking
/// older listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TlvType(pub u16);

impl TlvType {
    pub const MAC_ADDRESS: TlvType = TlvType(1);
    pub const IDENTITY: TlvType = TlvType(5);
    pub const VERSION: TlvType = TlvType(7);
    pub const PLATFORM: TlvType = TlvType(8);
    pub const UPTIME: TlvType = TlvType(10);
    pub const SOFTWARE_ID: TlvType = TlvType(11);
    pub const BOARD: TlvType = TlvType(12);
    pub const UNPACK: TlvType = TlvType(14);
    pub const IPV6_ADDRESS: TlvType = TlvType(15);
    pub const INTERFACE_NAME: TlvType = TlvType(16);
    pub const IPV4_ADDRESS: TlvType = TlvType(17);

    /// Display name for a known tag, `None` for unrecognized tags
    pub fn known_name(&self) -> Option<&'static str> {
        match *self {
            Self::MAC_ADDRESS => Some("MACAddress"),
            Self::IDENTITY => Some("Identity"),
            Self::VERSION => Some("Version"),
            Self::PLATFORM => Some("Platform"),
            Self::UPTIME => Some("Uptime"),
            Self::SOFTWARE_ID => Some("SoftwareID"),
            Self::BOARD => Some("Board"),
            Self::UNPACK => Some("Unpack"),
            Self::IPV6_ADDRESS => Some("IPv6Address"),
            Self::INTERFACE_NAME => Some("InterfaceName"),
            Self::IPV4_ADDRESS => Some("IPv4Address"),
            _ => None,
        }
    }
}

impl std::fmt::Display for TlvType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.known_name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Unknown-{}", self.0),
        }
    }
}

/// Decoded value of one TLV field.
///
/// The shape is chosen by the field's tag at decode time. Address
/// variants keep whatever length the wire declared; canonical 6/4/16
/// byte sizing is a consumer concern, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Opaque payload: the Unpack field and all unrecognized tags
    RawBytes(Vec<u8>),
    /// Textual field (identity, version, platform, ...); payload bytes
    /// are not required to be valid UTF-8 and are converted lossily
    Text(String),
    /// Hardware (MAC) address bytes, length as declared on the wire
    HardwareAddress(Vec<u8>),
    /// IPv4 or IPv6 address bytes, length as declared on the wire
    IpAddress(Vec<u8>),
    /// Device uptime in seconds
    Duration(Duration),
}

/// One decoded TLV record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub tlv_type: TlvType,
    pub value: Value,
}

/// A decoded MNDP announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Sequence number from the fixed packet header
    pub seq_no: u32,
    /// Decoded fields in wire order, never reordered or deduplicated
    pub parts: Vec<Part>,
}

impl Packet {
    /// First field with the given tag, if present
    pub fn field(&self, tlv_type: TlvType) -> Option<&Value> {
        self.parts
            .iter()
            .find(|p| p.tlv_type == tlv_type)
            .map(|p| &p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tag_names() {
        assert_eq!(TlvType::MAC_ADDRESS.to_string(), "MACAddress");
        assert_eq!(TlvType::IDENTITY.to_string(), "Identity");
        assert_eq!(TlvType::UPTIME.to_string(), "Uptime");
        assert_eq!(TlvType::IPV4_ADDRESS.to_string(), "IPv4Address");
    }

    #[test]
    fn test_unknown_tag_name() {
        assert_eq!(TlvType(999).known_name(), None);
        assert_eq!(TlvType(999).to_string(), "Unknown-999");
        assert_eq!(TlvType(2).to_string(), "Unknown-2");
    }

    #[test]
    fn test_packet_field_lookup() {
        let packet = Packet {
            seq_no: 1,
            parts: vec![
                Part {
                    tlv_type: TlvType::IDENTITY,
                    value: Value::Text("router".to_string()),
                },
                Part {
                    tlv_type: TlvType::BOARD,
                    value: Value::Text("RB951".to_string()),
                },
            ],
        };

        assert_eq!(
            packet.field(TlvType::BOARD),
            Some(&Value::Text("RB951".to_string()))
        );
        assert_eq!(packet.field(TlvType::VERSION), None);
    }
}
