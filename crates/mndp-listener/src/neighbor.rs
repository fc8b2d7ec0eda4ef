//! Neighbor records built from decoded announcements

use chrono::{DateTime, Utc};
use mndp_proto::{Packet, TlvType, Value};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tracing::debug;

/// Format hardware-address bytes as colon-separated lowercase hex
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Interpret an address payload as an IP address.
///
/// The decoder stores address bytes at whatever length the wire
/// declared; only canonical 4-byte v4 and 16-byte v6 payloads are
/// accepted here.
pub fn parse_ip(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

/// Inventory view of one announcing device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighbor {
    /// MAC address as colon-separated hex (if announced)
    pub mac: Option<String>,
    /// Device identity / hostname
    pub identity: Option<String>,
    /// Software version string
    pub version: Option<String>,
    /// Platform name (e.g. "MikroTik")
    pub platform: Option<String>,
    /// Software license ID
    pub software_id: Option<String>,
    /// Board / hardware model
    pub board: Option<String>,
    /// Interface the announcement was sent from
    pub interface_name: Option<String>,
    /// Device uptime at announcement time
    pub uptime: Option<Duration>,
    /// Announced IP addresses, v4 and v6 mixed
    pub addresses: Vec<IpAddr>,
    /// Sequence number of the latest announcement
    pub seq_no: u32,
    /// Socket address the datagram came from
    pub source: SocketAddr,
    /// When the device was first heard
    pub first_seen: DateTime<Utc>,
    /// When the device was last heard
    pub last_seen: DateTime<Utc>,
}

impl Neighbor {
    /// Build a neighbor record from its first announcement
    pub fn from_packet(packet: &Packet, source: SocketAddr) -> Self {
        let now = Utc::now();
        let mut neighbor = Self {
            mac: None,
            identity: None,
            version: None,
            platform: None,
            software_id: None,
            board: None,
            interface_name: None,
            uptime: None,
            addresses: Vec::new(),
            seq_no: packet.seq_no,
            source,
            first_seen: now,
            last_seen: now,
        };
        neighbor.apply(packet);
        neighbor
    }

    /// Fold a later announcement into this record
    pub fn apply(&mut self, packet: &Packet) {
        self.seq_no = packet.seq_no;
        self.last_seen = Utc::now();
        self.addresses.clear();

        for part in &packet.parts {
            match (part.tlv_type, &part.value) {
                (TlvType::MAC_ADDRESS, Value::HardwareAddress(bytes)) => {
                    self.mac = Some(format_mac(bytes));
                }
                (TlvType::IDENTITY, Value::Text(s)) => self.identity = Some(s.clone()),
                (TlvType::VERSION, Value::Text(s)) => self.version = Some(s.clone()),
                (TlvType::PLATFORM, Value::Text(s)) => self.platform = Some(s.clone()),
                (TlvType::SOFTWARE_ID, Value::Text(s)) => self.software_id = Some(s.clone()),
                (TlvType::BOARD, Value::Text(s)) => self.board = Some(s.clone()),
                (TlvType::INTERFACE_NAME, Value::Text(s)) => {
                    self.interface_name = Some(s.clone())
                }
                (TlvType::UPTIME, Value::Duration(d)) => self.uptime = Some(*d),
                (TlvType::IPV4_ADDRESS | TlvType::IPV6_ADDRESS, Value::IpAddress(bytes)) => {
                    match parse_ip(bytes) {
                        Some(ip) => self.addresses.push(ip),
                        None => debug!(
                            tag = %part.tlv_type,
                            len = bytes.len(),
                            "Skipping address field with non-canonical length"
                        ),
                    }
                }
                // Unpack and unrecognized fields carry no inventory data
                _ => {}
            }
        }
    }

    /// Registry key: the MAC when announced, otherwise the source
    /// socket address
    pub fn registry_key(&self) -> String {
        self.mac
            .clone()
            .unwrap_or_else(|| self.source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mndp_proto::Part;

    fn source() -> SocketAddr {
        "192.168.88.1:5678".parse().unwrap()
    }

    fn announcement() -> Packet {
        Packet {
            seq_no: 17,
            parts: vec![
                Part {
                    tlv_type: TlvType::MAC_ADDRESS,
                    value: Value::HardwareAddress(vec![0x00, 0x0C, 0x42, 0x1A, 0x2B, 0x3C]),
                },
                Part {
                    tlv_type: TlvType::IDENTITY,
                    value: Value::Text("core-router".to_string()),
                },
                Part {
                    tlv_type: TlvType::VERSION,
                    value: Value::Text("7.14.2".to_string()),
                },
                Part {
                    tlv_type: TlvType::UPTIME,
                    value: Value::Duration(Duration::from_secs(3600)),
                },
                Part {
                    tlv_type: TlvType::IPV4_ADDRESS,
                    value: Value::IpAddress(vec![192, 168, 88, 1]),
                },
            ],
        }
    }

    #[test]
    fn test_format_mac() {
        assert_eq!(
            format_mac(&[0x00, 0x0C, 0x42, 0x1A, 0x2B, 0x3C]),
            "00:0c:42:1a:2b:3c"
        );
        assert_eq!(format_mac(&[]), "");
    }

    #[test]
    fn test_parse_ip_canonical_lengths() {
        assert_eq!(
            parse_ip(&[10, 0, 0, 1]),
            Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
        );
        let v6 = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        assert_eq!(parse_ip(&v6), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn test_parse_ip_rejects_other_lengths() {
        assert_eq!(parse_ip(&[]), None);
        assert_eq!(parse_ip(&[1, 2, 3]), None);
        assert_eq!(parse_ip(&[1, 2, 3, 4, 5]), None);
    }

    #[test]
    fn test_neighbor_from_packet() {
        let neighbor = Neighbor::from_packet(&announcement(), source());

        assert_eq!(neighbor.mac.as_deref(), Some("00:0c:42:1a:2b:3c"));
        assert_eq!(neighbor.identity.as_deref(), Some("core-router"));
        assert_eq!(neighbor.version.as_deref(), Some("7.14.2"));
        assert_eq!(neighbor.uptime, Some(Duration::from_secs(3600)));
        assert_eq!(
            neighbor.addresses,
            vec![IpAddr::V4(Ipv4Addr::new(192, 168, 88, 1))]
        );
        assert_eq!(neighbor.seq_no, 17);
        assert_eq!(neighbor.registry_key(), "00:0c:42:1a:2b:3c");
    }

    #[test]
    fn test_apply_replaces_addresses() {
        let mut neighbor = Neighbor::from_packet(&announcement(), source());

        let update = Packet {
            seq_no: 18,
            parts: vec![Part {
                tlv_type: TlvType::IPV4_ADDRESS,
                value: Value::IpAddress(vec![10, 0, 0, 9]),
            }],
        };
        neighbor.apply(&update);

        assert_eq!(neighbor.seq_no, 18);
        assert_eq!(
            neighbor.addresses,
            vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 9))]
        );
        // Fields absent from the update keep their previous values
        assert_eq!(neighbor.identity.as_deref(), Some("core-router"));
    }

    #[test]
    fn test_non_canonical_address_is_skipped() {
        let packet = Packet {
            seq_no: 1,
            parts: vec![Part {
                tlv_type: TlvType::IPV6_ADDRESS,
                value: Value::IpAddress(vec![1, 2, 3, 4, 5]),
            }],
        };
        let neighbor = Neighbor::from_packet(&packet, source());
        assert!(neighbor.addresses.is_empty());
    }

    #[test]
    fn test_registry_key_falls_back_to_source() {
        let packet = Packet {
            seq_no: 1,
            parts: Vec::new(),
        };
        let neighbor = Neighbor::from_packet(&packet, source());
        assert_eq!(neighbor.registry_key(), "192.168.88.1:5678");
    }
}
