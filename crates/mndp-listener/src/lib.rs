//! MNDP Listener - UDP listener and neighbor registry
//!
//! This crate owns the socket side of MNDP discovery:
//! - Receiving broadcast announcements on UDP port 5678
//! - Folding decoded packets into per-device `Neighbor` records
//! - Broadcasting registry changes to subscribers

pub mod listener;
pub mod neighbor;

pub use listener::{ListenerConfig, MndpListener, NeighborEvent, MNDP_PORT};
pub use neighbor::{format_mac, parse_ip, Neighbor};
