//! Async UDP listener that feeds the neighbor registry

use anyhow::Result;
use mndp_proto::Packet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, trace, warn};

use crate::neighbor::Neighbor;

/// UDP port MikroTik devices broadcast MNDP announcements on
pub const MNDP_PORT: u16 = 5678;

/// Largest datagram we accept; announcements are far smaller
const MAX_DATAGRAM: usize = 1500;

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// Address to bind the UDP socket on
    pub bind: IpAddr,
    /// UDP port to listen on
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: MNDP_PORT,
        }
    }
}

/// Registry event for real-time updates
#[derive(Debug, Clone)]
pub enum NeighborEvent {
    /// A device announced itself for the first time
    Discovered(Neighbor),
    /// A known device sent a fresh announcement
    Updated(Neighbor),
}

/// MNDP listener service
pub struct MndpListener {
    config: ListenerConfig,
    neighbors: Arc<RwLock<HashMap<String, Neighbor>>>,
    event_tx: broadcast::Sender<NeighborEvent>,
}

impl MndpListener {
    /// Create a new listener with the given configuration
    pub fn new(config: ListenerConfig) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            config,
            neighbors: Arc::new(RwLock::new(HashMap::new())),
            event_tx,
        }
    }

    /// Subscribe to registry events
    pub fn subscribe(&self) -> broadcast::Receiver<NeighborEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of all known neighbors
    pub async fn neighbors(&self) -> Vec<Neighbor> {
        self.neighbors.read().await.values().cloned().collect()
    }

    /// Look up a neighbor by registry key (MAC or source address)
    pub async fn get_neighbor(&self, key: &str) -> Option<Neighbor> {
        self.neighbors.read().await.get(key).cloned()
    }

    /// Receive and decode announcements until the task is cancelled.
    ///
    /// Datagrams that fail to decode are logged and dropped; they never
    /// stop the loop.
    pub async fn run(&self) -> Result<()> {
        let socket = UdpSocket::bind((self.config.bind, self.config.port)).await?;
        info!(
            bind = %self.config.bind,
            port = self.config.port,
            "MNDP listener started"
        );

        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let (len, source) = socket.recv_from(&mut buf).await?;
            trace!(source = %source, len = len, "Received datagram");

            let packet = match mndp_proto::decode(&buf[..len]) {
                Ok(packet) => packet,
                Err(e) => {
                    warn!(source = %source, error = %e, "Dropping undecodable datagram");
                    continue;
                }
            };

            self.ingest(packet, source).await;
        }
    }

    /// Fold one decoded announcement into the registry
    pub async fn ingest(&self, packet: Packet, source: SocketAddr) {
        let mut neighbors = self.neighbors.write().await;

        let neighbor = Neighbor::from_packet(&packet, source);
        let key = neighbor.registry_key();
        match neighbors.get_mut(&key) {
            Some(existing) => {
                existing.apply(&packet);
                debug!(key = %key, seq_no = packet.seq_no, "Neighbor updated");
                let _ = self.event_tx.send(NeighborEvent::Updated(existing.clone()));
            }
            None => {
                info!(
                    key = %key,
                    identity = neighbor.identity.as_deref().unwrap_or("<unknown>"),
                    "Neighbor discovered"
                );
                neighbors.insert(key, neighbor.clone());
                let _ = self.event_tx.send(NeighborEvent::Discovered(neighbor));
            }
        }
    }
}
