//! Configuration loading

use anyhow::Result;
use mndp_listener::{ListenerConfig, MNDP_PORT};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub listener: ListenerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerSection {
    /// Address to bind the UDP socket on
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    /// UDP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    MNDP_PORT
}

impl Config {
    /// Convert to ListenerConfig
    pub fn to_listener_config(&self) -> ListenerConfig {
        ListenerConfig {
            bind: self.listener.bind,
            port: self.listener.port,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listener.bind, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.listener.port, 5678);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str("[listener]\nport = 15678\n").unwrap();
        assert_eq!(config.listener.port, 15678);
        assert_eq!(config.listener.bind, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
