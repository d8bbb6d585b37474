//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the UDP transport
    pub bind_address: SocketAddr,
    /// Maximum simultaneous connections
    pub max_clients: usize,
    /// Synthetic lobby fillers seeded at startup: count is drawn uniformly
    /// from this inclusive range
    pub synthetic_min: usize,
    pub synthetic_max: usize,
    /// Display-name list, one name per line (`#` comments and blanks skipped)
    pub names_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:7777".parse().expect("static address"),
            max_clients: 32,
            synthetic_min: 5,
            synthetic_max: 15,
            names_file: PathBuf::from("names.txt"),
        }
    }
}

impl ServerConfig {
    /// Defaults plus the `PORT` environment override.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.bind_address.set_port(port),
                Err(_) => warn!("ignoring unparseable PORT value {port:?}"),
            }
        }
        config
    }
}
