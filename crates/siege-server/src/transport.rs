//! Transport layer using renet_netcode for UDP communication.
//!
//! Handles socket binding and packet pumping. Failing to bind is the one
//! fatal error in the whole server.

use std::net::{SocketAddr, UdpSocket};
use std::time::{SystemTime, UNIX_EPOCH};

use renet::RenetServer;
use renet_netcode::{NetcodeServerTransport, ServerAuthentication, ServerConfig};
use tracing::{error, info};

/// Protocol ID (must match clients); "CASTLE" leetified.
pub const PROTOCOL_ID: u64 = 0xCA5_71E_001;

/// Server transport configuration
pub struct TransportConfig {
    /// Public address for clients to connect
    pub public_address: SocketAddr,
    /// Maximum simultaneous clients
    pub max_clients: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            public_address: "127.0.0.1:7777".parse().expect("static address"),
            max_clients: 32,
        }
    }
}

/// Transport error types
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to bind socket to {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("failed to determine bound address for {0}: {1}")]
    LocalAddrFailed(SocketAddr, std::io::Error),

    #[error("failed to configure socket: {0}")]
    SocketConfig(std::io::Error),

    #[error("failed to create transport: {0}")]
    TransportCreation(String),
}

/// Owns the netcode transport and pumps packets for a RenetServer.
pub struct ServerRunner {
    transport: NetcodeServerTransport,
}

impl ServerRunner {
    /// Bind the UDP socket and set up unsecure netcode authentication
    /// (this is a LAN party server, not an account system).
    pub fn bind(config: TransportConfig) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(config.public_address)
            .map_err(|e| TransportError::BindFailed(config.public_address, e))?;

        let bound_addr = socket
            .local_addr()
            .map_err(|e| TransportError::LocalAddrFailed(config.public_address, e))?;

        socket
            .set_nonblocking(true)
            .map_err(TransportError::SocketConfig)?;

        let current_time = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();

        let server_config = ServerConfig {
            current_time,
            max_clients: config.max_clients,
            protocol_id: PROTOCOL_ID,
            public_addresses: vec![bound_addr],
            authentication: ServerAuthentication::Unsecure,
        };

        let transport = NetcodeServerTransport::new(server_config, socket)
            .map_err(|e| TransportError::TransportCreation(e.to_string()))?;

        info!(
            "transport bound to {} (max {} clients, protocol {:016x})",
            bound_addr, config.max_clients, PROTOCOL_ID
        );

        Ok(Self { transport })
    }

    /// Run a single tick of the transport layer
    pub fn update(&mut self, renet_server: &mut RenetServer) {
        let current_time = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();

        // Receive packets from network
        if let Err(e) = self.transport.update(current_time, renet_server) {
            error!("transport update error: {}", e);
        }

        // Send packets to network
        self.transport.send_packets(renet_server);
    }

    /// Get the bound address
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.transport.addresses().first().copied()
    }
}
