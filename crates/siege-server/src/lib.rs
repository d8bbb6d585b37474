//! Castle-Siege Session Gateway
//!
//! Relay server over renet: decodes client events, drives the shared
//! session in siege-core, and fans the resulting state out to every
//! connection.

pub mod channels;
pub mod config;
pub mod names;
pub mod rate;
pub mod transport;

pub use channels::{channel_id, create_channel_configs};
pub use config::ServerConfig;
pub use names::load_names;
pub use rate::RateLimiter;
pub use transport::{ServerRunner, TransportConfig, TransportError, PROTOCOL_ID};
