//! Renet channel configuration.
//!
//! One ReliableOrdered channel carries every session event. The protocol's
//! only ordering guarantee is each client's own inbound order, which is
//! exactly what ReliableOrdered provides.

use std::time::Duration;

use renet::ChannelConfig;

/// Channel IDs
pub mod channel_id {
    /// Lobby and battle events - must arrive in order
    pub const EVENTS: u8 = 0;
}

/// Maximum buffered bytes for the event channel
const MAX_CHANNEL_MEMORY: usize = 5 * 1024 * 1024; // 5 MB

/// Create channel configurations for the session gateway
pub fn create_channel_configs() -> Vec<ChannelConfig> {
    vec![ChannelConfig {
        channel_id: channel_id::EVENTS,
        max_memory_usage_bytes: MAX_CHANNEL_MEMORY,
        send_type: renet::SendType::ReliableOrdered {
            resend_time: Duration::from_millis(300),
        },
    }]
}
