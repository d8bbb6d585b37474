//! Per-connection inbound message budget.
//!
//! Fixed-window counting per client id. The session core is permissive
//! about stale actions, so this is the only backpressure a misbehaving
//! client sees.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    max_messages: u32,
    window: Duration,
    windows: HashMap<u64, Window>,
}

struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(max_messages: u32, window: Duration) -> Self {
        Self {
            max_messages,
            window,
            windows: HashMap::new(),
        }
    }

    /// Count one message; `false` means the client is over budget for the
    /// current window.
    pub fn check(&mut self, client_id: u64) -> bool {
        let now = Instant::now();
        let window = self.windows.entry(client_id).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.max_messages
    }

    /// Drop state for a departed connection.
    pub fn forget(&mut self, client_id: u64) {
        self.windows.remove(&client_id);
    }
}
