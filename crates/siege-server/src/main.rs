//! Castle-Siege Session Gateway
//!
//! Single-process relay: one shared session, four teams, four castles.
//! Inbound events are applied to the session one at a time to completion;
//! the resulting broadcasts always reflect post-mutation state.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::Rng;
use renet::{ConnectionConfig, RenetServer};
use tracing::{info, warn};

use siege_core::{Outbound, Session};
use siege_protocol::{wire, ParticipantId, ServerMessage};
use siege_server::{
    channel_id, create_channel_configs,
    transport::{ServerRunner, TransportConfig},
    RateLimiter, ServerConfig,
};

/// Server state
struct Server {
    /// Renet server
    renet: RenetServer,
    /// The one shared game world
    session: Session,
    /// Per-connection inbound budget
    limiter: RateLimiter,
}

impl Server {
    fn new(seed: u64) -> Self {
        let connection_config = ConnectionConfig {
            available_bytes_per_tick: 60_000,
            server_channels_config: create_channel_configs(),
            client_channels_config: create_channel_configs(),
        };

        Self {
            renet: RenetServer::new(connection_config),
            session: Session::new(seed),
            limiter: RateLimiter::new(60, Duration::from_secs(1)),
        }
    }

    /// One tick: drain connection events, then client messages.
    fn update(&mut self) {
        while let Some(event) = self.renet.get_event() {
            self.handle_server_event(event);
        }

        for client_id in self.renet.clients_id() {
            while let Some(data) = self.renet.receive_message(client_id, channel_id::EVENTS) {
                self.handle_client_message(client_id, &data);
            }
        }
    }

    fn handle_server_event(&mut self, event: renet::ServerEvent) {
        match event {
            renet::ServerEvent::ClientConnected { client_id } => {
                info!("client {client_id} connected");
            }
            renet::ServerEvent::ClientDisconnected { client_id, reason } => {
                info!("client {client_id} disconnected: {reason:?}");
                self.limiter.forget(client_id);
                let effects = self
                    .session
                    .disconnect(ParticipantId::from_client(client_id));
                self.transmit(effects);
            }
        }
    }

    fn handle_client_message(&mut self, client_id: u64, data: &[u8]) {
        if !self.limiter.check(client_id) {
            warn!("rate limit exceeded for client {client_id}");
            return;
        }

        let message = match wire::deserialize_client_message(data) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("dropping malformed message from client {client_id}: {e}");
                return;
            }
        };

        let effects = self
            .session
            .apply(ParticipantId::from_client(client_id), message, now_ms());
        self.transmit(effects);
    }

    fn transmit(&mut self, effects: Vec<Outbound>) {
        for effect in effects {
            match effect {
                Outbound::Broadcast(message) => {
                    if let ServerMessage::GameOver { winner } = &message {
                        info!("battle over, team {} wins", winner.0);
                    }
                    match wire::serialize_server_message(&message) {
                        Ok(data) => self.renet.broadcast_message(channel_id::EVENTS, data),
                        Err(e) => warn!("failed to encode broadcast: {e}"),
                    }
                }
                Outbound::Unicast { to, message } => {
                    // synthetic participants have no socket behind them
                    let Some(client_id) = to.client_id() else {
                        continue;
                    };
                    match wire::serialize_server_message(&message) {
                        Ok(data) => self.renet.send_message(client_id, channel_id::EVENTS, data),
                        Err(e) => warn!("failed to encode unicast: {e}"),
                    }
                }
            }
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("siege_server=info")
        .init();

    let config = ServerConfig::from_env();
    let mut server = Server::new(rand::random());

    // Populate the lobby before anyone connects
    let names = siege_server::load_names(&config.names_file);
    let fillers = rand::thread_rng().gen_range(config.synthetic_min..=config.synthetic_max);
    info!("seeding {fillers} synthetic participants");
    let effects = server.session.seed_synthetic(&names, fillers, now_ms());
    server.transmit(effects);

    let transport_config = TransportConfig {
        public_address: config.bind_address,
        max_clients: config.max_clients,
    };

    let mut transport = match ServerRunner::bind(transport_config) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("failed to create transport: {e}");
            std::process::exit(1);
        }
    };

    info!("siege server v{}", env!("CARGO_PKG_VERSION"));
    info!("listening on {}", config.bind_address);

    // Main server loop
    let tick_duration = Duration::from_millis(16); // ~60 Hz
    loop {
        let start = Instant::now();

        // Update transport (receive/send packets)
        transport.update(&mut server.renet);

        // Apply game logic
        server.update();

        let elapsed = start.elapsed();
        if let Some(sleep_time) = tick_duration.checked_sub(elapsed) {
            std::thread::sleep(sleep_time);
        }
    }
}
