use serde::{Deserialize, Serialize};

use crate::{CastleId, Participant, TeamId};

/// All client→server events. Fully serializable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Register in the shared session under a display name.
    Join { name: String },
    /// Request a team assignment; the first request triggers assignment for
    /// the whole roster.
    PlayerReady,
    /// Begin the battle.
    StartGame,
    /// Damage a castle by one point.
    Attack { castle: CastleId },
    /// Heal a castle by one point.
    Repair { castle: CastleId },
}

/// All server→client events. Fully serializable.
///
/// Everything except `TeamAssigned` is broadcast to every connection;
/// `TeamAssigned` is unicast to the requesting connection only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Full roster snapshot, most recent real participant first.
    PlayerList { players: Vec<Participant> },
    /// The receiving connection's own team assignment.
    TeamAssigned {
        team: TeamId,
        team_name: String,
        team_color: u32,
        /// Seat number within the team, 1-based.
        team_number: u8,
        team_members: Vec<Participant>,
    },
    /// Battle begins: the assigned roster plus every castle's health.
    GameStart {
        players: Vec<Participant>,
        castle_health: Vec<(CastleId, u8)>,
    },
    /// Incremental health change for one castle.
    HealthUpdate { castle: CastleId, health: u8 },
    /// Battle over; the winner is the sole castle left standing.
    GameOver { winner: TeamId },
}
