//! Shared wire types for the castle-siege session protocol.
//!
//! Everything the server and clients exchange lives here: typed ids, the
//! static team table, roster snapshots, and the message enums with their
//! MessagePack/JSON codecs.

mod ids;
mod message;
mod participant;
mod teams;
pub mod wire;

pub use crate::ids::{CastleId, ParticipantId, TeamId};
pub use crate::message::{ClientMessage, ServerMessage};
pub use crate::participant::Participant;
pub use crate::teams::{team_info, TeamInfo, MAX_CASTLE_HEALTH, TEAM_COUNT, TEAMS};
pub use crate::wire::WireError;
