use serde::{Deserialize, Serialize};

use crate::{ParticipantId, TeamId};

/// Roster entry as broadcast to clients.
///
/// `team` and `seat` stay unset until the assignment engine runs; `seat` is
/// the per-team 1-based ordinal distinguishing members within a team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub team: Option<TeamId>,
    #[serde(default)]
    pub seat: Option<u8>,
    /// Unix timestamp in milliseconds.
    pub joined_at_ms: u64,
    /// Filler entries added at startup; never removed by disconnect.
    pub synthetic: bool,
}

impl Participant {
    pub fn new(id: ParticipantId, name: String, joined_at_ms: u64) -> Self {
        Self {
            id,
            name,
            team: None,
            seat: None,
            joined_at_ms,
            synthetic: id.is_synthetic(),
        }
    }
}
