use serde::{Deserialize, Serialize};

/// Team index, 0..=3. Castles share the same key space, so the team id is
/// also the castle id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

pub type CastleId = TeamId;

/// Participant identity, unique per connection.
///
/// Real participants reuse the transport client id. Synthetic participants
/// allocate from a reserved range with the high bit set, so the two can
/// never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl ParticipantId {
    const SYNTHETIC_BIT: u64 = 1 << 63;

    #[inline]
    pub const fn from_client(client_id: u64) -> Self {
        Self(client_id & !Self::SYNTHETIC_BIT)
    }

    #[inline]
    pub const fn synthetic(index: u64) -> Self {
        Self(index | Self::SYNTHETIC_BIT)
    }

    #[inline]
    pub const fn is_synthetic(self) -> bool {
        self.0 & Self::SYNTHETIC_BIT != 0
    }

    /// The transport client id behind a real participant, if any.
    #[inline]
    pub const fn client_id(self) -> Option<u64> {
        if self.is_synthetic() {
            None
        } else {
            Some(self.0)
        }
    }
}
