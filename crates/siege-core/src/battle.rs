//! Castle battle state machine.
//!
//! Four castles keyed by team id, each with a bounded health pool. The
//! machine is deliberately permissive: actions in the wrong phase, on razed
//! castles, or with out-of-range ids are ignored outcomes, never errors, so
//! late or malformed client traffic cannot wedge a session.

use siege_protocol::{CastleId, TeamId, MAX_CASTLE_HEALTH, TEAM_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BattlePhase {
    /// No battle has been started yet.
    #[default]
    Idle,
    /// Castles are live and taking damage.
    Active,
    /// One castle left standing; terminal until the next start.
    Ended,
}

/// Result of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrikeOutcome {
    /// Wrong phase, unknown castle, or castle already razed; nothing changed.
    Ignored,
    Damaged { castle: CastleId, health: u8 },
    /// The castle fell. `winner` is set when its fall ended the battle.
    Razed {
        castle: CastleId,
        winner: Option<TeamId>,
    },
}

/// Result of a repair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Wrong phase, unknown castle, razed castle, or already at full health.
    Ignored,
    Repaired { castle: CastleId, health: u8 },
}

#[derive(Debug, Default)]
pub struct Battle {
    phase: BattlePhase,
    health: [u8; TEAM_COUNT],
}

impl Battle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Start (or restart after `Ended`). A running battle is left untouched;
    /// returns whether the battle actually started.
    pub fn start(&mut self) -> bool {
        if self.phase == BattlePhase::Active {
            return false;
        }
        self.health = [MAX_CASTLE_HEALTH; TEAM_COUNT];
        self.phase = BattlePhase::Active;
        true
    }

    pub fn health(&self, castle: CastleId) -> Option<u8> {
        slot(castle).map(|s| self.health[s])
    }

    /// A castle is active while the battle runs and its health is above zero.
    pub fn is_active(&self, castle: CastleId) -> bool {
        self.phase == BattlePhase::Active
            && slot(castle).is_some_and(|s| self.health[s] > 0)
    }

    pub fn active_castles(&self) -> Vec<CastleId> {
        if self.phase != BattlePhase::Active {
            return Vec::new();
        }
        self.standing()
    }

    /// `(castle, health)` pairs in id order, for the battle-start snapshot.
    pub fn snapshot(&self) -> Vec<(CastleId, u8)> {
        self.health
            .iter()
            .enumerate()
            .map(|(i, &h)| (TeamId(i as u8), h))
            .collect()
    }

    /// Apply one point of damage.
    pub fn strike(&mut self, castle: CastleId) -> StrikeOutcome {
        if self.phase != BattlePhase::Active {
            return StrikeOutcome::Ignored;
        }
        let Some(s) = slot(castle) else {
            return StrikeOutcome::Ignored;
        };
        if self.health[s] == 0 {
            return StrikeOutcome::Ignored;
        }

        self.health[s] -= 1;
        if self.health[s] > 0 {
            return StrikeOutcome::Damaged {
                castle,
                health: self.health[s],
            };
        }

        // the battle ends exactly when one castle remains standing
        let standing = self.standing();
        let winner = if standing.len() == 1 {
            self.phase = BattlePhase::Ended;
            standing.first().copied()
        } else {
            None
        };
        StrikeOutcome::Razed { castle, winner }
    }

    /// Restore one point of health, up to the ceiling.
    pub fn repair(&mut self, castle: CastleId) -> RepairOutcome {
        if self.phase != BattlePhase::Active {
            return RepairOutcome::Ignored;
        }
        let Some(s) = slot(castle) else {
            return RepairOutcome::Ignored;
        };
        if self.health[s] == 0 || self.health[s] >= MAX_CASTLE_HEALTH {
            return RepairOutcome::Ignored;
        }

        self.health[s] += 1;
        RepairOutcome::Repaired {
            castle,
            health: self.health[s],
        }
    }

    fn standing(&self) -> Vec<CastleId> {
        self.health
            .iter()
            .enumerate()
            .filter(|(_, &h)| h > 0)
            .map(|(i, _)| TeamId(i as u8))
            .collect()
    }
}

fn slot(castle: CastleId) -> Option<usize> {
    let s = castle.0 as usize;
    (s < TEAM_COUNT).then_some(s)
}
