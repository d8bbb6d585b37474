//! Session core for the castle-siege lobby: roster, team assignment, and
//! battle state behind one synchronous surface, with no transport attached.

mod battle;
mod rng;
mod roster;
mod session;
mod teams;

pub use crate::battle::{Battle, BattlePhase, RepairOutcome, StrikeOutcome};
pub use crate::rng::SessionRng;
pub use crate::roster::Roster;
pub use crate::session::{Outbound, Session};
pub use crate::teams::{assign_teams, ensure_teams};
