//! The session aggregate: one shared game world behind a synchronous
//! surface.
//!
//! Every inbound event maps to one method; each runs to completion and
//! returns the outbound messages computed strictly after the mutation that
//! produced them, so the gateway can transmit without re-reading state.

use siege_protocol::{
    team_info, CastleId, ClientMessage, Participant, ParticipantId, ServerMessage,
};

use crate::battle::{Battle, BattlePhase, RepairOutcome, StrikeOutcome};
use crate::rng::SessionRng;
use crate::roster::Roster;
use crate::teams::{assign_teams, ensure_teams};

/// An outbound message with its addressing.
#[derive(Clone, Debug)]
pub enum Outbound {
    Broadcast(ServerMessage),
    Unicast {
        to: ParticipantId,
        message: ServerMessage,
    },
}

/// Process-lifetime game world: roster, battle, and the RNG that drives
/// team assignment. There is exactly one of these per server.
pub struct Session {
    roster: Roster,
    battle: Battle,
    rng: SessionRng,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            roster: Roster::new(),
            battle: Battle::new(),
            rng: SessionRng::seed_from_u64(seed),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Populate the lobby with filler participants at startup. Names are
    /// drawn without replacement; join timestamps are jittered up to a
    /// minute into the past so the list does not look machine-stamped.
    pub fn seed_synthetic(&mut self, names: &[String], count: usize, now_ms: u64) -> Vec<Outbound> {
        if names.is_empty() || count == 0 {
            return Vec::new();
        }

        let mut pool: Vec<&String> = names.iter().collect();
        self.rng.shuffle(&mut pool);
        for name in pool.into_iter().take(count) {
            let jitter = self.rng.gen_below_u64(60_000);
            self.roster
                .add_synthetic(name.clone(), now_ms.saturating_sub(jitter));
        }

        vec![self.roster_broadcast()]
    }

    /// Apply one inbound event from a connection.
    pub fn apply(
        &mut self,
        from: ParticipantId,
        message: ClientMessage,
        now_ms: u64,
    ) -> Vec<Outbound> {
        match message {
            ClientMessage::Join { name } => self.join(from, name, now_ms),
            ClientMessage::PlayerReady => self.player_ready(from),
            ClientMessage::StartGame => self.start_battle(),
            ClientMessage::Attack { castle } => self.attack(castle),
            ClientMessage::Repair { castle } => self.repair(castle),
        }
    }

    /// Connection went away. Synthetic participants never leave this way.
    pub fn disconnect(&mut self, id: ParticipantId) -> Vec<Outbound> {
        if id.is_synthetic() || !self.roster.remove(id) {
            return Vec::new();
        }
        vec![self.roster_broadcast()]
    }

    fn join(&mut self, id: ParticipantId, name: String, now_ms: u64) -> Vec<Outbound> {
        if !self.roster.join(id, name, now_ms) {
            return Vec::new();
        }
        vec![self.roster_broadcast()]
    }

    fn player_ready(&mut self, id: ParticipantId) -> Vec<Outbound> {
        if !self.roster.contains(id) {
            return Vec::new();
        }

        // first ready request assigns the whole roster; the guard inside
        // keeps later requests from reshuffling it
        assign_teams(self.roster.participants_mut(), &mut self.rng);

        let Some(participant) = self.roster.get(id) else {
            return Vec::new();
        };
        let (Some(team), Some(seat)) = (participant.team, participant.seat) else {
            // joined after assignment ran; they get a team at battle start
            return Vec::new();
        };
        let Some(info) = team_info(team) else {
            return Vec::new();
        };

        let team_members: Vec<Participant> = self
            .roster
            .participants()
            .iter()
            .filter(|p| p.team == Some(team))
            .cloned()
            .collect();

        vec![Outbound::Unicast {
            to: id,
            message: ServerMessage::TeamAssigned {
                team,
                team_name: info.name.to_string(),
                team_color: info.color,
                team_number: seat,
                team_members,
            },
        }]
    }

    fn start_battle(&mut self) -> Vec<Outbound> {
        if self.battle.phase() == BattlePhase::Active {
            return Vec::new();
        }

        // anyone still without a team forces a full reassignment
        ensure_teams(self.roster.participants_mut(), &mut self.rng);
        self.battle.start();

        vec![Outbound::Broadcast(ServerMessage::GameStart {
            players: self.roster.snapshot(),
            castle_health: self.battle.snapshot(),
        })]
    }

    fn attack(&mut self, castle: CastleId) -> Vec<Outbound> {
        match self.battle.strike(castle) {
            StrikeOutcome::Ignored => Vec::new(),
            StrikeOutcome::Damaged { castle, health } => {
                vec![Outbound::Broadcast(ServerMessage::HealthUpdate {
                    castle,
                    health,
                })]
            }
            StrikeOutcome::Razed { castle, winner } => {
                let mut out = vec![Outbound::Broadcast(ServerMessage::HealthUpdate {
                    castle,
                    health: 0,
                })];
                if let Some(winner) = winner {
                    out.push(Outbound::Broadcast(ServerMessage::GameOver { winner }));
                }
                out
            }
        }
    }

    fn repair(&mut self, castle: CastleId) -> Vec<Outbound> {
        match self.battle.repair(castle) {
            RepairOutcome::Ignored => Vec::new(),
            RepairOutcome::Repaired { castle, health } => {
                vec![Outbound::Broadcast(ServerMessage::HealthUpdate {
                    castle,
                    health,
                })]
            }
        }
    }

    fn roster_broadcast(&self) -> Outbound {
        Outbound::Broadcast(ServerMessage::PlayerList {
            players: self.roster.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siege_protocol::{TeamId, MAX_CASTLE_HEALTH};

    const NOW: u64 = 1_700_000_000_000;

    fn client(n: u64) -> ParticipantId {
        ParticipantId::from_client(n)
    }

    fn join(session: &mut Session, n: u64, name: &str) -> Vec<Outbound> {
        session.apply(
            client(n),
            ClientMessage::Join { name: name.into() },
            NOW + n,
        )
    }

    fn lobby_of(n: u64) -> Session {
        let mut session = Session::new(7);
        for i in 0..n {
            join(&mut session, i, &format!("P{i}"));
        }
        session
    }

    fn broadcasts(effects: &[Outbound]) -> Vec<&ServerMessage> {
        effects
            .iter()
            .filter_map(|e| match e {
                Outbound::Broadcast(m) => Some(m),
                Outbound::Unicast { .. } => None,
            })
            .collect()
    }

    #[test]
    fn join_broadcasts_roster_newest_first() {
        let mut session = Session::new(1);
        join(&mut session, 1, "Alice");
        let effects = join(&mut session, 2, "Bob");

        match broadcasts(&effects).as_slice() {
            [ServerMessage::PlayerList { players }] => {
                let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["Bob", "Alice"]);
            }
            other => panic!("expected one PlayerList, got {other:?}"),
        }
    }

    #[test]
    fn first_ready_assigns_everyone_and_unicasts_own_team() {
        let mut session = lobby_of(5);
        let effects = session.apply(client(0), ClientMessage::PlayerReady, NOW);

        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Outbound::Unicast {
                to,
                message:
                    ServerMessage::TeamAssigned {
                        team,
                        team_name,
                        team_number,
                        team_members,
                        ..
                    },
            } => {
                assert_eq!(*to, client(0));
                assert!(team.0 < 4);
                assert!(!team_name.is_empty());
                assert!(*team_number >= 1);
                assert!(team_members.iter().any(|p| p.id == client(0)));
                assert!(team_members.iter().all(|p| p.team == Some(*team)));
            }
            other => panic!("expected TeamAssigned unicast, got {other:?}"),
        }

        // everyone is assigned now, not just the caller
        assert!(session
            .roster()
            .participants()
            .iter()
            .all(|p| p.team.is_some() && p.seat.is_some()));
    }

    #[test]
    fn repeated_ready_returns_the_same_assignment() {
        let mut session = lobby_of(8);
        session.apply(client(0), ClientMessage::PlayerReady, NOW);
        let first: Vec<_> = session
            .roster()
            .participants()
            .iter()
            .map(|p| (p.id, p.team, p.seat))
            .collect();

        let effects = session.apply(client(3), ClientMessage::PlayerReady, NOW);
        assert_eq!(effects.len(), 1);

        let second: Vec<_> = session
            .roster()
            .participants()
            .iter()
            .map(|p| (p.id, p.team, p.seat))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn ready_from_unknown_connection_is_ignored() {
        let mut session = lobby_of(3);
        let effects = session.apply(client(99), ClientMessage::PlayerReady, NOW);
        assert!(effects.is_empty());
        assert!(session
            .roster()
            .participants()
            .iter()
            .all(|p| p.team.is_none()));
    }

    #[test]
    fn five_participants_split_two_one_one_one() {
        let mut session = lobby_of(5);
        session.apply(client(0), ClientMessage::PlayerReady, NOW);

        let mut sizes = [0usize; 4];
        for p in session.roster().participants() {
            sizes[p.team.unwrap().0 as usize] += 1;
        }
        assert_eq!(sizes, [2, 1, 1, 1]);
    }

    #[test]
    fn attack_before_start_mutates_and_broadcasts_nothing() {
        let mut session = lobby_of(4);
        let effects = session.apply(client(0), ClientMessage::Attack { castle: TeamId(2) }, NOW);
        assert!(effects.is_empty());
        assert_eq!(session.battle().phase(), BattlePhase::Idle);
    }

    #[test]
    fn start_assigns_stragglers_and_snapshots_full_health() {
        let mut session = lobby_of(6);
        let effects = session.apply(client(0), ClientMessage::StartGame, NOW);

        match broadcasts(&effects).as_slice() {
            [ServerMessage::GameStart {
                players,
                castle_health,
            }] => {
                assert_eq!(players.len(), 6);
                assert!(players.iter().all(|p| p.team.is_some()));
                assert_eq!(castle_health.len(), 4);
                assert!(castle_health.iter().all(|&(_, h)| h == MAX_CASTLE_HEALTH));
            }
            other => panic!("expected one GameStart, got {other:?}"),
        }

        // second start while the battle runs is a no-op
        assert!(session
            .apply(client(1), ClientMessage::StartGame, NOW)
            .is_empty());
    }

    #[test]
    fn health_updates_reflect_post_mutation_state() {
        let mut session = lobby_of(4);
        session.apply(client(0), ClientMessage::StartGame, NOW);

        for expected in [9, 8, 7] {
            let effects =
                session.apply(client(1), ClientMessage::Attack { castle: TeamId(0) }, NOW);
            match broadcasts(&effects).as_slice() {
                [ServerMessage::HealthUpdate { castle, health }] => {
                    assert_eq!(*castle, TeamId(0));
                    assert_eq!(*health, expected);
                    assert_eq!(session.battle().health(TeamId(0)), Some(expected));
                }
                other => panic!("expected one HealthUpdate, got {other:?}"),
            }
        }
        for i in 1..4 {
            assert_eq!(session.battle().health(TeamId(i)), Some(10));
        }
    }

    #[test]
    fn repair_at_full_health_broadcasts_nothing() {
        let mut session = lobby_of(4);
        session.apply(client(0), ClientMessage::StartGame, NOW);

        assert!(session
            .apply(client(0), ClientMessage::Repair { castle: TeamId(1) }, NOW)
            .is_empty());

        session.apply(client(0), ClientMessage::Attack { castle: TeamId(1) }, NOW);
        let effects = session.apply(client(0), ClientMessage::Repair { castle: TeamId(1) }, NOW);
        match broadcasts(&effects).as_slice() {
            [ServerMessage::HealthUpdate { castle, health }] => {
                assert_eq!(*castle, TeamId(1));
                assert_eq!(*health, 10);
            }
            other => panic!("expected one HealthUpdate, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_castle_never_mutates() {
        let mut session = lobby_of(4);
        session.apply(client(0), ClientMessage::StartGame, NOW);

        assert!(session
            .apply(client(0), ClientMessage::Attack { castle: TeamId(7) }, NOW)
            .is_empty());
        assert!(session
            .apply(client(0), ClientMessage::Repair { castle: TeamId(7) }, NOW)
            .is_empty());
    }

    #[test]
    fn last_raze_broadcasts_health_then_game_over() {
        let mut session = lobby_of(4);
        session.apply(client(0), ClientMessage::StartGame, NOW);

        for castle in [TeamId(1), TeamId(2)] {
            for _ in 0..MAX_CASTLE_HEALTH {
                session.apply(client(0), ClientMessage::Attack { castle }, NOW);
            }
        }
        assert_eq!(session.battle().phase(), BattlePhase::Active);

        let mut final_effects = Vec::new();
        for _ in 0..MAX_CASTLE_HEALTH {
            final_effects = session.apply(client(0), ClientMessage::Attack { castle: TeamId(3) }, NOW);
        }

        match broadcasts(&final_effects).as_slice() {
            [ServerMessage::HealthUpdate { castle, health }, ServerMessage::GameOver { winner }] => {
                assert_eq!(*castle, TeamId(3));
                assert_eq!(*health, 0);
                assert_eq!(*winner, TeamId(0));
            }
            other => panic!("expected HealthUpdate then GameOver, got {other:?}"),
        }
        assert_eq!(session.battle().phase(), BattlePhase::Ended);

        // late packets after the end are ignored
        assert!(session
            .apply(client(0), ClientMessage::Attack { castle: TeamId(0) }, NOW)
            .is_empty());
    }

    #[test]
    fn disconnect_removes_real_participants_only() {
        let mut session = Session::new(5);
        let names = vec!["Filler".to_string()];
        session.seed_synthetic(&names, 1, NOW);
        join(&mut session, 1, "Alice");
        assert_eq!(session.roster().len(), 2);

        let effects = session.disconnect(client(1));
        match broadcasts(&effects).as_slice() {
            [ServerMessage::PlayerList { players }] => {
                assert_eq!(players.len(), 1);
                assert!(players[0].synthetic);
            }
            other => panic!("expected one PlayerList, got {other:?}"),
        }

        // unknown and synthetic ids fall through silently
        assert!(session.disconnect(client(1)).is_empty());
        let synthetic_id = session.roster().participants()[0].id;
        assert!(session.disconnect(synthetic_id).is_empty());
        assert_eq!(session.roster().len(), 1);
    }

    #[test]
    fn synthetic_seeding_draws_without_replacement() {
        let mut session = Session::new(11);
        let names: Vec<String> = (0..20).map(|i| format!("N{i}")).collect();
        let effects = session.seed_synthetic(&names, 8, NOW);

        assert_eq!(session.roster().len(), 8);
        let mut seen = std::collections::HashSet::new();
        for p in session.roster().participants() {
            assert!(p.synthetic);
            assert!(p.joined_at_ms <= NOW);
            assert!(NOW - p.joined_at_ms < 60_000);
            assert!(seen.insert(p.name.clone()), "duplicate name {}", p.name);
            assert!(names.contains(&p.name));
        }
        assert_eq!(broadcasts(&effects).len(), 1);

        // a request larger than the pool is capped at the pool
        let mut session = Session::new(12);
        session.seed_synthetic(&names[..3], 10, NOW);
        assert_eq!(session.roster().len(), 3);
    }

    #[test]
    fn empty_name_pool_degrades_to_no_fillers() {
        let mut session = Session::new(13);
        assert!(session.seed_synthetic(&[], 10, NOW).is_empty());
        assert!(session.roster().is_empty());
    }
}
