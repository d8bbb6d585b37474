//! Team assignment: one uniform shuffle partitioned into four
//! as-even-as-possible teams, with randomized seat numbers inside each team.

use siege_protocol::{Participant, TeamId, TEAM_COUNT};

use crate::rng::SessionRng;

/// Assign teams and seats to a roster that has none yet.
///
/// Refuses to run (returns false) if any participant already carries a team,
/// so repeated ready requests cannot reshuffle an assigned lobby.
pub fn assign_teams(roster: &mut [Participant], rng: &mut SessionRng) -> bool {
    if roster.iter().any(|p| p.team.is_some()) {
        return false;
    }
    force_assign(roster, rng);
    !roster.is_empty()
}

/// Battle-start path: if anyone lacks a team, reassign the whole roster.
///
/// Returns whether a reassignment happened. This is the one sanctioned reset
/// of an existing assignment.
pub fn ensure_teams(roster: &mut [Participant], rng: &mut SessionRng) -> bool {
    if roster.is_empty() || roster.iter().all(|p| p.team.is_some()) {
        return false;
    }
    force_assign(roster, rng);
    true
}

fn force_assign(roster: &mut [Participant], rng: &mut SessionRng) {
    let n = roster.len();
    let mut order: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut order);

    // base size plus one extra for the first `n % 4` teams, in id order
    let base = n / TEAM_COUNT;
    let remainder = n % TEAM_COUNT;

    let mut cursor = 0;
    for team in 0..TEAM_COUNT {
        let size = base + usize::from(team < remainder);
        let block = &order[cursor..cursor + size];
        cursor += size;

        // seat numbers are an independent permutation of 1..=size
        let mut seats: Vec<u8> = (1..=size as u8).collect();
        rng.shuffle(&mut seats);

        for (&slot, seat) in block.iter().zip(seats) {
            roster[slot].team = Some(TeamId(team as u8));
            roster[slot].seat = Some(seat);
        }
    }
}
