//! In-memory roster of connected participants.
//!
//! Real participants are inserted at the front (most-recent-first display
//! order); synthetic fillers are appended and only ever leave via an
//! explicit remove.

use siege_protocol::{Participant, ParticipantId};

#[derive(Debug, Default)]
pub struct Roster {
    entries: Vec<Participant>,
    next_synthetic: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a real participant at the front of the list. A duplicate id is
    /// a no-op; returns whether anything was inserted.
    pub fn join(&mut self, id: ParticipantId, name: String, now_ms: u64) -> bool {
        if self.contains(id) {
            return false;
        }
        self.entries.insert(0, Participant::new(id, name, now_ms));
        true
    }

    /// Append a synthetic filler participant, allocating its id.
    pub fn add_synthetic(&mut self, name: String, joined_at_ms: u64) -> ParticipantId {
        let id = ParticipantId::synthetic(self.next_synthetic);
        self.next_synthetic += 1;
        self.entries.push(Participant::new(id, name, joined_at_ms));
        id
    }

    /// Remove by id; no-op if absent.
    pub fn remove(&mut self, id: ParticipantId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|p| p.id != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.entries.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.entries.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current roster in display order.
    pub fn participants(&self) -> &[Participant] {
        &self.entries
    }

    /// Mutable view for the assignment engine.
    pub fn participants_mut(&mut self) -> &mut [Participant] {
        &mut self.entries
    }

    /// Ordered clone for broadcasting.
    pub fn snapshot(&self) -> Vec<Participant> {
        self.entries.clone()
    }
}
