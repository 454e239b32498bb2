use std::collections::BTreeMap;

use log::debug;

use crate::note::{Note, NoteId, NoteStatus, NoteView};
use crate::window::MatchWindow;

/// Authoritative collection of live notes.
///
/// Keyed by id; ids are monotonic, so iteration order is spawn order.
/// Every operation is total: unknown ids are ignored rather than reported,
/// since a note can legitimately vanish (purge) between two mutators.
#[derive(Debug, Clone, Default)]
pub struct NoteRegistry {
    notes: BTreeMap<NoteId, Note>,
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, note: Note) {
        let id = note.id();
        if self.notes.insert(id, note).is_some() {
            debug!("{id} re-added; previous entry replaced");
        }
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    /// Notes that can still be judged.
    pub fn falling(&self) -> impl Iterator<Item = &Note> {
        self.notes.values().filter(|n| n.is_falling())
    }

    /// Whether a note can no longer be judged. Unknown ids count as processed.
    pub fn is_processed(&self, id: NoteId) -> bool {
        self.notes.get(&id).is_none_or(|n| n.status().is_terminal())
    }

    /// Move a falling note to a terminal status.
    /// Returns false (and changes nothing) for unknown ids, notes already
    /// judged, or a `Falling` target.
    pub fn update_status(&mut self, id: NoteId, status: NoteStatus) -> bool {
        if !status.is_terminal() {
            return false;
        }
        match self.notes.get_mut(&id) {
            Some(note) if note.is_falling() => {
                note.status = status;
                true
            }
            _ => false,
        }
    }

    /// Drop every note with `now - spawn_time > max_age_ms`, whatever its status.
    pub fn purge_older_than(&mut self, now_ms: i64, max_age_ms: i64) -> usize {
        let before = self.notes.len();
        self.notes.retain(|_, note| note.age_ms(now_ms) <= max_age_ms);
        before - self.notes.len()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Read-only copies for display.
    pub fn snapshot(&self, window: &MatchWindow) -> Vec<NoteView> {
        self.notes
            .values()
            .map(|note| NoteView {
                id: note.id(),
                gesture: note.required_gesture().clone(),
                spawn_time_ms: note.spawn_time_ms(),
                expected_arrival_ms: window.expected_arrival_of(note),
                status: note.status(),
            })
            .collect()
    }
}
