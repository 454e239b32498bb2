use std::fmt;

use serde::Serialize;

use crate::gesture::Gesture;

/// Opaque note identifier, unique for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "note-{}", self.0)
    }
}

/// Monotonic id source. Never reused, not even across session resets.
#[derive(Debug, Clone, Default)]
pub struct NoteIdGenerator {
    next: u64,
}

impl NoteIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NoteId {
        let id = NoteId(self.next);
        self.next += 1;
        id
    }
}

/// Lifecycle state of a note. `Falling` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    Falling,
    Perfect,
    Good,
    Miss,
}

impl NoteStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Falling)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    required_gesture: Gesture,
    spawn_time_ms: i64,
    pub(crate) status: NoteStatus,
}

impl Note {
    pub fn new(id: NoteId, required_gesture: Gesture, spawn_time_ms: i64) -> Self {
        Self {
            id,
            required_gesture,
            spawn_time_ms,
            status: NoteStatus::Falling,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn required_gesture(&self) -> &Gesture {
        &self.required_gesture
    }

    pub fn spawn_time_ms(&self) -> i64 {
        self.spawn_time_ms
    }

    pub fn status(&self) -> NoteStatus {
        self.status
    }

    pub fn is_falling(&self) -> bool {
        self.status == NoteStatus::Falling
    }

    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.spawn_time_ms
    }
}

/// Read-only copy of a note handed to display consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteView {
    pub id: NoteId,
    pub gesture: Gesture,
    pub spawn_time_ms: i64,
    pub expected_arrival_ms: i64,
    pub status: NoteStatus,
}
