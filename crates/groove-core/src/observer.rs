use serde::Serialize;

use crate::feedback::Feedback;
use crate::gesture::Gesture;
use crate::note::NoteView;
use crate::phase::Phase;
use crate::score::Grade;

/// Everything a display needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub now_ms: i64,
    pub phase: Phase,
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
    pub total_notes_spawned: u32,
    pub accuracy_percent: u32,
    pub grade: Grade,
    pub time_remaining_s: u32,
    pub countdown: Option<u32>,
    pub current_gesture: Option<Gesture>,
    pub feedback: Option<Feedback>,
    pub live_notes: Vec<NoteView>,
}

/// Receives a fresh snapshot after every engine mutation.
pub trait SessionObserver {
    fn on_snapshot(&mut self, snapshot: &EngineSnapshot);
}

impl<F: FnMut(&EngineSnapshot)> SessionObserver for F {
    fn on_snapshot(&mut self, snapshot: &EngineSnapshot) {
        self(snapshot)
    }
}
