use log::debug;
use serde::Serialize;

use crate::gesture::Gesture;
use crate::note::{Note, NoteId, NoteStatus};
use crate::registry::NoteRegistry;
use crate::window::{MatchWindow, TimingGrade};

/// A discrete player input: when it happened and what the classifier saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub time_ms: i64,
    /// `None` when the classifier had no reading.
    pub observed: Option<Gesture>,
}

impl Attempt {
    pub fn new(time_ms: i64, observed: Option<Gesture>) -> Self {
        Self { time_ms, observed }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgement {
    Perfect,
    Good,
    Miss,
}

impl Judgement {
    pub fn is_combo_break(&self) -> bool {
        matches!(self, Self::Miss)
    }
}

impl From<Judgement> for NoteStatus {
    fn from(judgement: Judgement) -> Self {
        match judgement {
            Judgement::Perfect => NoteStatus::Perfect,
            Judgement::Good => NoteStatus::Good,
            Judgement::Miss => NoteStatus::Miss,
        }
    }
}

/// Who produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    Attempt,
    Sweep,
}

impl OutcomeSource {
    pub fn is_attempt(&self) -> bool {
        matches!(self, Self::Attempt)
    }
}

/// Result of judging exactly one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub note_id: NoteId,
    pub judgement: Judgement,
    /// Signed: negative means early.
    pub delta_ms: i64,
    pub accuracy_ms: i64,
    pub source: OutcomeSource,
    pub gesture_matched: bool,
}

/// Reconciles an attempt against the live notes.
#[derive(Debug, Clone, Copy)]
pub struct HitJudge {
    window: MatchWindow,
}

impl HitJudge {
    pub fn new(window: MatchWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &MatchWindow {
        &self.window
    }

    /// The falling note an attempt at `time_ms` would be judged against:
    /// smallest |delta|, then earliest spawn, then lowest id.
    pub fn nearest<'a>(&self, registry: &'a NoteRegistry, time_ms: i64) -> Option<&'a Note> {
        registry.falling().min_by_key(|note| {
            let delta = time_ms - self.window.expected_arrival_of(note);
            (delta.abs(), note.spawn_time_ms(), note.id())
        })
    }

    /// Judge the falling note closest to its expected arrival.
    /// Returns `None` when nothing is falling.
    pub fn judge(&self, registry: &mut NoteRegistry, attempt: &Attempt) -> Option<Outcome> {
        let (id, required, delta_ms) = {
            let note = self.nearest(registry, attempt.time_ms)?;
            let delta_ms = attempt.time_ms - self.window.expected_arrival_of(note);
            (note.id(), note.required_gesture().clone(), delta_ms)
        };
        let accuracy_ms = delta_ms.abs();

        let gesture_matched = attempt.observed.as_ref() == Some(&required);
        let judgement = if !gesture_matched {
            Judgement::Miss
        } else {
            match self.window.grade(accuracy_ms) {
                TimingGrade::Perfect => Judgement::Perfect,
                TimingGrade::Good => Judgement::Good,
                TimingGrade::OutOfWindow => Judgement::Miss,
            }
        };

        if !registry.update_status(id, judgement.into()) {
            // Only reachable if the note stopped falling between selection and write.
            return None;
        }

        debug!(
            "{id}: {judgement:?} (delta {delta_ms}ms, wanted {required}, saw {})",
            attempt
                .observed
                .as_ref()
                .map_or("nothing", |g| g.as_str())
        );

        Some(Outcome {
            note_id: id,
            judgement,
            delta_ms,
            accuracy_ms,
            source: OutcomeSource::Attempt,
            gesture_matched,
        })
    }
}
