use log::debug;

use crate::judge::{Judgement, Outcome, OutcomeSource};
use crate::note::NoteStatus;
use crate::registry::NoteRegistry;
use crate::window::MatchWindow;

/// What one sweep pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub missed: Vec<Outcome>,
    pub purged: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.missed.is_empty() && self.purged == 0
    }
}

/// Retires notes that fell past their window and drops stale ones.
#[derive(Debug, Clone, Copy)]
pub struct MissSweeper {
    window: MatchWindow,
    purge_age_ms: i64,
}

impl MissSweeper {
    pub fn new(window: MatchWindow, purge_age_ms: i64) -> Self {
        Self {
            window,
            purge_age_ms,
        }
    }

    pub fn sweep(&self, registry: &mut NoteRegistry, now_ms: i64) -> SweepReport {
        let overdue: Vec<_> = registry
            .falling()
            .filter(|note| now_ms > self.window.miss_line_ms(note.spawn_time_ms()))
            .map(|note| (note.id(), now_ms - self.window.expected_arrival_of(note)))
            .collect();

        let mut missed = Vec::with_capacity(overdue.len());
        for (id, delta_ms) in overdue {
            if registry.update_status(id, NoteStatus::Miss) {
                debug!("{id}: swept (late by {delta_ms}ms)");
                missed.push(Outcome {
                    note_id: id,
                    judgement: Judgement::Miss,
                    delta_ms,
                    accuracy_ms: delta_ms.abs(),
                    source: OutcomeSource::Sweep,
                    gesture_matched: false,
                });
            }
        }

        let purged = registry.purge_older_than(now_ms, self.purge_age_ms);
        if purged > 0 {
            debug!("purged {purged} stale notes");
        }

        SweepReport { missed, purged }
    }
}
