use crate::config::EngineConfig;
use crate::note::Note;

/// Timing grade before the gesture gate is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingGrade {
    Perfect,
    Good,
    OutOfWindow,
}

/// Where a note is expected to be hit and how much slack each grade gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWindow {
    /// Spawn to expected arrival (fall * target fraction + perception offset).
    arrival_offset_ms: i64,
    perfect_ms: i64,
    good_ms: i64,
}

impl MatchWindow {
    pub fn new(arrival_offset_ms: i64, perfect_ms: i64, good_ms: i64) -> Self {
        Self {
            arrival_offset_ms,
            perfect_ms,
            good_ms,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.arrival_offset_ms(),
            config.perfect_window_ms,
            config.good_window_ms,
        )
    }

    pub fn perfect_ms(&self) -> i64 {
        self.perfect_ms
    }

    pub fn good_ms(&self) -> i64 {
        self.good_ms
    }

    pub fn expected_arrival_ms(&self, spawn_time_ms: i64) -> i64 {
        spawn_time_ms + self.arrival_offset_ms
    }

    pub fn expected_arrival_of(&self, note: &Note) -> i64 {
        self.expected_arrival_ms(note.spawn_time_ms())
    }

    /// Past this instant an unhit note is a sweep-miss.
    pub fn miss_line_ms(&self, spawn_time_ms: i64) -> i64 {
        self.expected_arrival_ms(spawn_time_ms) + self.good_ms
    }

    /// Both bounds are exclusive: exactly `perfect_ms` off is good, exactly `good_ms` off is out.
    pub fn grade(&self, accuracy_ms: i64) -> TimingGrade {
        if accuracy_ms < self.perfect_ms {
            TimingGrade::Perfect
        } else if accuracy_ms < self.good_ms {
            TimingGrade::Good
        } else {
            TimingGrade::OutOfWindow
        }
    }
}
