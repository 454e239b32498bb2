use std::fmt;

use serde::Serialize;

use crate::judge::{Judgement, Outcome};

/// Letter grade shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    F,
    D,
    #[serde(rename = "D+")]
    DPlus,
    C,
    #[serde(rename = "C+")]
    CPlus,
    B,
    #[serde(rename = "B+")]
    BPlus,
    A,
    #[serde(rename = "A+")]
    APlus,
    S,
}

impl Grade {
    pub fn from_accuracy(percent: u32) -> Self {
        match percent {
            95.. => Self::S,
            90..=94 => Self::APlus,
            85..=89 => Self::A,
            80..=84 => Self::BPlus,
            75..=79 => Self::B,
            70..=74 => Self::CPlus,
            65..=69 => Self::C,
            60..=64 => Self::DPlus,
            50..=59 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running tallies for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameSession {
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
    pub total_notes_spawned: u32,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_spawn(&mut self) {
        self.total_notes_spawned += 1;
    }

    pub fn apply(&mut self, outcome: &Outcome, perfect_points: u32, good_points: u32) {
        match outcome.judgement {
            Judgement::Perfect => {
                self.score += perfect_points;
                self.perfect_count += 1;
                self.combo += 1;
            }
            Judgement::Good => {
                self.score += good_points;
                self.good_count += 1;
                self.combo += 1;
            }
            Judgement::Miss => {
                self.miss_count += 1;
                self.combo = 0;
            }
        }

        self.max_combo = self.max_combo.max(self.combo);
    }

    pub fn judged_notes(&self) -> u32 {
        self.perfect_count + self.good_count + self.miss_count
    }

    /// Whole-number accuracy over every spawned note; good hits count half.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_notes_spawned == 0 {
            return 0;
        }
        let weighted = f64::from(self.perfect_count) + 0.5 * f64::from(self.good_count);
        (weighted / f64::from(self.total_notes_spawned) * 100.0).round() as u32
    }

    pub fn grade(&self) -> Grade {
        Grade::from_accuracy(self.accuracy_percent())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
