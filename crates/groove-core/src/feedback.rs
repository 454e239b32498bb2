use serde::Serialize;

use crate::judge::{Judgement, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Perfect,
    Good,
    Miss,
    WrongGesture,
}

impl FeedbackKind {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome.judgement {
            Judgement::Perfect => Self::Perfect,
            Judgement::Good => Self::Good,
            Judgement::Miss if !outcome.gesture_matched && outcome.source.is_attempt() => {
                Self::WrongGesture
            }
            Judgement::Miss => Self::Miss,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Perfect => "PERFECT!",
            Self::Good => "GOOD!",
            Self::Miss => "MISS!",
            Self::WrongGesture => "WRONG GESTURE!",
        }
    }
}

/// Latest judgement banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: &'static str,
    pub shown_at_ms: i64,
}

impl Feedback {
    pub fn new(kind: FeedbackKind, shown_at_ms: i64) -> Self {
        Self {
            kind,
            text: kind.text(),
            shown_at_ms,
        }
    }

    /// Shown through the last millisecond of the window, inclusive.
    pub fn is_visible(&self, now_ms: i64, visible_ms: i64) -> bool {
        now_ms - self.shown_at_ms <= visible_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::OutcomeSource;
    use crate::note::NoteIdGenerator;

    fn outcome(judgement: Judgement, source: OutcomeSource, gesture_matched: bool) -> Outcome {
        Outcome {
            note_id: NoteIdGenerator::new().next_id(),
            judgement,
            delta_ms: 0,
            accuracy_ms: 0,
            source,
            gesture_matched,
        }
    }

    #[test]
    fn kind_from_outcome() {
        let attempt = OutcomeSource::Attempt;
        assert_eq!(
            FeedbackKind::from_outcome(&outcome(Judgement::Perfect, attempt, true)),
            FeedbackKind::Perfect
        );
        assert_eq!(
            FeedbackKind::from_outcome(&outcome(Judgement::Good, attempt, true)),
            FeedbackKind::Good
        );
        assert_eq!(
            FeedbackKind::from_outcome(&outcome(Judgement::Miss, attempt, true)),
            FeedbackKind::Miss
        );
        assert_eq!(
            FeedbackKind::from_outcome(&outcome(Judgement::Miss, attempt, false)),
            FeedbackKind::WrongGesture
        );
        assert_eq!(
            FeedbackKind::from_outcome(&outcome(Judgement::Miss, OutcomeSource::Sweep, false)),
            FeedbackKind::Miss
        );
    }

    #[test]
    fn visibility_window() {
        let feedback = Feedback::new(FeedbackKind::Good, 1_000);
        assert_eq!(feedback.text, "GOOD!");
        assert!(feedback.is_visible(1_000, 500));
        assert!(feedback.is_visible(1_499, 500));
        assert!(feedback.is_visible(1_500, 500));
        assert!(!feedback.is_visible(1_501, 500));
    }
}
