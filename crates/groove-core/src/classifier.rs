use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::gesture::{Gesture, GestureAlphabet};

/// One reading from the gesture classifier.
///
/// Wire format: `{"prediction": "Gesture_2", "confidence": 0.93}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierEvent {
    pub prediction: Gesture,
    #[serde(default = "full_confidence")]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

impl ClassifierEvent {
    pub fn new(prediction: impl Into<Gesture>, confidence: f64) -> Self {
        Self {
            prediction: prediction.into(),
            confidence,
        }
    }

    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }
}

/// Holds the most recent classifier reading. Older readings are discarded.
#[derive(Debug, Clone)]
pub struct GestureFeed {
    alphabet: GestureAlphabet,
    latest: Option<ClassifierEvent>,
}

impl GestureFeed {
    pub fn new(alphabet: GestureAlphabet) -> Self {
        Self {
            alphabet,
            latest: None,
        }
    }

    /// Store a reading. Returns whether the observed label changed.
    ///
    /// Labels outside the alphabet are kept (they simply never match a note)
    /// but logged, since they usually mean the classifier and the engine
    /// disagree on the label set.
    pub fn push(&mut self, event: ClassifierEvent) -> bool {
        if !self.alphabet.contains(&event.prediction) {
            warn!("classifier reported unknown gesture {}", event.prediction);
        }
        let changed = self.current() != Some(&event.prediction);
        if changed {
            debug!(
                "gesture now {} ({:.2})",
                event.prediction, event.confidence
            );
        }
        self.latest = Some(event);
        changed
    }

    pub fn current(&self) -> Option<&Gesture> {
        self.latest.as_ref().map(|e| &e.prediction)
    }

    pub fn confidence(&self) -> Option<f64> {
        self.latest.as_ref().map(|e| e.confidence)
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}
