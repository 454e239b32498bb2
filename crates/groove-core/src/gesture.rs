use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A classified gesture label, e.g. `Gesture_3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gesture(String);

impl Gesture {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Gesture {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Gesture {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// The fixed set of gestures notes can require.
/// Non-empty once validated by [`crate::config::EngineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureAlphabet {
    gestures: Vec<Gesture>,
}

impl GestureAlphabet {
    pub fn new(gestures: Vec<Gesture>) -> Self {
        Self { gestures }
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn contains(&self, gesture: &Gesture) -> bool {
        self.gestures.contains(gesture)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gesture> {
        self.gestures.iter()
    }

    /// Uniformly random gesture.
    ///
    /// # Panics
    /// Panics if the alphabet is empty; the engine never builds one from an
    /// unvalidated config.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Gesture {
        let index = rng.gen_range(0..self.gestures.len());
        self.gestures[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn alphabet() -> GestureAlphabet {
        GestureAlphabet::new(vec!["A".into(), "B".into(), "C".into()])
    }

    #[test]
    fn choose_stays_in_alphabet() {
        let alphabet = alphabet();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let gesture = alphabet.choose(&mut rng);
            assert!(alphabet.contains(&gesture));
        }
    }

    #[test]
    fn choose_reaches_every_gesture() {
        let alphabet = alphabet();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            seen.insert(alphabet.choose(&mut rng));
        }
        assert_eq!(seen.len(), alphabet.len());
    }

    #[test]
    fn same_seed_same_sequence() {
        let alphabet = alphabet();
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        let left: Vec<_> = (0..20).map(|_| alphabet.choose(&mut a)).collect();
        let right: Vec<_> = (0..20).map(|_| alphabet.choose(&mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn gesture_serializes_as_plain_string() {
        let json = serde_json::to_string(&Gesture::new("Gesture_2")).unwrap();
        assert_eq!(json, "\"Gesture_2\"");
    }
}
