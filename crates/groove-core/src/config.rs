use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gesture::{Gesture, GestureAlphabet};

const CONFIG_FILE: &str = "groove.json";

/// Engine tuning. Every value can be overridden from a JSON file;
/// missing keys fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of a round once play starts (seconds).
    pub game_duration_s: u32,
    /// Time for a note to fall the full lane (ms).
    pub fall_duration_ms: i64,
    pub spawn_period_ms: i64,
    pub sweep_period_ms: i64,
    /// Half-width for a perfect judgement (ms).
    pub perfect_window_ms: i64,
    /// Full width for a good judgement; past it a note is swept (ms).
    pub good_window_ms: i64,
    /// Added to the geometric arrival to account for player reaction (ms).
    pub perception_offset_ms: i64,
    /// Target zone position as a fraction of the fall (0.75 = three quarters down).
    pub target_zone_fraction: f64,
    /// Notes older than this many fall durations are dropped.
    pub purge_factor: f64,
    pub perfect_points: u32,
    pub good_points: u32,
    pub gestures: Vec<String>,
    pub countdown_from: u32,
    /// How long "GO!" is held after the countdown before play starts (ms).
    pub go_hold_ms: i64,
    pub feedback_visible_ms: i64,
    /// Fixed RNG seed for reproducible note sequences.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            game_duration_s: 30,
            fall_duration_ms: 8_000,
            spawn_period_ms: 2_000,
            sweep_period_ms: 100,
            perfect_window_ms: 200,
            good_window_ms: 400,
            perception_offset_ms: 30,
            target_zone_fraction: 0.75,
            purge_factor: 1.5,
            perfect_points: 200,
            good_points: 75,
            gestures: (0..6).map(|i| format!("Gesture_{i}")).collect(),
            countdown_from: 3,
            go_hold_ms: 500,
            feedback_visible_ms: 500,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads config from the default config file.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check every constraint the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gestures.is_empty() {
            return Err(ConfigError::EmptyGestureAlphabet);
        }
        let mut seen = HashSet::new();
        for gesture in &self.gestures {
            if !seen.insert(gesture.as_str()) {
                return Err(ConfigError::DuplicateGesture(gesture.clone()));
            }
        }

        let positive = [
            ("game_duration_s", i64::from(self.game_duration_s)),
            ("fall_duration_ms", self.fall_duration_ms),
            ("spawn_period_ms", self.spawn_period_ms),
            ("sweep_period_ms", self.sweep_period_ms),
            ("perfect_window_ms", self.perfect_window_ms),
            ("good_window_ms", self.good_window_ms),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("go_hold_ms", self.go_hold_ms),
            ("feedback_visible_ms", self.feedback_visible_ms),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.perfect_window_ms >= self.good_window_ms {
            return Err(ConfigError::WindowOrder {
                perfect_ms: self.perfect_window_ms,
                good_ms: self.good_window_ms,
            });
        }
        if !(self.target_zone_fraction > 0.0 && self.target_zone_fraction <= 1.0) {
            return Err(ConfigError::TargetFraction(self.target_zone_fraction));
        }
        if !(self.purge_factor > 0.0) || !self.purge_factor.is_finite() {
            return Err(ConfigError::PurgeFactor(self.purge_factor));
        }

        let arrival_offset_ms = scaled_ms(self.fall_duration_ms, self.target_zone_fraction)
            .and_then(|ms| ms.checked_add(self.perception_offset_ms))
            .ok_or(ConfigError::OutOfRange("arrival offset"))?;
        if arrival_offset_ms <= 0 {
            return Err(ConfigError::NonPositive {
                field: "arrival_offset_ms",
                value: arrival_offset_ms,
            });
        }
        let miss_line_ms = arrival_offset_ms
            .checked_add(self.good_window_ms)
            .ok_or(ConfigError::OutOfRange("miss line"))?;
        let purge_age_ms = scaled_ms(self.fall_duration_ms, self.purge_factor)
            .ok_or(ConfigError::OutOfRange("purge age"))?;
        if purge_age_ms <= miss_line_ms {
            return Err(ConfigError::PurgeBeforeMissLine {
                purge_age_ms,
                miss_line_ms,
            });
        }

        // the last note spawns at the end of the round and lives until purged
        i64::from(self.countdown_from)
            .checked_mul(1_000)
            .and_then(|ms| ms.checked_add(self.go_hold_ms))
            .and_then(|ms| ms.checked_add(self.game_duration_ms()))
            .and_then(|ms| ms.checked_add(purge_age_ms))
            .ok_or(ConfigError::OutOfRange("session timeline"))?;

        Ok(())
    }

    /// Time from spawn to expected arrival at the target zone.
    /// Saturates for configs that `validate` rejects.
    pub fn arrival_offset_ms(&self) -> i64 {
        ((self.fall_duration_ms as f64 * self.target_zone_fraction).round() as i64)
            .saturating_add(self.perception_offset_ms)
    }

    /// Age past which notes are dropped from the registry.
    pub fn purge_age_ms(&self) -> i64 {
        (self.fall_duration_ms as f64 * self.purge_factor).round() as i64
    }

    pub fn game_duration_ms(&self) -> i64 {
        i64::from(self.game_duration_s) * 1_000
    }

    pub fn alphabet(&self) -> GestureAlphabet {
        GestureAlphabet::new(self.gestures.iter().map(|g| Gesture::new(g.as_str())).collect())
    }
}

/// `ms * factor` rounded, or `None` when it does not fit in an `i64`.
fn scaled_ms(ms: i64, factor: f64) -> Option<i64> {
    let scaled = (ms as f64 * factor).round();
    // i64::MAX as f64 rounds up to 2^63
    (scaled.is_finite() && scaled >= i64::MIN as f64 && scaled < i64::MAX as f64)
        .then_some(scaled as i64)
}
