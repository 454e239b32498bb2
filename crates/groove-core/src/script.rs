//! Session scripts: recorded input logs replayed against an engine.
//!
//! One JSON object per line, ordered by `at_ms` (source-clock milliseconds,
//! so a script keeps running while the game clock is paused). Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! {"at_ms": 0, "command": "start"}
//! {"at_ms": 9000, "command": "gesture", "label": "Gesture_2", "confidence": 0.91}
//! {"at_ms": 9030, "command": "attempt"}
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::GameEngine;
use crate::error::ScriptError;
use crate::time::TimeProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ScriptCommand {
    Start,
    /// Toggles between playing and paused.
    Pause,
    Reset,
    Gesture {
        label: String,
        #[serde(default = "full_confidence")]
        confidence: f64,
    },
    Attempt,
}

fn full_confidence() -> f64 {
    1.0
}

impl ScriptCommand {
    /// Apply to the engine. Returns whether the engine accepted it.
    pub fn apply<T: TimeProvider>(&self, engine: &mut GameEngine<T>) -> bool {
        match self {
            Self::Start => engine.start(),
            Self::Pause => engine.toggle_pause(),
            Self::Reset => {
                engine.reset();
                true
            }
            Self::Gesture { label, confidence } => {
                engine.on_gesture(label.as_str(), *confidence);
                true
            }
            Self::Attempt => engine.attempt().is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedCommand {
    pub at_ms: i64,
    #[serde(flatten)]
    pub command: ScriptCommand,
}

/// A parsed script plus a replay cursor.
#[derive(Debug, Clone, Default)]
pub struct SessionScript {
    commands: Vec<TimedCommand>,
    cursor: usize,
}

impl SessionScript {
    pub fn new(commands: Vec<TimedCommand>) -> Self {
        Self {
            commands,
            cursor: 0,
        }
    }

    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut commands: Vec<TimedCommand> = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let command: TimedCommand = serde_json::from_str(line).map_err(|source| {
                ScriptError::Parse {
                    line: index + 1,
                    source,
                }
            })?;
            if let Some(previous) = commands.last() {
                if command.at_ms < previous.at_ms {
                    return Err(ScriptError::OutOfOrder {
                        line: index + 1,
                        at_ms: command.at_ms,
                        previous_ms: previous.at_ms,
                    });
                }
            }
            commands.push(command);
        }
        Ok(Self::new(commands))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let script =
            Self::parse(&text).with_context(|| format!("parsing script {}", path.display()))?;
        Ok(script)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Time of the final command, if any.
    pub fn last_at_ms(&self) -> Option<i64> {
        self.commands.last().map(|c| c.at_ms)
    }

    /// Commands due at or before `time_ms` that have not been returned yet.
    pub fn poll_up_to(&mut self, time_ms: i64) -> Vec<ScriptCommand> {
        let start = self.cursor;
        while self.cursor < self.commands.len() && self.commands[self.cursor].at_ms <= time_ms {
            self.cursor += 1;
        }
        self.commands[start..self.cursor]
            .iter()
            .map(|c| c.command.clone())
            .collect()
    }

    /// Whether every command has been replayed.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.commands.len()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
