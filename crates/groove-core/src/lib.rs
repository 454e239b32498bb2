//! Note lifecycle and hit-judgement engine for a gesture rhythm game.
//!
//! Notes spawn on a schedule, fall toward a target zone and are judged
//! against the most recent classifier reading when the player attempts a
//! hit. Anything left unhit past its window is swept to a miss.

pub mod autoplay;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod gesture;
pub mod judge;
pub mod note;
pub mod observer;
pub mod phase;
pub mod registry;
pub mod score;
pub mod script;
pub mod spawner;
pub mod sweeper;
pub mod time;
pub mod timer;
pub mod window;

pub use autoplay::AutoPlayer;
pub use classifier::{ClassifierEvent, GestureFeed};
pub use config::EngineConfig;
pub use engine::GameEngine;
pub use error::{ConfigError, ScriptError};
pub use feedback::{Feedback, FeedbackKind};
pub use gesture::{Gesture, GestureAlphabet};
pub use judge::{Attempt, HitJudge, Judgement, Outcome, OutcomeSource};
pub use note::{Note, NoteId, NoteStatus, NoteView};
pub use observer::{EngineSnapshot, SessionObserver};
pub use phase::{Phase, PhaseController, PhaseEvent};
pub use registry::NoteRegistry;
pub use score::{GameSession, Grade};
pub use script::{ScriptCommand, SessionScript, TimedCommand};
pub use time::{GameClock, ManualTimeProvider, SystemTimeProvider, TimeProvider};
pub use window::MatchWindow;
