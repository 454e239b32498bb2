//! Headless driver for the gesture rhythm engine.
//!
//! Replays a session script and/or lets the autoplay bot play a round, then
//! prints the final snapshot as JSON.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use groove_core::{
    AutoPlayer, EngineConfig, EngineSnapshot, GameEngine, ManualTimeProvider, Phase,
    SessionObserver, SessionScript, SystemTimeProvider, TimeProvider,
};

#[derive(Parser, Debug)]
#[command(name = "groove", version, about = "Gesture rhythm engine driver")]
struct Args {
    /// Engine config (JSON). Defaults to ./groove.json when present.
    #[arg(long, env = "GROOVE_CONFIG")]
    config: Option<PathBuf>,
    /// Session script to replay (JSON lines).
    #[arg(long)]
    script: Option<PathBuf>,
    /// Let the bot hit every note.
    #[arg(long)]
    autoplay: bool,
    /// Autoplay timing offset in ms (negative hits early).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    autoplay_offset_ms: i64,
    /// Override the RNG seed from the config.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the round length from the config.
    #[arg(long)]
    duration_s: Option<u32>,
    /// Simulated frame length.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Run against the wall clock instead of simulating.
    #[arg(long)]
    realtime: bool,
    #[arg(short, long)]
    verbose: bool,
}

/// Logs each new feedback banner once.
#[derive(Default)]
struct FeedbackLog {
    last_shown_at_ms: Option<i64>,
}

impl SessionObserver for FeedbackLog {
    fn on_snapshot(&mut self, snapshot: &EngineSnapshot) {
        let Some(feedback) = &snapshot.feedback else {
            return;
        };
        if self.last_shown_at_ms != Some(feedback.shown_at_ms) {
            self.last_shown_at_ms = Some(feedback.shown_at_ms);
            info!(
                "[{:>6}ms] {:<15} score {:>5} combo {:>3}",
                feedback.shown_at_ms, feedback.text, snapshot.score, snapshot.combo
            );
        }
    }
}

struct Driver {
    script: Option<SessionScript>,
    autoplay: Option<AutoPlayer>,
    frame_ms: u64,
}

impl Driver {
    /// Step the engine frame by frame until the round ends or input runs out.
    fn run<T: TimeProvider>(
        &mut self,
        engine: &mut GameEngine<T>,
        mut advance: impl FnMut(u64),
    ) -> EngineSnapshot {
        let config = engine.config();
        let lead_in_ms = i64::from(config.countdown_from) * 1_000 + config.go_hold_ms;
        let script_end_ms = self
            .script
            .as_ref()
            .and_then(|s| s.last_at_ms())
            .unwrap_or(0);
        let deadline_ms = script_end_ms + lead_in_ms + config.game_duration_ms() + 1_000;

        if self.script.is_none() {
            engine.start();
        }

        loop {
            let source_ms = engine.source_now_ms();
            if let Some(script) = self.script.as_mut() {
                for command in script.poll_up_to(source_ms) {
                    if !command.apply(engine) {
                        log::debug!("script command {command:?} had no effect");
                    }
                }
            }
            engine.tick();
            if let Some(bot) = &self.autoplay {
                bot.step(engine);
            }

            let script_done = self.script.as_ref().is_none_or(|s| s.is_finished());
            match engine.phase() {
                Phase::Finished if script_done => break,
                Phase::Idle if script_done => break,
                _ => {}
            }
            if source_ms > deadline_ms {
                log::warn!("stopping at {source_ms}ms without the round finishing");
                break;
            }
            advance(self.frame_ms);
        }

        engine.snapshot()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("groove={level}")),
    )
    .init();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::load()?,
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(duration_s) = args.duration_s {
        config.game_duration_s = duration_s;
    }

    let script = args.script.as_ref().map(SessionScript::load).transpose()?;
    if script.is_none() && !args.autoplay {
        bail!("nothing to play: pass --script, --autoplay, or both");
    }
    if args.frame_ms == 0 {
        bail!("--frame-ms must be positive");
    }

    let mut driver = Driver {
        script,
        autoplay: args
            .autoplay
            .then(|| AutoPlayer::with_offset(args.autoplay_offset_ms)),
        frame_ms: args.frame_ms,
    };

    let snapshot = if args.realtime {
        let mut engine = GameEngine::new(config, SystemTimeProvider::new())?;
        engine.subscribe(FeedbackLog::default());
        driver.run(&mut engine, |ms| thread::sleep(Duration::from_millis(ms)))
    } else {
        let tp = ManualTimeProvider::new();
        let mut engine = GameEngine::new(config, &tp)?;
        engine.subscribe(FeedbackLog::default());
        driver.run(&mut engine, |ms| tp.advance(ms as i64))
    };

    info!(
        "final: score {} / max combo {} / {}% ({})",
        snapshot.score, snapshot.max_combo, snapshot.accuracy_percent, snapshot.grade
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
