//! The cooperative scheduler that owns every component.
//!
//! All mutation goes through `&mut GameEngine`, so attempts, classifier
//! readings and timer work never interleave. [`GameEngine::tick`] drains due
//! timers against one clock reading in a fixed order: sweep, spawn, then the
//! phase clock.

use log::{debug, info};

use crate::classifier::{ClassifierEvent, GestureFeed};
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::feedback::{Feedback, FeedbackKind};
use crate::gesture::Gesture;
use crate::judge::{Attempt, HitJudge, Outcome};
use crate::observer::{EngineSnapshot, SessionObserver};
use crate::phase::{Phase, PhaseController, PhaseEvent};
use crate::registry::NoteRegistry;
use crate::score::GameSession;
use crate::spawner::NoteSpawner;
use crate::sweeper::MissSweeper;
use crate::time::{GameClock, TimeProvider};
use crate::timer::IntervalTimer;
use crate::window::MatchWindow;

pub struct GameEngine<T: TimeProvider> {
    config: EngineConfig,
    clock: GameClock<T>,
    phase: PhaseController,
    registry: NoteRegistry,
    spawner: NoteSpawner,
    sweeper: MissSweeper,
    sweep_timer: IntervalTimer,
    judge: HitJudge,
    session: GameSession,
    feed: GestureFeed,
    feedback: Option<Feedback>,
    outcomes: Vec<Outcome>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<T: TimeProvider> GameEngine<T> {
    /// Build an engine in the `Idle` phase. Fails on an invalid config.
    pub fn new(config: EngineConfig, time: T) -> Result<Self, ConfigError> {
        config.validate()?;

        let window = MatchWindow::from_config(&config);
        let alphabet = config.alphabet();
        info!(
            "engine ready: {} gestures, arrival {}ms after spawn, windows {}/{}ms",
            alphabet.len(),
            config.arrival_offset_ms(),
            config.perfect_window_ms,
            config.good_window_ms
        );

        Ok(Self {
            clock: GameClock::new(time),
            phase: PhaseController::new(
                config.countdown_from,
                config.go_hold_ms,
                config.game_duration_s,
            ),
            registry: NoteRegistry::new(),
            spawner: NoteSpawner::new(alphabet.clone(), config.spawn_period_ms, config.seed),
            sweeper: MissSweeper::new(window, config.purge_age_ms()),
            sweep_timer: IntervalTimer::new(config.sweep_period_ms),
            judge: HitJudge::new(window),
            session: GameSession::new(),
            feed: GestureFeed::new(alphabet),
            feedback: None,
            outcomes: Vec::new(),
            observers: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Game time: frozen while paused.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Time straight from the underlying source, ignoring pauses.
    pub fn source_now_ms(&self) -> i64 {
        self.clock.source().now_ms()
    }

    pub fn clock(&self) -> &GameClock<T> {
        &self.clock
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    pub fn window(&self) -> &MatchWindow {
        self.judge.window()
    }

    pub fn current_gesture(&self) -> Option<&Gesture> {
        self.feed.current()
    }

    /// Feedback banner, if still visible.
    pub fn feedback(&self) -> Option<&Feedback> {
        let now_ms = self.now_ms();
        self.feedback
            .as_ref()
            .filter(|f| f.is_visible(now_ms, self.config.feedback_visible_ms))
    }

    /// Every outcome of the current round, in the order it was scored.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Begin a countdown. From `Finished` the old round is cleared first.
    pub fn start(&mut self) -> bool {
        let now_ms = self.now_ms();
        match self.phase.phase() {
            Phase::Idle => {}
            Phase::Finished => self.clear(),
            other => {
                debug!("start ignored in {other} phase");
                return false;
            }
        }
        let started = self.phase.start(now_ms);
        if started {
            self.notify();
        }
        started
    }

    /// `Playing <-> Paused`. Spawning, sweeping and the round clock are
    /// suspended together and pick up their remaining delays on resume.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase.phase() {
            Phase::Playing => {
                let now_ms = self.now_ms();
                self.spawner.suspend(now_ms);
                self.sweep_timer.suspend(now_ms);
                self.phase.toggle_pause(now_ms);
                self.clock.pause();
            }
            Phase::Paused => {
                self.clock.resume();
                let now_ms = self.now_ms();
                self.spawner.resume(now_ms);
                self.sweep_timer.resume(now_ms);
                self.phase.toggle_pause(now_ms);
            }
            other => {
                debug!("pause ignored in {other} phase");
                return false;
            }
        }
        self.notify();
        true
    }

    /// Return to `Idle` from any phase, discarding the round.
    pub fn reset(&mut self) {
        self.clear();
        self.notify();
    }

    fn clear(&mut self) {
        self.clock.resume();
        self.phase.reset();
        self.spawner.stop();
        self.sweep_timer.stop();
        self.registry.clear();
        self.session.reset();
        self.feed.clear();
        self.feedback = None;
        self.outcomes.clear();
    }

    /// Run every timer that came due. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let now_ms = self.now_ms();
        let mut changed = false;

        if self.sweep_timer.poll(now_ms) > 0 {
            let report = self.sweeper.sweep(&mut self.registry, now_ms);
            changed |= !report.is_empty();
            if !report.missed.is_empty() {
                // one banner per pass, however many notes it caught
                self.feedback = Some(Feedback::new(FeedbackKind::Miss, now_ms));
            }
            for outcome in report.missed {
                self.score(outcome);
            }
        }

        if self.spawner.poll(now_ms, &mut self.registry).is_some() {
            self.session.record_spawn();
            changed = true;
        }

        for event in self.phase.poll(now_ms) {
            self.on_phase_event(event, now_ms);
            changed = true;
        }

        if let Some(feedback) = &self.feedback {
            if !feedback.is_visible(now_ms, self.config.feedback_visible_ms) {
                self.feedback = None;
                changed = true;
            }
        }

        if changed {
            self.notify();
        }
        changed
    }

    fn on_phase_event(&mut self, event: PhaseEvent, now_ms: i64) {
        match event {
            PhaseEvent::CountdownTick { remaining } => debug!("countdown {remaining}"),
            PhaseEvent::EnteredPlaying => {
                self.session.reset();
                self.registry.clear();
                self.outcomes.clear();
                self.feedback = None;
                self.spawner.activate(now_ms);
                if self.spawner.poll(now_ms, &mut self.registry).is_some() {
                    self.session.record_spawn();
                }
                self.sweep_timer.start(now_ms, false);
            }
            PhaseEvent::ClockTick { remaining_s } => debug!("{remaining_s}s left"),
            PhaseEvent::Finished => {
                self.spawner.stop();
                self.sweep_timer.stop();
                let session = &self.session;
                info!(
                    "round over: score {} (max combo {}, {} perfect / {} good / {} miss of {} notes, {}% {})",
                    session.score,
                    session.max_combo,
                    session.perfect_count,
                    session.good_count,
                    session.miss_count,
                    session.total_notes_spawned,
                    session.accuracy_percent(),
                    session.grade()
                );
            }
        }
    }

    /// Record a classifier reading. Accepted in every phase.
    pub fn on_gesture(&mut self, label: impl Into<Gesture>, confidence: f64) -> bool {
        self.push_event(ClassifierEvent::new(label, confidence))
    }

    pub fn push_event(&mut self, event: ClassifierEvent) -> bool {
        let changed = self.feed.push(event);
        if changed {
            self.notify();
        }
        changed
    }

    /// Judge the current gesture against the live notes.
    /// Only has an effect while playing and while some note is still falling.
    pub fn attempt(&mut self) -> Option<Outcome> {
        if self.phase.phase() != Phase::Playing {
            debug!("attempt ignored in {} phase", self.phase.phase());
            return None;
        }
        let now_ms = self.now_ms();
        let attempt = Attempt::new(now_ms, self.feed.current().cloned());
        let Some(outcome) = self.judge.judge(&mut self.registry, &attempt) else {
            debug!("attempt at {now_ms}ms found no falling note");
            return None;
        };
        self.feedback = Some(Feedback::new(FeedbackKind::from_outcome(&outcome), now_ms));
        self.score(outcome.clone());
        self.notify();
        Some(outcome)
    }

    fn score(&mut self, outcome: Outcome) {
        self.session.apply(
            &outcome,
            self.config.perfect_points,
            self.config.good_points,
        );
        self.outcomes.push(outcome);
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let session = &self.session;
        EngineSnapshot {
            now_ms: self.now_ms(),
            phase: self.phase.phase(),
            score: session.score,
            combo: session.combo,
            max_combo: session.max_combo,
            perfect_count: session.perfect_count,
            good_count: session.good_count,
            miss_count: session.miss_count,
            total_notes_spawned: session.total_notes_spawned,
            accuracy_percent: session.accuracy_percent(),
            grade: session.grade(),
            time_remaining_s: self.phase.time_remaining_s(),
            countdown: self.phase.countdown(),
            current_gesture: self.feed.current().cloned(),
            feedback: self.feedback().cloned(),
            live_notes: self.registry.snapshot(self.judge.window()),
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer.on_snapshot(&snapshot);
        }
    }
}
