use std::fmt;

use log::{debug, info};
use serde::Serialize;

use crate::timer::{IntervalTimer, OneShotTimer};

const SECOND_MS: i64 = 1_000;

/// Lifecycle of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing running.
    #[default]
    Idle,
    /// Counting down to play, including the "GO!" hold.
    Countdown,
    /// Notes spawn and can be hit.
    Playing,
    /// Play suspended; the game clock is frozen.
    Paused,
    /// Time ran out.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Countdown => "countdown",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Transitions and clock steps reported by [`PhaseController::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Countdown stepped down; 0 means "GO!".
    CountdownTick { remaining: u32 },
    EnteredPlaying,
    /// One second of play elapsed.
    ClockTick { remaining_s: u32 },
    Finished,
}

/// Drives countdown, "GO!" hold and the round clock.
///
/// Owns only its own timers. The engine reacts to the returned events by
/// starting or stopping spawning and sweeping.
#[derive(Debug, Clone)]
pub struct PhaseController {
    phase: Phase,
    countdown_from: u32,
    go_hold_ms: i64,
    game_duration_s: u32,
    countdown: Option<u32>,
    time_remaining_s: u32,
    countdown_timer: IntervalTimer,
    go_timer: OneShotTimer,
    round_timer: IntervalTimer,
}

impl PhaseController {
    pub fn new(countdown_from: u32, go_hold_ms: i64, game_duration_s: u32) -> Self {
        Self {
            phase: Phase::Idle,
            countdown_from,
            go_hold_ms,
            game_duration_s,
            countdown: None,
            time_remaining_s: game_duration_s,
            countdown_timer: IntervalTimer::new(SECOND_MS),
            go_timer: OneShotTimer::new(),
            round_timer: IntervalTimer::new(SECOND_MS),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Countdown value while counting down; `Some(0)` during the "GO!" hold.
    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    pub fn time_remaining_s(&self) -> u32 {
        self.time_remaining_s
    }

    /// `Idle -> Countdown`. Any other phase is left alone.
    pub fn start(&mut self, now_ms: i64) -> bool {
        if self.phase != Phase::Idle {
            debug!("start ignored in {} phase", self.phase);
            return false;
        }
        self.phase = Phase::Countdown;
        self.countdown = Some(self.countdown_from);
        if self.countdown_from == 0 {
            self.go_timer.arm(now_ms + self.go_hold_ms);
        } else {
            self.countdown_timer.start(now_ms, false);
        }
        info!("countdown from {}", self.countdown_from);
        true
    }

    /// `Playing <-> Paused`. The round timer keeps its remaining delay.
    pub fn toggle_pause(&mut self, now_ms: i64) -> bool {
        match self.phase {
            Phase::Playing => {
                self.round_timer.suspend(now_ms);
                self.phase = Phase::Paused;
                info!("paused with {}s left", self.time_remaining_s);
                true
            }
            Phase::Paused => {
                self.round_timer.resume(now_ms);
                self.phase = Phase::Playing;
                info!("resumed");
                true
            }
            other => {
                debug!("pause ignored in {other} phase");
                false
            }
        }
    }

    /// Back to `Idle` from anywhere, cancelling every timer.
    pub fn reset(&mut self) {
        self.countdown_timer.stop();
        self.go_timer.cancel();
        self.round_timer.stop();
        self.countdown = None;
        self.time_remaining_s = self.game_duration_s;
        if self.phase != Phase::Idle {
            info!("reset from {} phase", self.phase);
        }
        self.phase = Phase::Idle;
    }

    /// Advance timers to `now_ms` and report what happened, in order.
    pub fn poll(&mut self, now_ms: i64) -> Vec<PhaseEvent> {
        let mut events = Vec::new();
        match self.phase {
            Phase::Countdown => {
                self.poll_countdown(now_ms, &mut events);
                if self.go_timer.poll(now_ms) {
                    self.enter_playing(now_ms, &mut events);
                }
            }
            Phase::Playing => self.poll_round(now_ms, &mut events),
            Phase::Idle | Phase::Paused | Phase::Finished => {}
        }
        events
    }

    fn poll_countdown(&mut self, now_ms: i64, events: &mut Vec<PhaseEvent>) {
        let Some(first_due_ms) = self.countdown_timer.next_due_ms() else {
            return;
        };
        let steps = self.countdown_timer.poll(now_ms);
        for step in 0..steps {
            let remaining = self.countdown.unwrap_or(0).saturating_sub(1);
            self.countdown = Some(remaining);
            events.push(PhaseEvent::CountdownTick { remaining });
            if remaining == 0 {
                // hold "GO!" measured from the instant the countdown hit zero
                let zero_at_ms = first_due_ms + i64::from(step) * SECOND_MS;
                self.countdown_timer.stop();
                self.go_timer.arm(zero_at_ms + self.go_hold_ms);
                info!("GO!");
                break;
            }
        }
    }

    fn enter_playing(&mut self, now_ms: i64, events: &mut Vec<PhaseEvent>) {
        self.phase = Phase::Playing;
        self.countdown = None;
        self.time_remaining_s = self.game_duration_s;
        self.round_timer.start(now_ms, false);
        info!("playing for {}s", self.game_duration_s);
        events.push(PhaseEvent::EnteredPlaying);
    }

    fn poll_round(&mut self, now_ms: i64, events: &mut Vec<PhaseEvent>) {
        let seconds = self.round_timer.poll(now_ms);
        for _ in 0..seconds {
            self.time_remaining_s = self.time_remaining_s.saturating_sub(1);
            events.push(PhaseEvent::ClockTick {
                remaining_s: self.time_remaining_s,
            });
            if self.time_remaining_s == 0 {
                self.round_timer.stop();
                self.phase = Phase::Finished;
                info!("time up");
                events.push(PhaseEvent::Finished);
                break;
            }
        }
    }
}
