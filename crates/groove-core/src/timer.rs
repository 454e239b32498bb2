// Logical timers polled by the engine's cooperative tick.
// Times are game-clock milliseconds; a stopped timer never fires until it is re-armed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Stopped,
    Armed { next_due_ms: i64 },
    Suspended { remaining_ms: i64 },
}

/// Fixed-period timer.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: i64,
    state: TimerState,
}

impl IntervalTimer {
    pub fn new(period_ms: i64) -> Self {
        debug_assert!(period_ms > 0);
        Self {
            period_ms,
            state: TimerState::Stopped,
        }
    }

    pub fn period_ms(&self) -> i64 {
        self.period_ms
    }

    /// Arm the timer. With `fire_immediately` the first period is due at `now_ms`,
    /// otherwise one period later.
    pub fn start(&mut self, now_ms: i64, fire_immediately: bool) {
        let next_due_ms = if fire_immediately {
            now_ms
        } else {
            now_ms + self.period_ms
        };
        self.state = TimerState::Armed { next_due_ms };
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Freeze the timer, remembering how long until it is next due.
    pub fn suspend(&mut self, now_ms: i64) {
        if let TimerState::Armed { next_due_ms } = self.state {
            self.state = TimerState::Suspended {
                remaining_ms: (next_due_ms - now_ms).max(0),
            };
        }
    }

    /// Re-arm a suspended timer with its remaining delay.
    pub fn resume(&mut self, now_ms: i64) {
        if let TimerState::Suspended { remaining_ms } = self.state {
            self.state = TimerState::Armed {
                next_due_ms: now_ms + remaining_ms,
            };
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self.state, TimerState::Suspended { .. })
    }

    /// Next due time, if armed.
    pub fn next_due_ms(&self) -> Option<i64> {
        match self.state {
            TimerState::Armed { next_due_ms } => Some(next_due_ms),
            _ => None,
        }
    }

    /// Number of periods that came due since the last poll.
    /// The schedule stays phase-aligned: late polls do not shift later deadlines.
    pub fn poll(&mut self, now_ms: i64) -> u32 {
        let TimerState::Armed { next_due_ms } = self.state else {
            return 0;
        };
        if now_ms < next_due_ms {
            return 0;
        }
        let elapsed_periods = (now_ms - next_due_ms) / self.period_ms + 1;
        self.state = TimerState::Armed {
            next_due_ms: next_due_ms + elapsed_periods * self.period_ms,
        };
        elapsed_periods as u32
    }
}

/// Single-shot deadline.
#[derive(Debug, Clone, Default)]
pub struct OneShotTimer {
    deadline_ms: Option<i64>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, deadline_ms: i64) {
        self.deadline_ms = Some(deadline_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}
