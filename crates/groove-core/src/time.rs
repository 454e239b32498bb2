/// Abstraction over time sources.
/// Implementations: SystemTimeProvider (production), ManualTimeProvider (simulation and testing).
pub trait TimeProvider {
    /// Current time in milliseconds from an arbitrary, monotonic epoch.
    fn now_ms(&self) -> i64;
}

impl<T: TimeProvider + ?Sized> TimeProvider for &T {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// System time provider using std::time::Instant.
pub struct SystemTimeProvider {
    start: std::time::Instant,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_ms(&self) -> i64 {
        self.start.elapsed().as_millis() as i64
    }
}

/// Manually advanced time provider for deterministic simulation.
#[derive(Debug, Default)]
pub struct ManualTimeProvider {
    current_ms: std::cell::Cell<i64>,
}

impl ManualTimeProvider {
    pub fn new() -> Self {
        Self {
            current_ms: std::cell::Cell::new(0),
        }
    }

    pub fn set_time(&self, ms: i64) {
        self.current_ms.set(ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.current_ms.set(self.current_ms.get() + delta_ms);
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now_ms(&self) -> i64 {
        self.current_ms.get()
    }
}

/// Game clock layered over a [`TimeProvider`].
///
/// While paused the clock reads the instant the pause began, and the paused
/// span is subtracted afterwards, so every timestamp derived from it (spawn
/// times, expected arrivals, attempt times) ignores time spent paused.
#[derive(Debug)]
pub struct GameClock<T> {
    source: T,
    paused_at_ms: Option<i64>,
    paused_total_ms: i64,
}

impl<T: TimeProvider> GameClock<T> {
    pub fn new(source: T) -> Self {
        Self {
            source,
            paused_at_ms: None,
            paused_total_ms: 0,
        }
    }

    /// Current game time in milliseconds.
    pub fn now_ms(&self) -> i64 {
        let raw = self.paused_at_ms.unwrap_or_else(|| self.source.now_ms());
        raw - self.paused_total_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at_ms.is_some()
    }

    /// Freeze the clock. No-op if already paused.
    pub fn pause(&mut self) {
        if self.paused_at_ms.is_none() {
            self.paused_at_ms = Some(self.source.now_ms());
        }
    }

    /// Unfreeze the clock. No-op if not paused.
    pub fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at_ms.take() {
            self.paused_total_ms += self.source.now_ms() - paused_at;
        }
    }

    /// The underlying time source.
    pub fn source(&self) -> &T {
        &self.source
    }
}
