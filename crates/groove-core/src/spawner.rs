use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::gesture::GestureAlphabet;
use crate::note::{Note, NoteId, NoteIdGenerator};
use crate::registry::NoteRegistry;
use crate::timer::IntervalTimer;

/// Creates falling notes on a fixed period.
///
/// Ids come from a generator owned by the spawner and are never reset, so a
/// note id stays unique across sessions of the same engine.
#[derive(Debug)]
pub struct NoteSpawner {
    timer: IntervalTimer,
    alphabet: GestureAlphabet,
    ids: NoteIdGenerator,
    rng: StdRng,
}

impl NoteSpawner {
    pub fn new(alphabet: GestureAlphabet, period_ms: i64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            timer: IntervalTimer::new(period_ms),
            alphabet,
            ids: NoteIdGenerator::new(),
            rng,
        }
    }

    pub fn alphabet(&self) -> &GestureAlphabet {
        &self.alphabet
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_armed()
    }

    /// Start spawning; the first note is due immediately.
    pub fn activate(&mut self, now_ms: i64) {
        self.timer.start(now_ms, true);
    }

    pub fn suspend(&mut self, now_ms: i64) {
        self.timer.suspend(now_ms);
    }

    pub fn resume(&mut self, now_ms: i64) {
        self.timer.resume(now_ms);
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Spawn at most one note if the period came due.
    /// Several overdue periods coalesce into a single note stamped `now_ms`.
    pub fn poll(&mut self, now_ms: i64, registry: &mut NoteRegistry) -> Option<NoteId> {
        let due = self.timer.poll(now_ms);
        if due == 0 {
            return None;
        }
        if due > 1 {
            debug!("spawner fell behind by {} periods", due - 1);
        }
        Some(self.spawn(now_ms, registry))
    }

    fn spawn(&mut self, now_ms: i64, registry: &mut NoteRegistry) -> NoteId {
        let id = self.ids.next_id();
        let gesture = self.alphabet.choose(&mut self.rng);
        debug!("{id}: spawned at {now_ms}ms requiring {gesture}");
        registry.add(Note::new(id, gesture, now_ms));
        id
    }
}
