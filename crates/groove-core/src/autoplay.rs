//! Bot player that hits every note.

use log::debug;

use crate::engine::GameEngine;
use crate::judge::{HitJudge, Outcome};
use crate::phase::Phase;
use crate::time::TimeProvider;

/// Shows the required gesture and attempts once a note reaches its
/// expected arrival (shifted by `offset_ms`; negative hits early).
///
/// The bot only attempts when the note the judge would pick is due. With a
/// late offset of half a spawn period or more the next note is always
/// nearer, so the bot waits for it and the overdue note is swept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoPlayer {
    offset_ms: i64,
}

impl AutoPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset_ms: i64) -> Self {
        Self { offset_ms }
    }

    pub fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// Hit every note that is due. Call once per frame after `tick`.
    pub fn step<T: TimeProvider>(&self, engine: &mut GameEngine<T>) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        if engine.phase() != Phase::Playing {
            return outcomes;
        }
        let now_ms = engine.now_ms();

        let judge = HitJudge::new(*engine.window());
        loop {
            let due = judge
                .nearest(engine.registry(), now_ms)
                .filter(|note| judge.window().expected_arrival_of(note) + self.offset_ms <= now_ms)
                .map(|note| note.required_gesture().clone());
            let Some(gesture) = due else {
                break;
            };

            engine.on_gesture(gesture.clone(), 1.0);
            match engine.attempt() {
                Some(outcome) => {
                    debug!("autoplay {gesture}: {:?}", outcome.judgement);
                    outcomes.push(outcome);
                }
                None => break,
            }
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::judge::{Judgement, OutcomeSource};
    use crate::time::ManualTimeProvider;

    fn engine(tp: &ManualTimeProvider) -> GameEngine<&ManualTimeProvider> {
        let config = EngineConfig {
            seed: Some(11),
            countdown_from: 0,
            go_hold_ms: 0,
            game_duration_s: 10,
            ..Default::default()
        };
        let mut engine = GameEngine::new(config, tp).unwrap();
        engine.start();
        engine
    }

    fn play(engine: &mut GameEngine<&ManualTimeProvider>, tp: &ManualTimeProvider, bot: AutoPlayer) {
        for _ in 0..1_000 {
            engine.tick();
            bot.step(engine);
            if engine.phase() == Phase::Finished {
                break;
            }
            tp.advance(16);
        }
    }

    #[test]
    fn idle_engine_is_left_alone() {
        let tp = ManualTimeProvider::new();
        let config = EngineConfig::default();
        let mut engine = GameEngine::new(config, &tp).unwrap();
        assert!(AutoPlayer::new().step(&mut engine).is_empty());
        assert!(engine.current_gesture().is_none());
    }

    #[test]
    fn full_combo_on_time() {
        let tp = ManualTimeProvider::new();
        let mut engine = engine(&tp);
        play(&mut engine, &tp, AutoPlayer::new());

        let session = engine.session();
        assert_eq!(engine.phase(), Phase::Finished);
        assert!(session.perfect_count > 0);
        assert_eq!(session.miss_count, 0);
        assert_eq!(session.good_count, 0);
        assert_eq!(session.combo, session.perfect_count);
    }

    #[test]
    fn late_offset_scores_good() {
        let tp = ManualTimeProvider::new();
        let mut engine = engine(&tp);
        play(&mut engine, &tp, AutoPlayer::with_offset(250));

        assert!(
            engine
                .outcomes()
                .iter()
                .all(|o| o.judgement == Judgement::Good)
        );
        assert!(engine.session().good_count > 0);
    }

    fn wide_window_engine(tp: &ManualTimeProvider) -> GameEngine<&ManualTimeProvider> {
        let config = EngineConfig {
            gestures: vec!["A".to_string(), "B".to_string()],
            seed: Some(5),
            countdown_from: 0,
            go_hold_ms: 0,
            game_duration_s: 20,
            good_window_ms: 1_500,
            ..Default::default()
        };
        let mut engine = GameEngine::new(config, tp).unwrap();
        engine.start();
        engine
    }

    #[test]
    fn late_offset_under_half_period_still_hits() {
        let tp = ManualTimeProvider::new();
        let mut engine = wide_window_engine(&tp);
        play(&mut engine, &tp, AutoPlayer::with_offset(900));

        let outcomes = engine.outcomes();
        assert!(!outcomes.is_empty());
        assert!(
            outcomes
                .iter()
                .all(|o| o.judgement == Judgement::Good && o.gesture_matched)
        );
    }

    #[test]
    fn shown_gesture_matches_judged_note() {
        let tp = ManualTimeProvider::new();
        let mut engine = wide_window_engine(&tp);
        let bot = AutoPlayer::with_offset(1_200);

        for _ in 0..1_500 {
            engine.tick();
            for outcome in bot.step(&mut engine) {
                assert!(outcome.gesture_matched, "{outcome:?}");
            }
            if engine.phase() == Phase::Finished {
                break;
            }
            tp.advance(16);
        }
        assert!(
            engine
                .outcomes()
                .iter()
                .all(|o| o.source == OutcomeSource::Sweep)
        );
        assert!(engine.session().miss_count > 0);
    }
}
