//! End-to-end rounds driven through the public engine API with a manual clock.

use std::cell::RefCell;
use std::rc::Rc;

use groove_core::note::NoteIdGenerator;
use groove_core::{
    Attempt, AutoPlayer, EngineConfig, EngineSnapshot, GameEngine, Grade, HitJudge, Judgement,
    ManualTimeProvider, MatchWindow, Note, NoteRegistry, NoteStatus, OutcomeSource, Phase,
    SessionScript, TimeProvider,
};

const STEP_MS: i64 = 10;

fn single_gesture() -> EngineConfig {
    EngineConfig {
        gestures: vec!["A".to_string()],
        seed: Some(1),
        countdown_from: 0,
        go_hold_ms: 0,
        ..Default::default()
    }
}

fn run_until(engine: &mut GameEngine<&ManualTimeProvider>, tp: &ManualTimeProvider, t: i64) {
    while tp.now_ms() < t {
        tp.advance(STEP_MS.min(t - tp.now_ms()));
        engine.tick();
    }
}

#[test]
fn test_default_countdown_reaches_play() {
    let tp = ManualTimeProvider::new();
    let config = EngineConfig {
        seed: Some(3),
        ..Default::default()
    };
    let mut engine = GameEngine::new(config, &tp).unwrap();
    let countdowns = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&countdowns);
    engine.subscribe(move |s: &EngineSnapshot| {
        if let Some(c) = s.countdown {
            let mut seen = sink.borrow_mut();
            if seen.last() != Some(&c) {
                seen.push(c);
            }
        }
    });

    assert!(engine.start());
    run_until(&mut engine, &tp, 3_490);
    assert_eq!(engine.phase(), Phase::Countdown);
    assert_eq!(engine.snapshot().countdown, Some(0));

    run_until(&mut engine, &tp, 3_500);
    assert_eq!(engine.phase(), Phase::Playing);
    assert_eq!(*countdowns.borrow(), vec![3, 2, 1, 0]);

    let notes = engine.snapshot().live_notes;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].spawn_time_ms, 3_500);
    assert_eq!(notes[0].expected_arrival_ms, 3_500 + 6_030);
}

#[test]
fn test_perfect_good_and_swept_notes() {
    let tp = ManualTimeProvider::new();
    let mut engine = GameEngine::new(single_gesture(), &tp).unwrap();
    engine.start();
    engine.tick();
    engine.on_gesture("A", 0.95);

    // note spawned at 0: hit 30ms early
    run_until(&mut engine, &tp, 6_000);
    let first = engine.attempt().unwrap();
    assert_eq!(first.judgement, Judgement::Perfect);
    assert_eq!(first.accuracy_ms, 30);

    // note spawned at 2000: hit 270ms late
    run_until(&mut engine, &tp, 8_300);
    let second = engine.attempt().unwrap();
    assert_eq!(second.judgement, Judgement::Good);
    assert_eq!(second.accuracy_ms, 270);

    // note spawned at 4000: never hit, swept by 10_500
    run_until(&mut engine, &tp, 10_500);
    let session = engine.session();
    assert_eq!(session.perfect_count, 1);
    assert_eq!(session.good_count, 1);
    assert_eq!(session.miss_count, 1);
    assert_eq!(session.score, 275);
    assert_eq!(session.combo, 0);
    assert_eq!(session.max_combo, 2);
    assert_eq!(engine.outcomes()[2].source, OutcomeSource::Sweep);
}

#[test]
fn test_every_note_eventually_terminates() {
    let tp = ManualTimeProvider::new();
    let mut engine = GameEngine::new(single_gesture(), &tp).unwrap();
    engine.start();
    engine.tick();

    let window = *engine.window();
    let sweep_ms = engine.config().sweep_period_ms;
    while engine.phase() == Phase::Playing {
        tp.advance(STEP_MS);
        engine.tick();
        let now_ms = engine.now_ms();
        for note in engine.registry().falling() {
            assert!(now_ms <= window.miss_line_ms(note.spawn_time_ms()) + sweep_ms);
        }
    }
    let session = engine.session();
    assert_eq!(session.perfect_count + session.good_count, 0);
    assert!(session.miss_count > 0);
}

#[test]
fn test_nearest_arrival_tie_break() {
    let judge = HitJudge::new(MatchWindow::new(6_030, 200, 400));
    let mut ids = NoteIdGenerator::new();
    let mut registry = NoteRegistry::new();
    let earlier = Note::new(ids.next_id(), "A".into(), 0);
    let later = Note::new(ids.next_id(), "A".into(), 50);
    registry.add(earlier.clone());
    registry.add(later.clone());

    // arrivals 6030 and 6080; attempting halfway picks the earlier note
    let attempt = Attempt::new(6_030 + 25, Some("A".into()));
    let outcome = judge.judge(&mut registry, &attempt).unwrap();
    assert_eq!(outcome.note_id, earlier.id());
    assert_eq!(outcome.judgement, Judgement::Perfect);
    assert!(registry.get(later.id()).unwrap().is_falling());
    assert!(registry.is_processed(earlier.id()));
}

#[test]
fn test_accuracy_and_grade_over_a_round() {
    let tp = ManualTimeProvider::new();
    let config = EngineConfig {
        game_duration_s: 19,
        ..single_gesture()
    };
    let mut engine = GameEngine::new(config, &tp).unwrap();
    engine.start();
    engine.tick();
    engine.on_gesture("A", 1.0);

    // notes spawn every 2s from 0 to 18s (10 notes); arrivals at 6030 + 2000k
    for k in 0..4 {
        run_until(&mut engine, &tp, 6_030 + 2_000 * k);
        assert_eq!(engine.attempt().unwrap().judgement, Judgement::Perfect);
    }
    for k in 4..6 {
        run_until(&mut engine, &tp, 6_280 + 2_000 * k);
        assert_eq!(engine.attempt().unwrap().judgement, Judgement::Good);
    }
    run_until(&mut engine, &tp, 19_000);
    assert_eq!(engine.phase(), Phase::Finished);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.total_notes_spawned, 10);
    assert_eq!(snapshot.perfect_count, 4);
    assert_eq!(snapshot.good_count, 2);
    assert_eq!(snapshot.accuracy_percent, 50);
    assert_eq!(snapshot.grade, Grade::D);
}

#[test]
fn test_reset_from_every_phase() {
    let drivers: [fn(&mut GameEngine<&ManualTimeProvider>, &ManualTimeProvider); 5] = [
        |_, _| {},
        |engine, _| {
            engine.start();
        },
        |engine, tp| {
            engine.start();
            run_until(engine, tp, 3_000);
        },
        |engine, tp| {
            engine.start();
            run_until(engine, tp, 3_000);
            engine.toggle_pause();
        },
        |engine, tp| {
            engine.start();
            run_until(engine, tp, 40_000);
        },
    ];
    let expected = [
        Phase::Idle,
        Phase::Countdown,
        Phase::Playing,
        Phase::Paused,
        Phase::Finished,
    ];

    for (drive, phase) in drivers.iter().zip(expected) {
        let tp = ManualTimeProvider::new();
        let mut engine = GameEngine::new(single_gesture(), &tp).unwrap();
        engine.on_gesture("A", 1.0);
        drive(&mut engine, &tp);
        assert_eq!(engine.phase(), phase);

        for _ in 0..2 {
            engine.reset();
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.phase, Phase::Idle);
            assert_eq!(snapshot.score, 0);
            assert_eq!(snapshot.combo, 0);
            assert_eq!(snapshot.total_notes_spawned, 0);
            assert!(snapshot.live_notes.is_empty());
            assert!(snapshot.current_gesture.is_none());
            assert_eq!(snapshot.time_remaining_s, 30);
        }

        // nothing left running after reset
        run_until(&mut engine, &tp, tp.now_ms() + 5_000);
        assert!(engine.registry().is_empty());
    }
}

#[test]
fn test_script_replay_with_pause() {
    let script_text = r#"
{"at_ms": 0, "command": "start"}
{"at_ms": 10, "command": "gesture", "label": "A", "confidence": 0.9}
{"at_ms": 6030, "command": "attempt"}
{"at_ms": 7000, "command": "pause"}
{"at_ms": 9000, "command": "pause"}
{"at_ms": 10030, "command": "attempt"}
"#;
    let mut script = SessionScript::parse(script_text).unwrap();
    let tp = ManualTimeProvider::new();
    let mut engine = GameEngine::new(single_gesture(), &tp).unwrap();

    let mut t = 0;
    while t <= 10_100 {
        tp.set_time(t);
        for command in script.poll_up_to(engine.source_now_ms()) {
            command.apply(&mut engine);
        }
        engine.tick();
        t += STEP_MS;
    }

    assert!(script.is_finished());
    // two seconds spent paused do not count
    assert_eq!(engine.now_ms(), 8_100);
    let session = engine.session();
    assert_eq!(session.perfect_count, 2);
    assert_eq!(session.combo, 2);
    assert_eq!(session.miss_count, 0);
}

#[test]
fn test_autoplay_round_is_flawless() {
    let tp = ManualTimeProvider::new();
    let config = EngineConfig {
        seed: Some(21),
        game_duration_s: 20,
        ..Default::default()
    };
    let mut engine = GameEngine::new(config, &tp).unwrap();
    let bot = AutoPlayer::new();
    engine.start();

    while engine.phase() != Phase::Finished {
        engine.tick();
        bot.step(&mut engine);
        tp.advance(16);
    }

    let session = engine.session();
    assert!(session.perfect_count >= 6);
    assert_eq!(session.miss_count, 0);
    for view in engine.snapshot().live_notes {
        assert_ne!(view.status, NoteStatus::Miss);
    }
}
