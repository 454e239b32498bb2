use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use groove_core::note::NoteIdGenerator;
use groove_core::sweeper::MissSweeper;
use groove_core::{Attempt, HitJudge, MatchWindow, Note, NoteRegistry};

fn registry_with(count: i64) -> NoteRegistry {
    let mut ids = NoteIdGenerator::new();
    let mut registry = NoteRegistry::new();
    for i in 0..count {
        registry.add(Note::new(ids.next_id(), "A".into(), i * 100));
    }
    registry
}

fn judge_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("judge");
    let judge = HitJudge::new(MatchWindow::new(6_030, 200, 400));

    for count in [8, 64, 512] {
        group.bench_function(format!("nearest_of_{count}"), |b| {
            let attempt = Attempt::new(6_030 + count * 50, Some("A".into()));
            b.iter_batched(
                || registry_with(count),
                |mut registry| judge.judge(&mut registry, black_box(&attempt)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn sweep_benchmark(c: &mut Criterion) {
    let sweeper = MissSweeper::new(MatchWindow::new(6_030, 200, 400), 12_000);

    c.bench_function("sweep_512", |b| {
        b.iter_batched(
            || registry_with(512),
            |mut registry| sweeper.sweep(&mut registry, black_box(40_000)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, judge_benchmark, sweep_benchmark);
criterion_main!(benches);
