use cadence::{Scheduler, TimerManager, TimerSpec};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_pop_due_single_weapon(c: &mut Criterion) {
    // One repeating fire timer at 600 rpm, drained at 60 fps
    let mut timers: TimerManager<u64> = TimerManager::new();
    timers.set_timer(TimerSpec::repeating(0.1, 0.0), 1).unwrap();

    c.bench_function("pop_due_single_weapon", |b| {
        b.iter(|| {
            timers.advance(black_box(1.0 / 60.0)).unwrap();
            while let Some(expiry) = timers.pop_due() {
                black_box(expiry);
            }
        })
    });
}

fn bench_pop_due_many_weapons(c: &mut Criterion) {
    // Stress case: a crowded arena with many auto-firing weapons
    let mut timers: TimerManager<u64> = TimerManager::new();
    for id in 0..256u64 {
        #[allow(clippy::cast_precision_loss)]
        let delay = (id % 16) as f64 * 0.01;
        timers.set_timer(TimerSpec::repeating(0.1, delay), id).unwrap();
    }

    c.bench_function("pop_due_many_weapons", |b| {
        b.iter(|| {
            timers.advance(black_box(1.0 / 60.0)).unwrap();
            while let Some(expiry) = timers.pop_due() {
                black_box(expiry);
            }
        })
    });
}

criterion_group!(benches, bench_pop_due_single_weapon, bench_pop_due_many_weapons);
criterion_main!(benches);
