//! Criterion benchmarks for the value function iteration.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rbc::{Calibration, Solver};

/// Benchmark: full solve on a 2,000-point grid, sequential.
fn bench_solve_sequential(c: &mut Criterion) {
    let calibration = Calibration::benchmark().with_grid(2000, 0.0001, 0.5);

    c.bench_function("solve_2k_sequential", |b| {
        b.iter(|| {
            let solution = Solver::new(calibration.clone()).unwrap().solve();
            black_box(solution.sup_diff());
        });
    });
}

/// Benchmark: the same solve with one worker per productivity state.
fn bench_solve_pooled(c: &mut Criterion) {
    let calibration = Calibration::benchmark().with_grid(2000, 0.0001, 0.5);
    let threads = calibration.n_productivity();

    c.bench_function("solve_2k_pooled", |b| {
        b.iter(|| {
            let solution = Solver::new(calibration.clone())
                .unwrap()
                .with_threads(threads)
                .solve();
            black_box(solution.sup_diff());
        });
    });
}

criterion_group!(benches, bench_solve_sequential, bench_solve_pooled);
criterion_main!(benches);
