//! LOWESS benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Scalability of a plain fit
//! - Fractions and robust passes
//! - Bootstrap confidence bands
//! - Time-adaptive surfaces
//!
//! For serial execution, use `LOWESS_DATES_BACKEND=serial cargo bench`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lowess_dates::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;
use std::env;
use std::hint::black_box;

// ============================================================================
// Helper Functions
// ============================================================================

fn get_config() -> (bool, &'static str) {
    match env::var("LOWESS_DATES_BACKEND").ok().as_deref() {
        Some("serial") => (false, "serial"),
        _ => (true, "parallel"),
    }
}

/// Generate smooth sinusoidal data with Gaussian noise.
fn generate_sine_data(size: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise_dist = Normal::new(0.0, 0.2).unwrap();

    let x: Vec<f64> = (0..size).map(|i| i as f64 * 10.0 / size as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| xi.sin() + noise_dist.sample(&mut rng))
        .collect();
    (x, y)
}

/// Generate daily demand-like data whose level drifts over a year.
fn generate_dated_data(
    days: usize,
    seed: u64,
) -> (Vec<f64>, Vec<f64>, Vec<DateTime<Utc>>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise_dist = Normal::new(0.0, 1.0).unwrap();
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();

    let x: Vec<f64> = (0..days).map(|_| rng.random_range(0.0..50.0)).collect();
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, &xi)| 2.0 * xi + i as f64 * 0.05 + noise_dist.sample(&mut rng))
        .collect();
    let dates = (0..days as i64).map(|d| start + Duration::days(d)).collect();
    (x, y, dates)
}

// ============================================================================
// Benchmark Functions
// ============================================================================

fn bench_scalability(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("scalability_{}", mode_name));
    group.sample_size(20);

    for size in [500, 1_000, 2_000] {
        group.throughput(Throughput::Elements(size as u64));

        let (x, y) = generate_sine_data(size, 42);

        group.bench_with_input(BenchmarkId::new("fit", size), &size, |b, _| {
            b.iter(|| {
                Lowess::<f64>::new()
                    .fraction(0.2)
                    .robust_iters(3)
                    .parallel(use_parallel)
                    .build()
                    .unwrap()
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_fraction(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("fraction_{}", mode_name));
    group.sample_size(20);

    let (x, y) = generate_sine_data(1_000, 42);

    for frac in [0.1, 0.3, 0.6] {
        group.bench_with_input(BenchmarkId::new("fit", frac), &frac, |b, &frac| {
            b.iter(|| {
                Lowess::<f64>::new()
                    .fraction(frac)
                    .num_fits(100)
                    .robust_iters(2)
                    .parallel(use_parallel)
                    .build()
                    .unwrap()
                    .fit(black_box(&x), black_box(&y))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("bootstrap_{}", mode_name));
    group.sample_size(10);

    let (x, y) = generate_sine_data(500, 7);
    let x_pred: Vec<f64> = (0..50).map(|i| i as f64 * 0.2).collect();

    for runs in [50, 200] {
        group.bench_with_input(BenchmarkId::new("interval", runs), &runs, |b, &runs| {
            b.iter(|| {
                Bootstrap::new::<f64>()
                    .fraction(0.3)
                    .num_fits(50)
                    .robust_iters(1)
                    .num_runs(runs)
                    .seed(1)
                    .parallel(use_parallel)
                    .build()
                    .unwrap()
                    .confidence_interval(black_box(&x), black_box(&y), &x_pred, None)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_surface(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("surface_{}", mode_name));
    group.sample_size(10);

    let (x, y, dates) = generate_dated_data(365, 3);
    let start = dates[0];
    let x_pred: Vec<f64> = (0..50).map(f64::from).collect();

    for step_days in [28, 7] {
        let reg_dates = date_range(start, start + Duration::days(364), Duration::days(step_days)).unwrap();

        group.bench_with_input(
            BenchmarkId::new("smooth_dates", step_days),
            &step_days,
            |b, _| {
                b.iter(|| {
                    SmoothDates::new::<f64>()
                        .fraction(0.3)
                        .num_fits(40)
                        .robust_iters(2)
                        .threshold(8.0, DateUnit::Weeks)
                        .parallel(use_parallel)
                        .build()
                        .unwrap()
                        .fit(black_box(&x), black_box(&y), &dates, Some(&reg_dates[..]))
                        .unwrap()
                        .predict(&x_pred, None)
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_scalability,
    bench_fraction,
    bench_bootstrap,
    bench_surface,
);

criterion_main!(benches);
