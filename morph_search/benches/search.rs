// Benchmarks for the hill-climbing engines and the metric path builder.
//
// Quadratic objectives isolate the engines' own overhead (candidate
// allocation, scoring, step-size bookkeeping); the path benchmark measures
// the chained per-step searches with the Euclidean metric.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use morph_prng::MorphRng;
use morph_search::metric::euclidean;
use morph_search::path::{PathOptions, metric_path};
use morph_search::search::{SearchOptions, hill_climb, hill_climb_stochastic};

fn quadratic(target: &[f64]) -> impl Fn(&[f64]) -> f64 + '_ {
    move |x: &[f64]| x.iter().zip(target).map(|(a, b)| (a - b) * (a - b)).sum::<f64>()
}

fn bench_engines(c: &mut Criterion) {
    let target: Vec<f64> = (0..12).map(|i| i as f64 * 0.37 - 2.0).collect();
    let start = vec![0.0; target.len()];
    let objective = quadratic(&target);
    let options = SearchOptions {
        epsilon: 1e-8,
        min_step_size: 1e-5,
        ..Default::default()
    };

    c.bench_function("hill_climb_12d_quadratic", |b| {
        b.iter(|| hill_climb(&objective, black_box(&start), &options))
    });

    c.bench_function("hill_climb_stochastic_12d_quadratic", |b| {
        b.iter(|| {
            let mut rng = MorphRng::new(1);
            hill_climb_stochastic(&objective, black_box(&start), &options, &mut rng)
        })
    });
}

fn bench_metric_path(c: &mut Criterion) {
    let v1 = [0.0, 1.0, 3.0, 7.0];
    let v2 = [9.0, 4.0, 2.0, 5.0];
    let options = PathOptions {
        steps: 10,
        allow_duplicates: true,
        ..Default::default()
    };

    c.bench_function("metric_path_4d_10_steps", |b| {
        b.iter(|| {
            let mut rng = MorphRng::new(1);
            metric_path(black_box(&v1), black_box(&v2), &euclidean, &options, &mut rng)
        })
    });
}

criterion_group!(benches, bench_engines, bench_metric_path);
criterion_main!(benches);
