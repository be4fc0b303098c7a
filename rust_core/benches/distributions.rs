use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use std::hint::black_box;
use stochast_core::models::{Beta, InvGamma};
use stochast_core::stats::{beta, norm, poisson, t};
use stochast_core::RandomState;

fn bench_array_logpdf(c: &mut Criterion) {
    let xs = Array1::from_iter((0..10_000).map(|i| (i as f64) * 0.001 - 5.0));
    let unit = Array1::from_iter((0..10_000).map(|i| ((i as f64) + 0.5) / 10_000.0));
    let ks = Array1::from_iter((0..10_000).map(|i| (i % 30) as f64));

    c.bench_function("norm_logpdf_10k", |b| {
        b.iter(|| black_box(norm::logpdf(xs.clone(), 0.0, 1.3).unwrap()))
    });

    c.bench_function("t_logpdf_10k", |b| {
        b.iter(|| black_box(t::logpdf(xs.clone(), 7.0, 0.0, 1.3).unwrap()))
    });

    c.bench_function("beta_cdf_10k", |b| {
        b.iter(|| black_box(beta::cdf(unit.clone(), 2.2, 3.3).unwrap()))
    });

    c.bench_function("poisson_logpmf_10k", |b| {
        b.iter(|| black_box(poisson::logpmf(ks.clone(), 3.2).unwrap()))
    });
}

fn bench_random_variables(c: &mut Criterion) {
    let rv = Beta::new([100], 2.0, 5.0).unwrap();
    let mut rng = RandomState::new(0);
    c.bench_function("beta_rv_sample_100x100", |b| {
        b.iter(|| black_box(rv.sample(100, &mut rng).unwrap()))
    });

    let rv = InvGamma::new([100], 3.0, 1.0).unwrap();
    let x = rv.sample(100, &mut RandomState::new(1)).unwrap();
    c.bench_function("invgamma_rv_log_prob_100x100", |b| {
        b.iter(|| black_box(rv.log_prob(x.clone()).unwrap()))
    });
    c.bench_function("invgamma_rv_log_prob_idx_100", |b| {
        b.iter(|| black_box(rv.log_prob_idx(&[42], x.clone()).unwrap()))
    });
}

criterion_group!(benches, bench_array_logpdf, bench_random_variables);
criterion_main!(benches);
