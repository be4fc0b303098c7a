//! End-to-end scenarios over the public API.

use approx::assert_relative_eq;
use ndarray::{arr0, arr1, ArrayD, Axis};
use statrs::function::gamma::gamma;
use stochast_core::models::{Beta, InvGamma, Normal, Variable};
use stochast_core::stats::{self, uniform};
use stochast_core::{Error, Graph, RandomState, Value};

fn invgamma_logpdf(x: f64, a: f64, b: f64) -> f64 {
    (b.powf(a) / gamma(a) * x.powf(-a - 1.0) * (-b / x).exp()).ln()
}

#[test]
fn beta_sample_shape_0d() {
    let mut rng = RandomState::new(0);
    let float = Beta::new((), 0.5, 0.5).unwrap();
    assert_eq!(float.sample(1, &mut rng).unwrap().shape(), &[1]);

    let zero_d = Beta::new((), arr0(0.5).into_dyn(), arr0(0.5).into_dyn()).unwrap();
    assert_eq!(zero_d.sample(1, &mut rng).unwrap().shape(), &[1]);

    let mut g = Graph::new();
    let a = g.add_scalar(0.5);
    let deferred = Beta::new((), g.tensor(a), g.tensor(a)).unwrap();
    assert_eq!(deferred.sample(1, &mut rng).unwrap().shape(), &[1]);
}

#[test]
fn beta_sample_shape_1d() {
    let mut rng = RandomState::new(0);
    let rv = Beta::new([1], arr1(&[0.5]), arr1(&[0.5])).unwrap();
    assert_eq!(rv.sample(1, &mut rng).unwrap().shape(), &[1, 1]);
    assert_eq!(rv.sample(5, &mut rng).unwrap().shape(), &[5, 1]);

    let rv = Beta::new([2], vec![0.2, 0.8], vec![0.2, 0.8]).unwrap();
    assert_eq!(rv.sample(1, &mut rng).unwrap().shape(), &[1, 2]);
    assert_eq!(rv.sample(10, &mut rng).unwrap().shape(), &[10, 2]);

    let mut g = Graph::new();
    let p = g.add_constant(arr1(&[0.2, 0.8]).into_dyn());
    let rv = Beta::new([2], g.tensor(p), g.tensor(p)).unwrap();
    assert_eq!(rv.sample(10, &mut rng).unwrap().shape(), &[10, 2]);
}

fn check_invgamma_log_prob_idx(shape: usize, n: usize) {
    let mut g = Graph::new();
    let zeros = g.zeros([shape]);
    let half = g.add_scalar(0.5);
    let param = g.add(zeros, half);

    let rv = InvGamma::new([shape], g.tensor(param), g.tensor(param)).unwrap();
    let mut rng = RandomState::new(98765);
    let x = rv.sample(n, &mut rng).unwrap();
    assert_eq!(x.shape(), &[n, shape]);

    let alpha = rv.alpha().clone();
    let beta = rv.beta().clone();
    for idx in 0..shape {
        let lp = rv.log_prob_idx(&[idx], x.clone()).unwrap();
        assert_eq!(lp.len(), n);
        for (i, v) in lp.iter().enumerate() {
            let expected = invgamma_logpdf(x[[i, idx]], alpha[[idx]], beta[[idx]]);
            assert_relative_eq!(*v, expected, epsilon = 1e-8, max_relative = 1e-8);
        }
    }
}

#[test]
fn invgamma_log_prob_idx_matches_closed_form() {
    check_invgamma_log_prob_idx(1, 1);
    check_invgamma_log_prob_idx(1, 5);
    check_invgamma_log_prob_idx(5, 1);
    check_invgamma_log_prob_idx(5, 5);
}

#[test]
fn uniform_rvs_shapes() {
    let mut rng = RandomState::new(1);
    assert_eq!(uniform::rvs(0.5, 0.5, 1, &mut rng).unwrap().shape(), &[1]);
    assert_eq!(uniform::rvs(arr1(&[0.5]), arr1(&[0.5]), 5, &mut rng).unwrap().shape(), &[5, 1]);
    assert_eq!(
        uniform::rvs(arr1(&[0.2, 0.8]), arr1(&[0.2, 0.8]), 10, &mut rng).unwrap().shape(),
        &[10, 2]
    );
}

#[test]
fn sample_then_log_prob_is_finite() {
    let mut rng = RandomState::new(2024);
    let rv = Beta::new([3], vec![0.5, 2.0, 5.0], vec![0.5, 2.0, 1.5]).unwrap();
    let x = rv.sample(50, &mut rng).unwrap();
    let lp = rv.log_prob(x).unwrap();
    assert_eq!(lp.len(), 50);
    assert!(lp.iter().all(|v| v.is_finite()), "{lp}");
}

#[test]
fn log_prob_is_sum_of_marginals() {
    let mut rng = RandomState::new(7);
    let rv = Normal::new([4], vec![0.0, 1.0, -1.0, 3.0], vec![1.0, 0.5, 2.0, 1.0]).unwrap();
    let x = rv.sample(8, &mut rng).unwrap();
    let joint = rv.log_prob(x.clone()).unwrap();
    let marginals: Vec<_> = (0..4)
        .map(|i| rv.log_prob_idx(&[i], x.clone()).unwrap())
        .collect();
    for n in 0..8 {
        let total: f64 = marginals.iter().map(|m| m[n]).sum();
        assert_relative_eq!(joint[n], total, epsilon = 1e-10);
    }
}

#[test]
fn log_prob_idx_agrees_with_stats_surface() {
    let mut rng = RandomState::new(3);
    let rv = InvGamma::new([3], vec![1.0, 2.0, 3.0], 0.7).unwrap();
    let x = rv.sample(6, &mut rng).unwrap();
    for idx in 0..3 {
        let column: ArrayD<f64> = x.index_axis(Axis(1), idx).to_owned();
        let expected = stats::invgamma::logpdf(column, (idx + 1) as f64, 0.7).unwrap();
        let got = rv.log_prob_idx(&[idx], x.clone()).unwrap();
        for (a, b) in got.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}

#[test]
fn out_of_support_gives_neg_inf_not_error() {
    let rv = InvGamma::new([2], 0.5, 0.5).unwrap();
    let lp = rv.log_prob(arr1(&[-1.0, 1.0])).unwrap();
    assert_eq!(lp.len(), 1);
    assert_eq!(lp[0], f64::NEG_INFINITY);
}

#[test]
fn errors_are_raised_where_detected() {
    let rv = Beta::new([2], 1.0, 1.0).unwrap();
    assert!(matches!(rv.log_prob_idx(&[2], arr1(&[0.5, 0.5])), Err(Error::Index { .. })));
    assert!(matches!(Beta::new([2], -1.0, 1.0), Err(Error::Domain { .. })));
    assert!(matches!(Beta::new([2], vec![1.0, 1.0, 1.0], 1.0), Err(Error::Shape(_))));
}

#[test]
fn variables_behind_trait_objects() {
    let vars: Vec<Box<dyn Variable>> = vec![
        Box::new(Beta::new([2], 2.0, 2.0).unwrap()),
        Box::new(Normal::new([2], 0.0, 1.0).unwrap()),
    ];
    let mut rng = RandomState::new(11);
    for v in &vars {
        let x = v.sample_dyn(3, &mut rng).unwrap();
        assert_eq!(x.shape(), &[3, 2]);
        let lp = v.log_prob(Value::from(x)).unwrap();
        assert!(lp.iter().all(|l| l.is_finite()));
    }
}

#[test]
fn parameters_resolve_by_name_behind_trait_objects() {
    let rv: Box<dyn Variable> = Box::new(InvGamma::new([2], vec![1.5, 2.5], 0.7).unwrap());
    let alpha: Vec<f64> = rv.param("alpha").unwrap().iter().copied().collect();
    assert_eq!(alpha, vec![1.5, 2.5]);
    let beta: Vec<f64> = rv.param("beta").unwrap().iter().copied().collect();
    assert_eq!(beta, vec![0.7, 0.7]);
    assert!(rv.param("gamma").is_none());
    assert!(rv.param("shape").is_none());
}

#[test]
fn reseeding_reproduces_draws() {
    let rv = Beta::new([3], 2.0, 5.0).unwrap();
    let mut rng = RandomState::new(5);
    let first = rv.sample(4, &mut rng).unwrap();
    rng.set_seed(5);
    let second = rv.sample(4, &mut rng).unwrap();
    assert_eq!(first, second);
}
