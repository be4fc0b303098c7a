//! Poisson distribution with mean `mu`.
//!
//! Discrete: `logpdf` evaluates the mass function and is `-inf` at negative
//! or non-integer `x`. `logpmf`/`pmf` are aliases.

use rand::Rng;
use rand_distr::Distribution;
use statrs::function::gamma::{gamma_ur, ln_gamma};

use super::{positive, unpack, Family};
use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Poisson {
    mu: f64,
    dist: rand_distr::Poisson<f64>,
}

impl Poisson {
    pub fn new(mu: f64) -> Result<Self> {
        let mu = positive(Self::NAME, "mu", mu)?;
        let dist = rand_distr::Poisson::new(mu).map_err(|_| Error::Domain {
            family: Self::NAME,
            param: "mu",
            value: mu,
            reason: "rejected by the poisson sampler",
        })?;
        Ok(Self { mu, dist })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }
}

impl Family for Poisson {
    const NAME: &'static str = "poisson";
    const PARAMS: &'static [&'static str] = &["mu"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [mu] = unpack(Self::NAME, params)?;
        Self::new(mu)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        Distribution::<f64>::sample(&self.dist, rng)
    }

    fn logpdf(&self, k: f64) -> f64 {
        if k < 0.0 || k.fract() != 0.0 || k.is_infinite() {
            return f64::NEG_INFINITY;
        }
        k * self.mu.ln() - self.mu - ln_gamma(k + 1.0)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else if x.is_infinite() {
            1.0
        } else {
            // P(K <= k) = Q(k + 1, mu)
            gamma_ur(x.floor() + 1.0, self.mu)
        }
    }
}

super::array_api!(Poisson; mu);

pub fn logpmf(x: impl Into<Value>, mu: impl Into<Value>) -> Result<ndarray::ArrayD<f64>> {
    logpdf(x, mu)
}

pub fn pmf(x: impl Into<Value>, mu: impl Into<Value>) -> Result<ndarray::ArrayD<f64>> {
    pdf(x, mu)
}
