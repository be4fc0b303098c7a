//! Bernoulli distribution on `{0, 1}` with success probability `p`.
//!
//! Discrete, so `logpdf`/`pdf` here are the mass function; `logpmf`/`pmf`
//! are provided as aliases. Any `x` other than exactly 0 or 1 has mass 0.

use rand::distributions::Distribution;
use rand::Rng;

use super::{probability, unpack, Family};
use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Bernoulli {
    p: f64,
    dist: rand::distributions::Bernoulli,
}

impl Bernoulli {
    pub fn new(p: f64) -> Result<Self> {
        let p = probability(Self::NAME, "p", p)?;
        let dist = rand::distributions::Bernoulli::new(p).map_err(|_| Error::Domain {
            family: Self::NAME,
            param: "p",
            value: p,
            reason: "rejected by the bernoulli sampler",
        })?;
        Ok(Self { p, dist })
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Family for Bernoulli {
    const NAME: &'static str = "bernoulli";
    const PARAMS: &'static [&'static str] = &["p"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [p] = unpack(Self::NAME, params)?;
        Self::new(p)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.dist.sample(rng) {
            1.0
        } else {
            0.0
        }
    }

    fn logpdf(&self, x: f64) -> f64 {
        if x == 1.0 {
            self.p.ln()
        } else if x == 0.0 {
            (-self.p).ln_1p()
        } else {
            f64::NEG_INFINITY
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else if x < 1.0 {
            1.0 - self.p
        } else {
            1.0
        }
    }
}

super::array_api!(Bernoulli; p);

pub fn logpmf(x: impl Into<Value>, p: impl Into<Value>) -> Result<ndarray::ArrayD<f64>> {
    logpdf(x, p)
}

pub fn pmf(x: impl Into<Value>, p: impl Into<Value>) -> Result<ndarray::ArrayD<f64>> {
    pdf(x, p)
}
