//! Beta distribution.
//!
//! Parameters `(a, b)`, both finite and `> 0`. Support `[0, 1]`; outside it
//! `logpdf` is `-inf`.

use rand::Rng;
use rand_distr::Distribution;
use statrs::function::beta::beta_reg;
use statrs::function::gamma::ln_gamma;

use super::{positive, unpack, Family};
use crate::error::{Error, Result};

#[inline]
fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

#[derive(Debug, Clone)]
pub struct Beta {
    a: f64,
    b: f64,
    ln_norm: f64,
    dist: rand_distr::Beta<f64>,
}

impl Beta {
    pub fn new(a: f64, b: f64) -> Result<Self> {
        let a = positive(Self::NAME, "a", a)?;
        let b = positive(Self::NAME, "b", b)?;
        let dist = rand_distr::Beta::new(a, b).map_err(|_| Error::Domain {
            family: Self::NAME,
            param: "a",
            value: a,
            reason: "rejected by the beta sampler",
        })?;
        Ok(Self {
            a,
            b,
            ln_norm: -ln_beta(a, b),
            dist,
        })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}

impl Family for Beta {
    const NAME: &'static str = "beta";
    const PARAMS: &'static [&'static str] = &["a", "b"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [a, b] = unpack(Self::NAME, params)?;
        Self::new(a, b)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }

    fn logpdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return f64::NEG_INFINITY;
        }
        // Boundary values: the power term is 0^(a-1) or 0^(b-1).
        if x == 0.0 {
            return edge(self.a, self.ln_norm);
        }
        if x == 1.0 {
            return edge(self.b, self.ln_norm);
        }
        self.ln_norm + (self.a - 1.0) * x.ln() + (self.b - 1.0) * (-x).ln_1p()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else if x >= 1.0 {
            1.0
        } else {
            beta_reg(self.a, self.b, x)
        }
    }
}

#[inline]
fn edge(exponent_plus_one: f64, ln_norm: f64) -> f64 {
    if exponent_plus_one < 1.0 {
        f64::INFINITY
    } else if exponent_plus_one > 1.0 {
        f64::NEG_INFINITY
    } else {
        ln_norm
    }
}

super::array_api!(Beta; a, b);
