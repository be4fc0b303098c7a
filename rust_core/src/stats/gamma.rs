//! Gamma distribution with shape `a` and `scale` (`mean = a·scale`).

use rand::Rng;
use rand_distr::Distribution;
use statrs::function::gamma::{gamma_lr, ln_gamma};

use super::{positive, unpack, Family};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Gamma {
    a: f64,
    scale: f64,
    /// `-ln Γ(a) - a·ln(scale)`
    log_norm: f64,
    dist: rand_distr::Gamma<f64>,
}

impl Gamma {
    pub fn new(a: f64, scale: f64) -> Result<Self> {
        let a = positive(Self::NAME, "a", a)?;
        let scale = positive(Self::NAME, "scale", scale)?;
        let dist = rand_distr::Gamma::new(a, scale).map_err(|_| Error::Domain {
            family: Self::NAME,
            param: "a",
            value: a,
            reason: "rejected by the gamma sampler",
        })?;
        Ok(Self {
            a,
            scale,
            log_norm: -ln_gamma(a) - a * scale.ln(),
            dist,
        })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Family for Gamma {
    const NAME: &'static str = "gamma";
    const PARAMS: &'static [&'static str] = &["a", "scale"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [a, scale] = unpack(Self::NAME, params)?;
        Self::new(a, scale)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }

    fn logpdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return f64::NEG_INFINITY;
        }
        if x == 0.0 {
            return if self.a < 1.0 {
                f64::INFINITY
            } else if self.a > 1.0 {
                f64::NEG_INFINITY
            } else {
                -self.scale.ln()
            };
        }
        self.log_norm + (self.a - 1.0) * x.ln() - x / self.scale
    }

    fn cdf(&self, x: f64) -> f64 {
        // statrs rejects a ratio of exactly 0 or +inf, which a finite `x`
        // can still reach by underflow or overflow.
        let t = x / self.scale;
        if t <= 0.0 {
            0.0
        } else if t.is_infinite() {
            1.0
        } else {
            gamma_lr(self.a, t)
        }
    }
}

super::array_api!(Gamma; a, scale);
