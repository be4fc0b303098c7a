//! Exponential distribution with scale parameterization (`mean = scale`).

use rand::Rng;
use rand_distr::Distribution;

use super::{positive, unpack, Family};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Expon {
    scale: f64,
    dist: rand_distr::Exp<f64>,
}

impl Expon {
    pub fn new(scale: f64) -> Result<Self> {
        let scale = positive(Self::NAME, "scale", scale)?;
        let dist = rand_distr::Exp::new(1.0 / scale).map_err(|_| Error::Domain {
            family: Self::NAME,
            param: "scale",
            value: scale,
            reason: "rate 1/scale is not representable",
        })?;
        Ok(Self { scale, dist })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Family for Expon {
    const NAME: &'static str = "expon";
    const PARAMS: &'static [&'static str] = &["scale"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [scale] = unpack(Self::NAME, params)?;
        Self::new(scale)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }

    fn logpdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return f64::NEG_INFINITY;
        }
        -x / self.scale - self.scale.ln()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            -(-x / self.scale).exp_m1()
        }
    }

    fn logcdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            f64::NEG_INFINITY
        } else {
            // log(1 - exp(-t)), accurate for small t
            (-(-x / self.scale).exp_m1()).ln()
        }
    }
}

super::array_api!(Expon; scale);
