//! Continuous uniform distribution on `[loc, loc + scale]`.
//!
//! Location-scale family over the standard uniform on `[0, 1)`. `scale` must
//! be finite and `> 0`; `loc` finite. Outside the interval `logpdf` is `-inf`.

use rand::Rng;

use super::{finite, positive, unpack, Family};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct Uniform {
    loc: f64,
    scale: f64,
}

impl Uniform {
    pub fn new(loc: f64, scale: f64) -> Result<Self> {
        Ok(Self {
            loc: finite(Self::NAME, "loc", loc)?,
            scale: positive(Self::NAME, "scale", scale)?,
        })
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Family for Uniform {
    const NAME: &'static str = "uniform";
    const PARAMS: &'static [&'static str] = &["loc", "scale"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [loc, scale] = unpack(Self::NAME, params)?;
        Self::new(loc, scale)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.loc + self.scale * rng.gen::<f64>()
    }

    fn logpdf(&self, x: f64) -> f64 {
        if x < self.loc || x > self.loc + self.scale {
            f64::NEG_INFINITY
        } else {
            -self.scale.ln()
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        ((x - self.loc) / self.scale).clamp(0.0, 1.0)
    }
}

super::array_api!(Uniform; loc, scale);
