//! Student's t distribution with `df` degrees of freedom, location and scale.
//!
//! `log p(x) = lnΓ((ν+1)/2) - lnΓ(ν/2) - ½ln(νπ) - ln σ - (ν+1)/2 · ln(1 + z²/ν)`
//! with `z = (x - loc) / σ`.

use rand::Rng;
use rand_distr::Distribution;
use statrs::function::beta::beta_reg;
use statrs::function::gamma::ln_gamma;

use super::{finite, positive, unpack, Family};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct StudentT {
    df: f64,
    loc: f64,
    scale: f64,
    log_norm: f64,
    dist: rand_distr::StudentT<f64>,
}

impl StudentT {
    pub fn new(df: f64, loc: f64, scale: f64) -> Result<Self> {
        let df = positive(Self::NAME, "df", df)?;
        let loc = finite(Self::NAME, "loc", loc)?;
        let scale = positive(Self::NAME, "scale", scale)?;
        let dist = rand_distr::StudentT::new(df).map_err(|_| Error::Domain {
            family: Self::NAME,
            param: "df",
            value: df,
            reason: "rejected by the t sampler",
        })?;
        let log_norm = ln_gamma(0.5 * (df + 1.0))
            - ln_gamma(0.5 * df)
            - 0.5 * (df * std::f64::consts::PI).ln()
            - scale.ln();
        Ok(Self {
            df,
            loc,
            scale,
            log_norm,
            dist,
        })
    }

    pub fn df(&self) -> f64 {
        self.df
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Family for StudentT {
    const NAME: &'static str = "t";
    const PARAMS: &'static [&'static str] = &["df", "loc", "scale"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [df, loc, scale] = unpack(Self::NAME, params)?;
        Self::new(df, loc, scale)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.loc + self.scale * self.dist.sample(rng)
    }

    fn logpdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        self.log_norm - 0.5 * (self.df + 1.0) * (z * z / self.df).ln_1p()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x == f64::NEG_INFINITY {
            return 0.0;
        }
        if x == f64::INFINITY {
            return 1.0;
        }
        let z = (x - self.loc) / self.scale;
        let tail = 0.5 * beta_reg(0.5 * self.df, 0.5, self.df / (self.df + z * z));
        if z <= 0.0 {
            tail
        } else {
            1.0 - tail
        }
    }
}

super::array_api!(StudentT; df, loc, scale);
