//! Normal distribution `N(loc, scale)`.
//!
//! `log p(x) = -0.5 * ((x-loc)/scale)^2 - ln(scale) - ln(sqrt(2π))`

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use statrs::function::erf::erfc;

use super::{finite, positive, unpack, Family, LN_SQRT_2PI};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct Norm {
    loc: f64,
    scale: f64,
}

impl Norm {
    pub fn new(loc: f64, scale: f64) -> Result<Self> {
        Ok(Self {
            loc: finite(Self::NAME, "loc", loc)?,
            scale: positive(Self::NAME, "scale", scale)?,
        })
    }

    pub fn standard() -> Self {
        Self { loc: 0.0, scale: 1.0 }
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Family for Norm {
    const NAME: &'static str = "norm";
    const PARAMS: &'static [&'static str] = &["loc", "scale"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [loc, scale] = unpack(Self::NAME, params)?;
        Self::new(loc, scale)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        self.loc + self.scale * z
    }

    fn logpdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        -0.5 * z * z - self.scale.ln() - LN_SQRT_2PI
    }

    fn cdf(&self, x: f64) -> f64 {
        0.5 * erfc(-(x - self.loc) / (self.scale * std::f64::consts::SQRT_2))
    }
}

super::array_api!(Norm; loc, scale);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::rng::RandomState;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_at_zero() {
        assert_relative_eq!(Norm::standard().logpdf(0.0), -LN_SQRT_2PI, epsilon = 1e-12);
        assert_relative_eq!(Norm::standard().cdf(0.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let d = Norm::new(0.0, 2.0).unwrap();
        assert_relative_eq!(d.logpdf(1.3), d.logpdf(-1.3), epsilon = 1e-12);
        assert_relative_eq!(d.cdf(1.3) + d.cdf(-1.3), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cdf_one_sigma() {
        let d = Norm::new(3.0, 0.5).unwrap();
        assert_relative_eq!(d.cdf(3.5), 0.841_344_746_068_542_9, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_scale() {
        assert!(matches!(Norm::new(0.0, 0.0), Err(Error::Domain { param: "scale", .. })));
        assert!(logpdf(0.0, 0.0, -1.0).is_err());
    }

    #[test]
    fn test_sample_moments() {
        let mut rng = RandomState::new(21);
        let x = rvs(-2.0, 3.0, 50_000, &mut rng).unwrap();
        let mean = x.mean().unwrap();
        let std = x.std(0.0);
        assert!((mean + 2.0).abs() < 0.05, "mean = {}", mean);
        assert!((std - 3.0).abs() < 0.05, "std = {}", std);
    }
}
