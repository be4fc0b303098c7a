//! Log-normal distribution with shape parameter `s` (the standard deviation
//! of `ln X`) and unit scale.

use rand::Rng;
use rand_distr::Distribution;
use statrs::function::erf::erfc;

use super::{positive, unpack, Family, LN_SQRT_2PI};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct LogNorm {
    s: f64,
    dist: rand_distr::LogNormal<f64>,
}

impl LogNorm {
    pub fn new(s: f64) -> Result<Self> {
        let s = positive(Self::NAME, "s", s)?;
        let dist = rand_distr::LogNormal::new(0.0, s).map_err(|_| Error::Domain {
            family: Self::NAME,
            param: "s",
            value: s,
            reason: "rejected by the log-normal sampler",
        })?;
        Ok(Self { s, dist })
    }

    pub fn s(&self) -> f64 {
        self.s
    }
}

impl Family for LogNorm {
    const NAME: &'static str = "lognorm";
    const PARAMS: &'static [&'static str] = &["s"];

    fn from_params(params: &[f64]) -> Result<Self> {
        let [s] = unpack(Self::NAME, params)?;
        Self::new(s)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }

    fn logpdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let lx = x.ln();
        let z = lx / self.s;
        -0.5 * z * z - lx - self.s.ln() - LN_SQRT_2PI
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            0.5 * erfc(-x.ln() / (self.s * std::f64::consts::SQRT_2))
        }
    }
}

super::array_api!(LogNorm; s);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomState;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_is_one() {
        let d = LogNorm::new(0.7).unwrap();
        assert_relative_eq!(d.cdf(1.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(d.logpdf(1.0), -(0.7f64).ln() - LN_SQRT_2PI, epsilon = 1e-12);
    }

    #[test]
    fn test_relation_to_normal() {
        let d = LogNorm::new(1.3).unwrap();
        let n = crate::stats::Norm::new(0.0, 1.3).unwrap();
        for x in [0.2, 1.5, 6.0] {
            let x: f64 = x;
            assert_relative_eq!(d.logpdf(x), n.logpdf(x.ln()) - x.ln(), epsilon = 1e-12);
            assert_relative_eq!(d.cdf(x), n.cdf(x.ln()), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_nonpositive_support() {
        let lp = logpdf(vec![0.0, -2.0], 1.0).unwrap();
        assert!(lp.iter().all(|v| *v == f64::NEG_INFINITY));
        assert!(LogNorm::new(-1.0).is_err());
    }

    #[test]
    fn test_samples_positive() {
        let mut rng = RandomState::new(13);
        let x = rvs(vec![0.5, 2.0], 100, &mut rng).unwrap();
        assert_eq!(x.shape(), &[100, 2]);
        assert!(x.iter().all(|v| *v > 0.0));
    }
}
