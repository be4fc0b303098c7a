//! Named random-variable constructors.
//!
//! Each model is a [`RandomVariable`] over one `stats` family, with the
//! parameter names users write (`alpha`/`beta` for the gamma families,
//! `lam` for Poisson) mapped onto the family's canonical order.

use ndarray::ArrayD;

use super::RandomVariable;
use crate::error::Result;
use crate::shape::Shape;
use crate::stats;
use crate::value::Value;

pub type Beta = RandomVariable<stats::Beta>;
pub type InvGamma = RandomVariable<stats::InvGamma>;
pub type Uniform = RandomVariable<stats::Uniform>;
pub type Normal = RandomVariable<stats::Norm>;
pub type Gamma = RandomVariable<stats::Gamma>;
pub type Exponential = RandomVariable<stats::Expon>;
pub type Bernoulli = RandomVariable<stats::Bernoulli>;
pub type Poisson = RandomVariable<stats::Poisson>;
pub type LogNormal = RandomVariable<stats::LogNorm>;
pub type StudentT = RandomVariable<stats::StudentT>;

impl RandomVariable<stats::Beta> {
    pub fn new(shape: impl Into<Shape>, a: impl Into<Value>, b: impl Into<Value>) -> Result<Self> {
        Self::named("Beta", &["a", "b"], shape.into(), &[a.into(), b.into()])
    }

    pub fn a(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }

    pub fn b(&self) -> &ArrayD<f64> {
        self.param_at(1)
    }
}

impl RandomVariable<stats::InvGamma> {
    /// Shape `alpha`, scale `beta`.
    pub fn new(
        shape: impl Into<Shape>,
        alpha: impl Into<Value>,
        beta: impl Into<Value>,
    ) -> Result<Self> {
        Self::named("InvGamma", &["alpha", "beta"], shape.into(), &[alpha.into(), beta.into()])
    }

    pub fn alpha(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }

    pub fn beta(&self) -> &ArrayD<f64> {
        self.param_at(1)
    }
}

impl RandomVariable<stats::Uniform> {
    /// Uniform on `[loc, loc + scale]`.
    pub fn new(
        shape: impl Into<Shape>,
        loc: impl Into<Value>,
        scale: impl Into<Value>,
    ) -> Result<Self> {
        Self::named("Uniform", &["loc", "scale"], shape.into(), &[loc.into(), scale.into()])
    }

    pub fn loc(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }

    pub fn scale(&self) -> &ArrayD<f64> {
        self.param_at(1)
    }
}

impl RandomVariable<stats::Norm> {
    pub fn new(
        shape: impl Into<Shape>,
        loc: impl Into<Value>,
        scale: impl Into<Value>,
    ) -> Result<Self> {
        Self::named("Normal", &["loc", "scale"], shape.into(), &[loc.into(), scale.into()])
    }

    pub fn loc(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }

    pub fn scale(&self) -> &ArrayD<f64> {
        self.param_at(1)
    }
}

impl RandomVariable<stats::Gamma> {
    /// Shape `alpha`, scale `beta`.
    pub fn new(
        shape: impl Into<Shape>,
        alpha: impl Into<Value>,
        beta: impl Into<Value>,
    ) -> Result<Self> {
        Self::named("Gamma", &["alpha", "beta"], shape.into(), &[alpha.into(), beta.into()])
    }

    pub fn alpha(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }

    pub fn beta(&self) -> &ArrayD<f64> {
        self.param_at(1)
    }
}

impl RandomVariable<stats::Expon> {
    pub fn new(shape: impl Into<Shape>, scale: impl Into<Value>) -> Result<Self> {
        Self::named("Exponential", &["scale"], shape.into(), &[scale.into()])
    }

    pub fn scale(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }
}

impl RandomVariable<stats::Bernoulli> {
    pub fn new(shape: impl Into<Shape>, p: impl Into<Value>) -> Result<Self> {
        Self::named("Bernoulli", &["p"], shape.into(), &[p.into()])
    }

    pub fn p(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }
}

impl RandomVariable<stats::Poisson> {
    pub fn new(shape: impl Into<Shape>, lam: impl Into<Value>) -> Result<Self> {
        Self::named("Poisson", &["lam"], shape.into(), &[lam.into()])
    }

    pub fn lam(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }
}

impl RandomVariable<stats::LogNorm> {
    pub fn new(shape: impl Into<Shape>, s: impl Into<Value>) -> Result<Self> {
        Self::named("LogNormal", &["s"], shape.into(), &[s.into()])
    }

    pub fn s(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }
}

impl RandomVariable<stats::StudentT> {
    pub fn new(
        shape: impl Into<Shape>,
        df: impl Into<Value>,
        loc: impl Into<Value>,
        scale: impl Into<Value>,
    ) -> Result<Self> {
        Self::named(
            "StudentT",
            &["df", "loc", "scale"],
            shape.into(),
            &[df.into(), loc.into(), scale.into()],
        )
    }

    pub fn df(&self) -> &ArrayD<f64> {
        self.param_at(0)
    }

    pub fn loc(&self) -> &ArrayD<f64> {
        self.param_at(1)
    }

    pub fn scale(&self) -> &ArrayD<f64> {
        self.param_at(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomState;
    use crate::stats::Family;
    use approx::assert_relative_eq;

    #[test]
    fn test_invgamma_names_map_to_family_order() {
        let rv = InvGamma::new([2], vec![3.0, 4.0], 2.0).unwrap();
        assert_eq!(rv.alpha().as_slice().unwrap(), &[3.0, 4.0]);
        assert_eq!(rv.beta().as_slice().unwrap(), &[2.0, 2.0]);
        let x = ndarray::arr2(&[[1.0, 1.0]]).into_dyn();
        let lp = rv.log_prob_idx(&[1], x).unwrap();
        let d = stats::InvGamma::new(4.0, 2.0).unwrap();
        assert_relative_eq!(lp[0], d.logpdf(1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_student_t_accessors() {
        let rv = StudentT::new((), 4.0, 1.0, 2.0).unwrap();
        assert_eq!(rv.df().ndim(), 0);
        assert_eq!(rv.loc().sum(), 1.0);
        assert_eq!(rv.scale().sum(), 2.0);
    }

    #[test]
    fn test_every_model_samples_its_shape() {
        let mut rng = RandomState::new(0);
        let shape = [2, 3];
        let draws = [
            Beta::new(shape, 2.0, 2.0).unwrap().sample(4, &mut rng).unwrap(),
            InvGamma::new(shape, 2.0, 1.0).unwrap().sample(4, &mut rng).unwrap(),
            Uniform::new(shape, 0.0, 1.0).unwrap().sample(4, &mut rng).unwrap(),
            Normal::new(shape, 0.0, 1.0).unwrap().sample(4, &mut rng).unwrap(),
            Gamma::new(shape, 2.0, 1.0).unwrap().sample(4, &mut rng).unwrap(),
            Exponential::new(shape, 1.0).unwrap().sample(4, &mut rng).unwrap(),
            Bernoulli::new(shape, 0.5).unwrap().sample(4, &mut rng).unwrap(),
            Poisson::new(shape, 3.0).unwrap().sample(4, &mut rng).unwrap(),
            LogNormal::new(shape, 0.5).unwrap().sample(4, &mut rng).unwrap(),
            StudentT::new(shape, 3.0, 0.0, 1.0).unwrap().sample(4, &mut rng).unwrap(),
        ];
        for d in &draws {
            assert_eq!(d.shape(), &[4, 2, 3]);
        }
    }
}
