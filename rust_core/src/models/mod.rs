//! Random variables: a distribution family plus a declared event shape.
//!
//! A [`RandomVariable`] owns its parameters already broadcast to its shape,
//! so every component of the event is a fully specified scalar distribution.
//! Sampling yields `(n,) + shape`; `log_prob` sums over event dimensions and
//! returns one value per draw.

mod families;

pub use families::{
    Bernoulli, Beta, Exponential, Gamma, InvGamma, LogNormal, Normal, Poisson, StudentT, Uniform,
};

use std::fmt::Debug;

use ndarray::{Array1, ArrayD, Axis, IxDyn};
use rand::{Rng, RngCore};

use crate::error::{Error, Result};
use crate::eval::{broadcast_view, shape_of};
use crate::shape::Shape;
use crate::stats::{self, Family};
use crate::value::Value;

/// Object-safe view of a random variable, independent of its family.
pub trait Variable: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn shape(&self) -> &Shape;

    fn param_names(&self) -> &[&'static str];

    fn param(&self, name: &str) -> Option<&ArrayD<f64>>;

    fn sample_dyn(&self, n: usize, rng: &mut dyn RngCore) -> Result<ArrayD<f64>>;

    fn log_prob(&self, x: Value) -> Result<Array1<f64>>;

    fn log_prob_idx(&self, idx: &[usize], x: Value) -> Result<Array1<f64>>;
}

#[derive(Debug, Clone)]
pub struct RandomVariable<F: Family> {
    name: &'static str,
    param_names: &'static [&'static str],
    shape: Shape,
    /// Each parameter broadcast to `shape`, in `param_names` order.
    params: Vec<ArrayD<f64>>,
    /// One component per element of `shape`, row-major.
    components: Vec<F>,
}

impl<F: Family> RandomVariable<F> {
    /// Build from parameters in the family's canonical order.
    pub fn with_params(shape: impl Into<Shape>, params: &[Value]) -> Result<Self> {
        Self::named(F::NAME, F::PARAMS, shape.into(), params)
    }

    pub(crate) fn named(
        name: &'static str,
        param_names: &'static [&'static str],
        shape: Shape,
        params: &[Value],
    ) -> Result<Self> {
        if params.len() != F::PARAMS.len() || param_names.len() != F::PARAMS.len() {
            return Err(Error::Shape(format!(
                "{} takes {} parameter(s), got {}",
                name,
                F::PARAMS.len(),
                params.len()
            )));
        }

        let mut arrays = Vec::with_capacity(params.len());
        for (param, &pname) in params.iter().zip(param_names) {
            let array = param.materialize()?;
            let pshape = shape_of(&array);
            if !pshape.broadcasts_to(&shape) {
                return Err(Error::Shape(format!(
                    "{}: parameter `{}` has shape {}, which does not broadcast to declared shape {}",
                    name, pname, pshape, shape
                )));
            }
            arrays.push(broadcast_view(&array, &shape)?.to_owned());
        }
        let components = stats::components::<F>(&arrays, &shape)?;

        tracing::debug!(model = name, shape = %shape, "constructed random variable");
        Ok(Self {
            name,
            param_names,
            shape,
            params: arrays,
            components,
        })
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn param_names(&self) -> &[&'static str] {
        self.param_names
    }

    /// Parameter by name, broadcast to the variable's shape.
    pub fn param(&self, name: &str) -> Option<&ArrayD<f64>> {
        self.param_names
            .iter()
            .position(|&p| p == name)
            .map(|i| &self.params[i])
    }

    pub(crate) fn param_at(&self, i: usize) -> &ArrayD<f64> {
        &self.params[i]
    }

    /// Draw `n` samples; result shape is `(n,) + shape`.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<ArrayD<f64>> {
        if n == 0 {
            tracing::warn!(model = self.name, "sample called with n = 0");
        }
        tracing::debug!(model = self.name, n, shape = %self.shape, "sampling");
        stats::draw(&self.components, &self.shape, n, rng)
    }

    /// Joint log-density of each draw in `x`, summed over event dimensions.
    ///
    /// `x` has shape `(n,) + S'` with `S'` broadcasting to the variable's
    /// shape, or exactly the variable's rank, in which case it is one draw.
    pub fn log_prob(&self, x: impl Into<Value>) -> Result<Array1<f64>> {
        let x = self.batched(x.into())?;
        Ok(x
            .outer_iter()
            .map(|draw| {
                draw.iter()
                    .zip(&self.components)
                    .map(|(&xi, c)| component_logpdf(c, xi))
                    .sum::<f64>()
            })
            .collect())
    }

    /// Log-density of the single component at `idx`, evaluated on
    /// `x[:, idx]`.
    pub fn log_prob_idx(&self, idx: &[usize], x: impl Into<Value>) -> Result<Array1<f64>> {
        self.shape.check_index(idx)?;
        let flat = idx
            .iter()
            .zip(self.shape.dims())
            .fold(0, |acc, (&i, &d)| acc * d + i);
        let component = &self.components[flat];
        let x = self.batched(x.into())?;
        Ok(x
            .outer_iter()
            .map(|draw| component_logpdf(component, draw[IxDyn(idx)]))
            .collect())
    }

    /// Normalize `x` to `(n,) + shape`.
    fn batched(&self, x: Value) -> Result<ArrayD<f64>> {
        let x = x.into_array()?;
        let rank = self.shape.rank();
        let x = if x.ndim() == rank {
            x.insert_axis(Axis(0))
        } else if x.ndim() == rank + 1 {
            x
        } else {
            return Err(Error::Shape(format!(
                "{}: expected values of rank {} or {} for shape {}, got shape {}",
                self.name,
                rank,
                rank + 1,
                self.shape,
                shape_of(&x)
            )));
        };

        let xshape = shape_of(&x);
        let n = xshape.dims()[0];
        let event = Shape::new(&xshape.dims()[1..]);
        if !event.broadcasts_to(&self.shape) {
            return Err(Error::Shape(format!(
                "{}: values with event shape {} do not broadcast to {}",
                self.name, event, self.shape
            )));
        }
        Ok(broadcast_view(&x, &self.shape.prepend(n))?.to_owned())
    }
}

#[inline]
fn component_logpdf<F: Family>(c: &F, x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else {
        c.logpdf(x)
    }
}

impl<F: Family> Variable for RandomVariable<F> {
    fn name(&self) -> &str {
        self.name
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn param_names(&self) -> &[&'static str] {
        self.param_names
    }

    fn param(&self, name: &str) -> Option<&ArrayD<f64>> {
        RandomVariable::param(self, name)
    }

    fn sample_dyn(&self, n: usize, rng: &mut dyn RngCore) -> Result<ArrayD<f64>> {
        self.sample(n, rng)
    }

    fn log_prob(&self, x: Value) -> Result<Array1<f64>> {
        RandomVariable::log_prob(self, x)
    }

    fn log_prob_idx(&self, idx: &[usize], x: Value) -> Result<Array1<f64>> {
        RandomVariable::log_prob_idx(self, idx, x)
    }
}
