//! Distribution primitives.
//!
//! Each family implements [`Family`] for one scalar component and gets the
//! array-level surface (`rvs`, `pdf`, `logpdf`, `cdf`, `logcdf`) from the
//! generic functions in this module. Those functions broadcast the input and
//! every parameter together using [`crate::shape`], so e.g.
//! `beta::logpdf(x, a, b)` accepts any mix of scalars, arrays and deferred
//! tensors whose shapes are mutually broadcastable.
//!
//! Policy shared by every family:
//! - invalid parameters raise [`Error::Domain`] before anything is computed;
//! - `x` outside the support gives `logpdf = -inf`, `pdf = 0`, and a `cdf`
//!   clamped to 0 or 1;
//! - a NaN `x` propagates as NaN.

pub mod bernoulli;
pub mod beta;
pub mod expon;
pub mod gamma;
pub mod invgamma;
pub mod lognorm;
pub mod norm;
pub mod poisson;
pub mod t;
pub mod uniform;

use std::fmt::Debug;

use ndarray::{ArrayD, Zip};
use rand::Rng;

use crate::error::{Error, Result};
use crate::eval::{broadcast_view, shape_of};
use crate::shape::{broadcast_shapes, Shape};
use crate::value::Value;

pub use bernoulli::Bernoulli;
pub use beta::Beta;
pub use expon::Expon;
pub use gamma::Gamma;
pub use invgamma::InvGamma;
pub use lognorm::LogNorm;
pub use norm::Norm;
pub use poisson::Poisson;
pub use t::StudentT;
pub use uniform::Uniform;

/// Natural log of `sqrt(2π)`.
pub(crate) const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// One scalar component of a distribution family.
pub trait Family: Sized + Debug + Send + Sync + 'static {
    /// Lower-case family name, as used by the stats surface.
    const NAME: &'static str;
    /// Parameter names in canonical positional order.
    const PARAMS: &'static [&'static str];

    /// Build a component from parameters in [`PARAMS`](Self::PARAMS) order.
    fn from_params(params: &[f64]) -> Result<Self>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;

    fn logpdf(&self, x: f64) -> f64;

    fn cdf(&self, x: f64) -> f64;

    fn pdf(&self, x: f64) -> f64 {
        self.logpdf(x).exp()
    }

    fn logcdf(&self, x: f64) -> f64 {
        self.cdf(x).ln()
    }
}

// ── Parameter validation ────────────────────────────────────────────

pub(crate) fn unpack<const N: usize>(family: &'static str, params: &[f64]) -> Result<[f64; N]> {
    <[f64; N]>::try_from(params).map_err(|_| {
        Error::Shape(format!(
            "{} takes {} parameter(s), got {}",
            family,
            N,
            params.len()
        ))
    })
}

pub(crate) fn positive(family: &'static str, param: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::Domain {
            family,
            param,
            value,
            reason: "must be finite and > 0",
        })
    }
}

pub(crate) fn finite(family: &'static str, param: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Domain {
            family,
            param,
            value,
            reason: "must be finite",
        })
    }
}

pub(crate) fn probability(family: &'static str, param: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::Domain {
            family,
            param,
            value,
            reason: "must lie in [0, 1]",
        })
    }
}

// ── Broadcasting helpers ────────────────────────────────────────────

/// Materialize parameters after checking the family's arity.
pub(crate) fn materialize_params<F: Family>(params: &[Value]) -> Result<Vec<ArrayD<f64>>> {
    if params.len() != F::PARAMS.len() {
        return Err(Error::Shape(format!(
            "{} takes {} parameter(s) ({}), got {}",
            F::NAME,
            F::PARAMS.len(),
            F::PARAMS.join(", "),
            params.len()
        )));
    }
    params.iter().map(Value::materialize).collect()
}

/// Shape obtained by broadcasting all parameter arrays together.
pub(crate) fn batch_shape(arrays: &[ArrayD<f64>]) -> Result<Shape> {
    let shapes: Vec<Shape> = arrays.iter().map(shape_of).collect();
    broadcast_shapes(&shapes)
}

/// One validated component per element of `batch`, in row-major order.
pub(crate) fn components<F: Family>(arrays: &[ArrayD<f64>], batch: &Shape) -> Result<Vec<F>> {
    let columns: Vec<Vec<f64>> = arrays
        .iter()
        .map(|a| -> Result<Vec<f64>> { Ok(broadcast_view(a, batch)?.iter().copied().collect()) })
        .collect::<Result<_>>()?;

    let mut row = vec![0.0; columns.len()];
    (0..batch.numel())
        .map(|j| {
            for (slot, col) in row.iter_mut().zip(&columns) {
                *slot = col[j];
            }
            F::from_params(&row)
        })
        .collect()
}

/// Draw `size` rows from components laid out over `batch`.
pub(crate) fn draw<F: Family, R: Rng + ?Sized>(
    comps: &[F],
    batch: &Shape,
    size: usize,
    rng: &mut R,
) -> Result<ArrayD<f64>> {
    let total = size
        .checked_mul(comps.len())
        .ok_or_else(|| Error::Shape(format!("{} draws of batch {} overflow usize", size, batch)))?;
    let mut data = Vec::new();
    data.try_reserve_exact(total)
        .map_err(|e| Error::Shape(format!("{} draws of batch {}: {}", size, batch, e)))?;
    if !comps.is_empty() {
        for _ in 0..size {
            data.extend(comps.iter().map(|c| c.sample(rng)));
        }
    }
    ArrayD::from_shape_vec(batch.prepend(size).to_ix(), data).map_err(|e| Error::Shape(e.to_string()))
}

/// Apply `f` to every element of `x` broadcast against the parameters.
fn map_elementwise<F, G>(x: Value, params: &[Value], f: G) -> Result<ArrayD<f64>>
where
    F: Family,
    G: Fn(&F, f64) -> f64,
{
    let x = x.into_array()?;
    let arrays = materialize_params::<F>(params)?;
    let batch = batch_shape(&arrays)?;
    let comps = components::<F>(&arrays, &batch)?;
    let out_shape = shape_of(&x).broadcast_with(&batch)?;

    // Position of each element's component, stretched alongside `x`.
    let index = ArrayD::from_shape_vec(batch.to_ix(), (0..comps.len()).collect::<Vec<usize>>())
        .map_err(|e| Error::Shape(e.to_string()))?;
    let index = index
        .broadcast(out_shape.to_ix())
        .ok_or_else(|| Error::incompatible(&batch, &out_shape))?;
    let xs = broadcast_view(&x, &out_shape)?;

    Ok(Zip::from(&xs).and(&index).map_collect(|&xi, &j| {
        if xi.is_nan() {
            f64::NAN
        } else {
            f(&comps[j], xi)
        }
    }))
}

// ── Array surface ───────────────────────────────────────────────────

/// Draw `size` independent samples. Result shape is
/// `(size,) + broadcast(params)`.
pub fn rvs<F: Family, R: Rng + ?Sized>(params: &[Value], size: usize, rng: &mut R) -> Result<ArrayD<f64>> {
    let arrays = materialize_params::<F>(params)?;
    let batch = batch_shape(&arrays)?;
    let comps = components::<F>(&arrays, &batch)?;
    if size == 0 {
        tracing::warn!(family = F::NAME, "rvs called with size 0");
    }
    draw(&comps, &batch, size, rng)
}

/// Log-density of `x`; result shape is `broadcast(x, params...)`.
pub fn logpdf<F: Family>(x: impl Into<Value>, params: &[Value]) -> Result<ArrayD<f64>> {
    map_elementwise::<F, _>(x.into(), params, F::logpdf)
}

pub fn pdf<F: Family>(x: impl Into<Value>, params: &[Value]) -> Result<ArrayD<f64>> {
    map_elementwise::<F, _>(x.into(), params, F::pdf)
}

pub fn cdf<F: Family>(x: impl Into<Value>, params: &[Value]) -> Result<ArrayD<f64>> {
    map_elementwise::<F, _>(x.into(), params, F::cdf)
}

pub fn logcdf<F: Family>(x: impl Into<Value>, params: &[Value]) -> Result<ArrayD<f64>> {
    map_elementwise::<F, _>(x.into(), params, F::logcdf)
}

/// Per-family free functions with positional parameters.
macro_rules! array_api {
    ($family:ty; $($p:ident),+) => {
        /// Draw `size` samples; result shape is `(size,) + broadcast(params)`.
        pub fn rvs<R: ::rand::Rng + ?Sized>(
            $($p: impl Into<$crate::value::Value>,)+
            size: usize,
            rng: &mut R,
        ) -> $crate::error::Result<::ndarray::ArrayD<f64>> {
            $crate::stats::rvs::<$family, R>(&[$($p.into()),+], size, rng)
        }

        pub fn logpdf(
            x: impl Into<$crate::value::Value>,
            $($p: impl Into<$crate::value::Value>),+
        ) -> $crate::error::Result<::ndarray::ArrayD<f64>> {
            $crate::stats::logpdf::<$family>(x, &[$($p.into()),+])
        }

        pub fn pdf(
            x: impl Into<$crate::value::Value>,
            $($p: impl Into<$crate::value::Value>),+
        ) -> $crate::error::Result<::ndarray::ArrayD<f64>> {
            $crate::stats::pdf::<$family>(x, &[$($p.into()),+])
        }

        pub fn cdf(
            x: impl Into<$crate::value::Value>,
            $($p: impl Into<$crate::value::Value>),+
        ) -> $crate::error::Result<::ndarray::ArrayD<f64>> {
            $crate::stats::cdf::<$family>(x, &[$($p.into()),+])
        }

        pub fn logcdf(
            x: impl Into<$crate::value::Value>,
            $($p: impl Into<$crate::value::Value>),+
        ) -> $crate::error::Result<::ndarray::ArrayD<f64>> {
            $crate::stats::logcdf::<$family>(x, &[$($p.into()),+])
        }
    };
}

pub(crate) use array_api;
