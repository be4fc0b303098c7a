//! Polymorphic numeric input.
//!
//! Parameters and observations may arrive as plain numbers, concrete
//! arrays, or deferred [`Tensor`] handles. They are normalized to an
//! `ArrayD<f64>` at the API boundary, so a `0.5`, a 0-d array holding
//! `0.5` and a tensor evaluating to `0.5` behave identically downstream.

use ndarray::{Array1, ArrayD, IxDyn};

use crate::error::Result;
use crate::eval::shape_of;
use crate::graph::Tensor;
use crate::shape::Shape;

#[derive(Debug, Clone)]
pub enum Value {
    Scalar(f64),
    Array(ArrayD<f64>),
    Deferred(Tensor),
}

impl Value {
    /// Concrete array for this value. Deferred handles are evaluated here.
    pub fn materialize(&self) -> Result<ArrayD<f64>> {
        match self {
            Value::Scalar(v) => Ok(ArrayD::from_elem(IxDyn(&[]), *v)),
            Value::Array(a) => Ok(a.clone()),
            Value::Deferred(t) => t.eval(),
        }
    }

    /// Like [`materialize`](Self::materialize) but consumes `self`, avoiding
    /// a copy for arrays.
    pub fn into_array(self) -> Result<ArrayD<f64>> {
        match self {
            Value::Array(a) => Ok(a),
            other => other.materialize(),
        }
    }

    /// Shape of the value; deferred handles are not evaluated.
    pub fn shape(&self) -> Result<Shape> {
        match self {
            Value::Scalar(_) => Ok(Shape::scalar()),
            Value::Array(a) => Ok(shape_of(a)),
            Value::Deferred(t) => t.shape(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Value::Deferred(_))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Array(Array1::from(v).into_dyn())
    }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self {
        Value::Array(Array1::from(v.to_vec()).into_dyn())
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(v: [f64; N]) -> Self {
        Value::Array(Array1::from(v.to_vec()).into_dyn())
    }
}

impl From<Array1<f64>> for Value {
    fn from(v: Array1<f64>) -> Self {
        Value::Array(v.into_dyn())
    }
}

impl From<ArrayD<f64>> for Value {
    fn from(v: ArrayD<f64>) -> Self {
        Value::Array(v)
    }
}

impl From<&ArrayD<f64>> for Value {
    fn from(v: &ArrayD<f64>) -> Self {
        Value::Array(v.clone())
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Value::Deferred(t)
    }
}

impl From<&Tensor> for Value {
    fn from(t: &Tensor) -> Self {
        Value::Deferred(t.clone())
    }
}
