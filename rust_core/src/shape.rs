//! Event shapes and the broadcasting rule.
//!
//! Broadcasting follows numpy: shapes are aligned from the trailing
//! dimension, a missing leading dimension counts as 1, and a dimension of
//! size 1 stretches to match the other operand. Anything else is a
//! [`Error::Shape`].

use std::fmt;

use ndarray::IxDyn;

use crate::error::{Error, Result};

/// Ordered tuple of dimension sizes. `()` is a scalar, `(5,)` a vector of
/// five components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Self { dims: dims.into() }
    }

    /// The rank-0 shape `()`.
    pub fn scalar() -> Self {
        Self { dims: Vec::new() }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements (1 for a scalar).
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// `(n,) + self`.
    pub fn prepend(&self, n: usize) -> Shape {
        let mut dims = Vec::with_capacity(self.rank() + 1);
        dims.push(n);
        dims.extend_from_slice(&self.dims);
        Shape { dims }
    }

    /// Broadcast two shapes against each other.
    pub fn broadcast_with(&self, other: &Shape) -> Result<Shape> {
        let rank = self.rank().max(other.rank());
        let mut out = Vec::with_capacity(rank);

        for i in 0..rank {
            let a = trailing(&self.dims, i);
            let b = trailing(&other.dims, i);
            let d = if a == b || b == 1 {
                a
            } else if a == 1 {
                b
            } else {
                return Err(Error::incompatible(self, other));
            };
            out.push(d);
        }

        out.reverse();
        Ok(Shape { dims: out })
    }

    /// True when broadcasting `self` against `target` yields exactly
    /// `target`, i.e. `self` can be stretched to `target` without growing it.
    pub fn broadcasts_to(&self, target: &Shape) -> bool {
        matches!(self.broadcast_with(target), Ok(ref s) if s == target)
    }

    /// Validate that `index` addresses one component of this shape.
    pub fn check_index(&self, index: &[usize]) -> Result<()> {
        let in_range = index.len() == self.rank()
            && index.iter().zip(&self.dims).all(|(&i, &d)| i < d);
        if in_range {
            Ok(())
        } else {
            Err(Error::Index {
                index: index.to_vec(),
                shape: self.clone(),
            })
        }
    }

    pub fn to_ix(&self) -> IxDyn {
        IxDyn(&self.dims)
    }
}

/// Dimension `i` counted from the end, or 1 past the leading edge.
#[inline]
fn trailing(dims: &[usize], i: usize) -> usize {
    if i < dims.len() {
        dims[dims.len() - 1 - i]
    } else {
        1
    }
}

/// Broadcast any number of shapes together. The empty list yields `()`.
pub fn broadcast_shapes<'a, I>(shapes: I) -> Result<Shape>
where
    I: IntoIterator<Item = &'a Shape>,
{
    shapes
        .into_iter()
        .try_fold(Shape::scalar(), |acc, s| acc.broadcast_with(s))
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape { dims }
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape { dims: dims.to_vec() }
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape { dims: dims.to_vec() }
    }
}

impl From<()> for Shape {
    fn from(_: ()) -> Self {
        Shape::scalar()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dims.as_slice() {
            [] => write!(f, "()"),
            [d] => write!(f, "({},)", d),
            dims => write!(
                f,
                "({})",
                dims.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")
            ),
        }
    }
}
