//! Error types for stochast.

use thiserror::Error;

use crate::shape::Shape;

/// Errors raised by shape checking, parameter validation and indexing.
///
/// Every variant is returned at the call that detects it; nothing is
/// partially computed. Density evaluation outside a family's support is
/// *not* an error (it yields `-inf`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Shapes cannot be broadcast together, or a declared shape disagrees
    /// with the shape of a parameter or sample.
    #[error("Shape error: {0}")]
    Shape(String),

    /// A distribution parameter lies outside its valid range.
    #[error("Domain error: {family} parameter `{param}` = {value}: {reason}")]
    Domain {
        family: &'static str,
        param: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// An index does not address a component of the event shape.
    #[error("Index error: index {index:?} out of range for shape {shape}")]
    Index { index: Vec<usize>, shape: Shape },
}

impl Error {
    /// Shape error for two shapes that cannot be broadcast together.
    pub(crate) fn incompatible(a: &Shape, b: &Shape) -> Self {
        Error::Shape(format!("shapes {} and {} are not broadcastable", a, b))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
