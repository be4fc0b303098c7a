//! Random variables and distribution primitives with numpy-style
//! broadcasting over batch shapes.

pub mod error;
pub mod eval;
pub mod graph;
pub mod models;
pub mod rng;
pub mod shape;
pub mod stats;
pub mod value;

pub use error::{Error, Result};
pub use graph::{Graph, NodeId, Tensor};
pub use models::{RandomVariable, Variable};
pub use rng::{RandomState, RngConfig};
pub use shape::Shape;
pub use value::Value;

// Future: reparameterized sampling so log_prob can be differentiated through
// deferred parameters.
