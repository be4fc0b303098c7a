//! Deferred tensor expressions.
//!
//! A [`Graph`] records array operations without running them. Nodes are
//! stored in topological order (each node only references earlier nodes),
//! so any prefix of the node list is itself a valid graph. A [`Tensor`] is a
//! frozen, shareable handle to one node; nothing is computed until
//! [`Tensor::eval`] (or [`Graph::eval`]) is called.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ndarray::ArrayD;

use crate::error::Result;
use crate::eval;
use crate::shape::Shape;

/// Unique identifier for a node in the expression graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Operations supported in the expression graph.
#[derive(Debug, Clone)]
pub enum Op {
    /// A concrete array baked into the graph.
    Constant(ArrayD<f64>),
    /// An array of `shape` with every element equal to `value`.
    Fill { shape: Shape, value: f64 },
    /// Element-wise binary operations; operands broadcast.
    Add(NodeId, NodeId),
    Sub(NodeId, NodeId),
    Mul(NodeId, NodeId),
    Div(NodeId, NodeId),
    Neg(NodeId),
    Exp(NodeId),
    Log(NodeId),
    Square(NodeId),
}

/// A single node in the expression graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub op: Op,
    pub name: Option<String>,
}

/// Append-only arena of deferred array operations.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    name_to_node: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, op: Op, name: Option<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(ref n) = name {
            self.name_to_node.insert(n.clone(), id);
        }
        self.nodes.push(Node { id, op, name });
        id
    }

    pub fn add_constant(&mut self, value: impl Into<ArrayD<f64>>) -> NodeId {
        self.add_node(Op::Constant(value.into()), None)
    }

    pub fn add_scalar(&mut self, value: f64) -> NodeId {
        self.add_node(Op::Constant(ArrayD::from_elem(Shape::scalar().to_ix(), value)), None)
    }

    pub fn add_named_constant(&mut self, name: &str, value: impl Into<ArrayD<f64>>) -> NodeId {
        self.add_node(Op::Constant(value.into()), Some(name.to_string()))
    }

    pub fn fill(&mut self, shape: impl Into<Shape>, value: f64) -> NodeId {
        self.add_node(
            Op::Fill {
                shape: shape.into(),
                value,
            },
            None,
        )
    }

    pub fn zeros(&mut self, shape: impl Into<Shape>) -> NodeId {
        self.fill(shape, 0.0)
    }

    pub fn ones(&mut self, shape: impl Into<Shape>) -> NodeId {
        self.fill(shape, 1.0)
    }

    pub fn add(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.add_node(Op::Add(a, b), None)
    }

    pub fn sub(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.add_node(Op::Sub(a, b), None)
    }

    pub fn mul(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.add_node(Op::Mul(a, b), None)
    }

    pub fn div(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.add_node(Op::Div(a, b), None)
    }

    pub fn neg(&mut self, a: NodeId) -> NodeId {
        self.add_node(Op::Neg(a), None)
    }

    pub fn exp(&mut self, a: NodeId) -> NodeId {
        self.add_node(Op::Exp(a), None)
    }

    pub fn log(&mut self, a: NodeId) -> NodeId {
        self.add_node(Op::Log(a), None)
    }

    pub fn square(&mut self, a: NodeId) -> NodeId {
        self.add_node(Op::Square(a), None)
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_to_node.get(name).copied()
    }

    /// Infer the shape of `id` without evaluating anything.
    ///
    /// Returns `Error::Index` if `id` was not created by this graph.
    pub fn shape_of(&self, id: NodeId) -> Result<Shape> {
        eval::infer_shape(&self.nodes, id)
    }

    /// Evaluate `id` and every node it depends on.
    ///
    /// Returns `Error::Index` if `id` was not created by this graph.
    pub fn eval(&self, id: NodeId) -> Result<ArrayD<f64>> {
        eval::eval_node(&self.nodes, id)
    }

    /// Freeze the graph up to `id` into a handle that can outlive `self`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this graph.
    pub fn tensor(&self, id: NodeId) -> Tensor {
        assert!(id.0 < self.nodes.len(), "node {:?} does not belong to this graph", id);
        Tensor {
            nodes: self.nodes[..=id.0].into(),
            id,
        }
    }
}

/// Handle to a deferred array expression.
///
/// Cloning is cheap; the underlying nodes are shared.
#[derive(Clone)]
pub struct Tensor {
    nodes: Arc<[Node]>,
    id: NodeId,
}

impl Tensor {
    /// Materialize the expression into a concrete array.
    pub fn eval(&self) -> Result<ArrayD<f64>> {
        tracing::trace!(node = self.id.0, n_nodes = self.nodes.len(), "evaluating deferred tensor");
        eval::eval_node(&self.nodes, self.id)
    }

    /// Static shape of the expression; nothing is evaluated.
    pub fn shape(&self) -> Result<Shape> {
        eval::infer_shape(&self.nodes, self.id)
    }

    pub fn name(&self) -> Option<&str> {
        self.nodes[self.id.0].name.as_deref()
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("n_nodes", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::arr1;

    #[test]
    fn test_zeros_plus_scalar() {
        let mut g = Graph::new();
        let z = g.zeros([5]);
        let half = g.add_scalar(0.5);
        let a = g.add(z, half);

        assert_eq!(g.shape_of(a).unwrap(), Shape::from([5]));
        let v = g.eval(a).unwrap();
        assert_eq!(v.shape(), &[5]);
        assert!(v.iter().all(|&x| x == 0.5));
    }

    #[test]
    fn test_tensor_outlives_graph() {
        let t = {
            let mut g = Graph::new();
            let c = g.add_constant(arr1(&[1.0, 2.0, 3.0]).into_dyn());
            let sq = g.square(c);
            g.tensor(sq)
        };
        let v = t.eval().unwrap();
        assert_eq!(v.as_slice().unwrap(), &[1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_tensor_snapshot_ignores_later_nodes() {
        let mut g = Graph::new();
        let one = g.ones([2]);
        let t = g.tensor(one);
        let _later = g.neg(one);
        assert_eq!(t.eval().unwrap().as_slice().unwrap(), &[1.0, 1.0]);
    }

    #[test]
    fn test_shape_mismatch_is_reported_before_eval() {
        let mut g = Graph::new();
        let a = g.zeros([3]);
        let b = g.ones([2]);
        let c = g.mul(a, b);
        assert!(matches!(g.shape_of(c), Err(Error::Shape(_))));
        assert!(matches!(g.eval(c), Err(Error::Shape(_))));
    }

    #[test]
    fn test_foreign_node_id_is_an_error() {
        let mut big = Graph::new();
        let _ = big.zeros([2]);
        let _ = big.ones([2]);
        let foreign = big.add_scalar(1.0);

        let mut small = Graph::new();
        let _ = small.zeros([2]);
        assert!(matches!(small.eval(foreign), Err(Error::Index { .. })));
        assert!(matches!(small.shape_of(foreign), Err(Error::Index { .. })));
        assert!(matches!(Graph::new().eval(foreign), Err(Error::Index { .. })));
    }

    #[test]
    fn test_named_constant_lookup() {
        let mut g = Graph::new();
        let id = g.add_named_constant("alpha", arr1(&[0.5]).into_dyn());
        assert_eq!(g.node_by_name("alpha"), Some(id));
        assert_eq!(g.tensor(id).name(), Some("alpha"));
        assert_eq!(g.node_by_name("beta"), None);
    }
}
