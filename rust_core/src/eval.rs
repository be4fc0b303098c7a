use ndarray::{ArrayD, ArrayViewD, Zip};

use crate::error::{Error, Result};
use crate::graph::{Node, NodeId, Op};
use crate::shape::Shape;

/// Shape of an `ndarray` array as a [`Shape`].
#[inline]
pub fn shape_of(a: &ArrayD<f64>) -> Shape {
    Shape::from(a.shape())
}

/// View `a` with the shape `target`, stretching size-1 axes.
pub fn broadcast_view<'a>(a: &'a ArrayD<f64>, target: &Shape) -> Result<ArrayViewD<'a, f64>> {
    a.broadcast(target.to_ix())
        .ok_or_else(|| Error::incompatible(&shape_of(a), target))
}

/// Element-wise binary map over two broadcast operands.
pub fn zip_broadcast<F>(a: &ArrayD<f64>, b: &ArrayD<f64>, f: F) -> Result<ArrayD<f64>>
where
    F: Fn(f64, f64) -> f64,
{
    let target = shape_of(a).broadcast_with(&shape_of(b))?;
    let av = broadcast_view(a, &target)?;
    let bv = broadcast_view(b, &target)?;
    Ok(Zip::from(&av).and(&bv).map_collect(|&x, &y| f(x, y)))
}

/// Nodes `0..=id`, or an index error if `id` came from another graph.
fn prefix(nodes: &[Node], id: NodeId) -> Result<&[Node]> {
    nodes.get(..=id.0).ok_or_else(|| Error::Index {
        index: vec![id.0],
        shape: Shape::new(vec![nodes.len()]),
    })
}

/// Forward-evaluate every node up to and including `upto`.
pub fn forward(nodes: &[Node], upto: NodeId) -> Result<Vec<ArrayD<f64>>> {
    let prefix = prefix(nodes, upto)?;
    let mut values: Vec<ArrayD<f64>> = Vec::with_capacity(prefix.len());

    for node in prefix {
        let val = match &node.op {
            Op::Constant(c) => c.clone(),
            Op::Fill { shape, value } => ArrayD::from_elem(shape.to_ix(), *value),
            Op::Add(a, b) => zip_broadcast(&values[a.0], &values[b.0], |x, y| x + y)?,
            Op::Sub(a, b) => zip_broadcast(&values[a.0], &values[b.0], |x, y| x - y)?,
            Op::Mul(a, b) => zip_broadcast(&values[a.0], &values[b.0], |x, y| x * y)?,
            Op::Div(a, b) => zip_broadcast(&values[a.0], &values[b.0], |x, y| x / y)?,
            Op::Neg(a) => values[a.0].mapv(|x| -x),
            Op::Exp(a) => values[a.0].mapv(f64::exp),
            Op::Log(a) => values[a.0].mapv(f64::ln),
            Op::Square(a) => values[a.0].mapv(|x| x * x),
        };
        values.push(val);
    }

    Ok(values)
}

/// Evaluate a single node.
pub fn eval_node(nodes: &[Node], id: NodeId) -> Result<ArrayD<f64>> {
    let mut values = forward(nodes, id)?;
    // `forward` pushes exactly `id + 1` values.
    Ok(values.swap_remove(id.0))
}

/// Static shape inference: same walk as [`forward`], shapes only.
pub fn infer_shape(nodes: &[Node], id: NodeId) -> Result<Shape> {
    let prefix = prefix(nodes, id)?;
    let mut shapes: Vec<Shape> = Vec::with_capacity(prefix.len());

    for node in prefix {
        let s = match &node.op {
            Op::Constant(c) => shape_of(c),
            Op::Fill { shape, .. } => shape.clone(),
            Op::Add(a, b) | Op::Sub(a, b) | Op::Mul(a, b) | Op::Div(a, b) => {
                shapes[a.0].broadcast_with(&shapes[b.0])?
            }
            Op::Neg(a) | Op::Exp(a) | Op::Log(a) | Op::Square(a) => shapes[a.0].clone(),
        };
        shapes.push(s);
    }

    Ok(shapes.swap_remove(id.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_zip_broadcast_row_against_column() {
        let row = arr1(&[1.0, 2.0, 3.0]).into_dyn();
        let col = arr2(&[[10.0], [20.0]]).into_dyn();
        let out = zip_broadcast(&row, &col, |x, y| x + y).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out[[1, 2]], 23.0);
    }

    #[test]
    fn test_broadcast_view_rejects_shrinking() {
        let a = arr1(&[1.0, 2.0]).into_dyn();
        assert!(broadcast_view(&a, &Shape::from([3])).is_err());
        assert!(broadcast_view(&a, &Shape::from([4, 2])).is_ok());
    }

    #[test]
    fn test_forward_exp_log_roundtrip() {
        let mut g = Graph::new();
        let c = g.add_constant(arr1(&[0.25, 1.0, 4.0]).into_dyn());
        let l = g.log(c);
        let e = g.exp(l);
        let v = g.eval(e).unwrap();
        for (got, want) in v.iter().zip([0.25, 1.0, 4.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_infer_matches_forward() {
        let mut g = Graph::new();
        let a = g.ones([3, 1]);
        let b = g.fill([4], 2.0);
        let c = g.div(a, b);
        let d = g.neg(c);
        let inferred = infer_shape(&g.nodes, d).unwrap();
        let evaluated = eval_node(&g.nodes, d).unwrap();
        assert_eq!(inferred, shape_of(&evaluated));
        assert_eq!(inferred, Shape::from([3, 4]));
        assert_relative_eq!(evaluated[[2, 3]], -0.5);
    }
}
