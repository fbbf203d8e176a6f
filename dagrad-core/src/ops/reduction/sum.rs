use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{check_arity, node_inputs, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Sums over axis 0, removing it: `[N, d1, ..]` becomes `[d1, ..]`, and a rank-1
/// input becomes a scalar.
///
/// The gradient broadcasts the upstream back along a new axis 0 to the input's shape.
#[derive(Debug)]
pub struct ReduceSumAxis0Op;

impl Operator for ReduceSumAxis0Op {
    fn kind(&self) -> OpKind {
        OpKind::ReduceSumAxis0
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::ReduceSumAxis0, input_shapes.len())?;
        let input = input_shapes[0];
        if input.ndim() == 0 {
            return Err(DagradError::RankMismatch {
                expected: 1,
                actual: 0,
                operation: "ReduceSumAxis0 (input must have at least one axis)".to_string(),
            });
        }
        Ok(vec![Shape::new(input.dims()[1..].to_vec())])
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let input = inputs[0];
        let rest = Shape::new(input.shape().dims()[1..].to_vec());
        let inner = rest.numel();
        let mut out = ctx.alloc(rest)?;
        let out_data = out.data_mut();
        // N == 0 leaves the zero-filled buffer untouched.
        for row in input.data().chunks(inner.max(1)) {
            for (acc, &x) in out_data.iter_mut().zip(row) {
                *acc += x;
            }
        }
        Ok(vec![out])
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let [input] = node_inputs::<1>(graph, node)?;
        Ok(vec![graph.broadcast_to(upstream, input)?])
    }
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
