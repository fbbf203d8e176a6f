// dagrad-core/src/ops/arithmetic/div.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{apply_binary_op, infer_same_shape, node_inputs, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Element-wise quotient `a / b`.
///
/// Gradients: `grad / b` for `a` and `-(grad ∘ a) / (b ∘ b)` for `b`.
/// Division by zero follows IEEE-754 (inf/NaN), it is not an error.
#[derive(Debug)]
pub struct DivOp;

impl Operator for DivOp {
    fn kind(&self) -> OpKind {
        OpKind::Divide
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        infer_same_shape(OpKind::Divide, input_shapes)
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        apply_binary_op(inputs, ctx, |a, b| a / b)
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let [a, b] = node_inputs::<2>(graph, node)?;
        let grad_a = graph.div(upstream, b)?;

        let grad_times_a = graph.mul(upstream, a)?;
        let b_squared = graph.mul(b, b)?;
        let quotient = graph.div(grad_times_a, b_squared)?;
        let grad_b = graph.neg(quotient)?;
        Ok(vec![grad_a, grad_b])
    }
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
