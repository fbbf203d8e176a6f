// dagrad-core/src/ops/arithmetic/mul.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{apply_binary_op, infer_same_shape, node_inputs, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Element-wise product `a ∘ b`. Gradients: `grad ∘ b` for `a`, `grad ∘ a` for `b`.
#[derive(Debug)]
pub struct MulOp;

impl Operator for MulOp {
    fn kind(&self) -> OpKind {
        OpKind::Multiply
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        infer_same_shape(OpKind::Multiply, input_shapes)
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        apply_binary_op(inputs, ctx, |a, b| a * b)
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let [a, b] = node_inputs::<2>(graph, node)?;
        let grad_a = graph.mul(upstream, b)?;
        let grad_b = graph.mul(upstream, a)?;
        Ok(vec![grad_a, grad_b])
    }
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
