// dagrad-core/src/ops/arithmetic/sub.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{apply_binary_op, infer_same_shape, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// `a - b`. Gradients: `grad` for `a`, `-grad` for `b`.
#[derive(Debug)]
pub struct SubOp;

impl Operator for SubOp {
    fn kind(&self) -> OpKind {
        OpKind::Subtract
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        infer_same_shape(OpKind::Subtract, input_shapes)
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        apply_binary_op(inputs, ctx, |a, b| a - b)
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        _node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let grad_b = graph.neg(upstream)?;
        Ok(vec![upstream, grad_b])
    }
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
