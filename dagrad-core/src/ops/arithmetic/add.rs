// dagrad-core/src/ops/arithmetic/add.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{apply_binary_op, infer_same_shape, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// `a + b`. Both operands receive the upstream gradient unchanged.
#[derive(Debug)]
pub struct AddOp;

impl Operator for AddOp {
    fn kind(&self) -> OpKind {
        OpKind::Add
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        infer_same_shape(OpKind::Add, input_shapes)
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        apply_binary_op(inputs, ctx, |a, b| a + b)
    }

    fn gradient(
        &self,
        _graph: &mut Graph,
        _node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        Ok(vec![upstream, upstream])
    }
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
