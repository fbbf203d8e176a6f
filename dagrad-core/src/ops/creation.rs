//! Shape-preserving constant fills. Used for gradient seeds and zero gradients.

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{check_arity, node_inputs, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

fn same_shape_as_input(kind: OpKind, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
    check_arity(kind, input_shapes.len())?;
    Ok(vec![input_shapes[0].clone()])
}

/// Zeros shaped like the input. The input's values are never read.
#[derive(Debug)]
pub struct ZerosOp;

impl Operator for ZerosOp {
    fn kind(&self) -> OpKind {
        OpKind::Zeros
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        same_shape_as_input(OpKind::Zeros, input_shapes)
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        Ok(vec![ctx.alloc(inputs[0].shape().clone())?])
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        _upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let [a] = node_inputs::<1>(graph, node)?;
        Ok(vec![graph.zeros_like(a)?])
    }
}

/// Ones shaped like the input.
#[derive(Debug)]
pub struct OnesOp;

impl Operator for OnesOp {
    fn kind(&self) -> OpKind {
        OpKind::Ones
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        same_shape_as_input(OpKind::Ones, input_shapes)
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let mut out = ctx.alloc(inputs[0].shape().clone())?;
        out.fill(1.0);
        Ok(vec![out])
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        _upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let [a] = node_inputs::<1>(graph, node)?;
        Ok(vec![graph.zeros_like(a)?])
    }
}
