// src/ops/activation/relu.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{apply_unary_op, check_arity, node_inputs, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Rectified linear unit, `max(a, 0)`.
///
/// The gradient is `grad ∘ ReluMask(a)`; at exactly zero the mask is 0.
#[derive(Debug)]
pub struct ReluOp;

impl Operator for ReluOp {
    fn kind(&self) -> OpKind {
        OpKind::Relu
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::Relu, input_shapes.len())?;
        Ok(vec![input_shapes[0].clone()])
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        apply_unary_op(inputs, ctx, |x| if x > 0.0 { x } else { 0.0 })
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let [a] = node_inputs::<1>(graph, node)?;
        let mask = graph.relu_mask(a)?;
        Ok(vec![graph.mul(upstream, mask)?])
    }
}

/// Step function: 1 where `a > 0`, else 0. Piecewise constant, so its gradient is zero.
#[derive(Debug)]
pub struct ReluMaskOp;

impl Operator for ReluMaskOp {
    fn kind(&self) -> OpKind {
        OpKind::ReluMask
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::ReluMask, input_shapes.len())?;
        Ok(vec![input_shapes[0].clone()])
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        apply_unary_op(inputs, ctx, |x| if x > 0.0 { 1.0 } else { 0.0 })
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
