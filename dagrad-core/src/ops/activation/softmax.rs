// src/ops/activation/softmax.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{check_arity, check_rank, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;
use num_traits::Float;

/// `log Σ exp(x)`, shifted by the row maximum so large logits do not overflow.
pub(crate) fn log_sum_exp<T: Float>(row: &[T]) -> T {
    let max = row.iter().copied().fold(T::neg_infinity(), |a, b| a.max(b));
    if !max.is_finite() {
        return max;
    }
    let sum = row.iter().fold(T::zero(), |acc, &x| acc + (x - max).exp());
    max + sum.ln()
}

/// Writes `softmax(row)` into `out`.
pub(crate) fn softmax_row<T: Float>(row: &[T], out: &mut [T]) {
    let lse = log_sum_exp(row);
    for (o, &x) in out.iter_mut().zip(row) {
        *o = (x - lse).exp();
    }
}

/// Row-wise softmax over a rank-2 `[N, C]` input.
#[derive(Debug)]
pub struct SoftmaxOp;

impl Operator for SoftmaxOp {
    fn kind(&self) -> OpKind {
        OpKind::Softmax
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::Softmax, input_shapes.len())?;
        check_rank(OpKind::Softmax, input_shapes[0], 2)?;
        Ok(vec![input_shapes[0].clone()])
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let input = inputs[0];
        let cols = input.shape().dims()[1];
        let mut out = ctx.alloc(input.shape().clone())?;
        if cols > 0 {
            for (row, out_row) in input.data().chunks(cols).zip(out.data_mut().chunks_mut(cols)) {
                softmax_row(row, out_row);
            }
        }
        Ok(vec![out])
    }

    fn gradient(
        &self,
        _graph: &mut Graph,
        _node: NodeId,
        _upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        Err(DagradError::NotDifferentiable {
            operation: "Softmax (differentiate through SoftmaxCrossEntropy instead)".to_string(),
        })
    }
}
