// src/ops/loss/cross_entropy.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::activation::softmax::{log_sum_exp, softmax_row};
use crate::ops::{check_arity, check_rank, node_inputs, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;
use log::warn;

/// Both operands must be `[N, C]` with identical shapes.
fn check_logits_and_labels(
    kind: OpKind,
    logits: &Shape,
    labels: &Shape,
) -> Result<(), DagradError> {
    check_rank(kind, logits, 2)?;
    if logits != labels {
        return Err(DagradError::IncompatibleShapes {
            shape1: logits.to_vec(),
            shape2: labels.to_vec(),
            operation: kind.as_str().to_string(),
        });
    }
    Ok(())
}

/// `-(1/N) Σ_i Σ_j y_ij · log softmax(x)_ij`, computed in log-sum-exp form.
///
/// Output shape is `[1]`. An empty batch yields a zero loss.
#[derive(Debug)]
pub struct SoftmaxCrossEntropyOp;

impl Operator for SoftmaxCrossEntropyOp {
    fn kind(&self) -> OpKind {
        OpKind::SoftmaxCrossEntropy
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::SoftmaxCrossEntropy, input_shapes.len())?;
        check_logits_and_labels(OpKind::SoftmaxCrossEntropy, input_shapes[0], input_shapes[1])?;
        Ok(vec![Shape::new(vec![1])])
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let (logits, labels) = (inputs[0], inputs[1]);
        let dims = logits.shape().dims();
        let (batch, classes) = (dims[0], dims[1]);
        let mut out = ctx.alloc(Shape::new(vec![1]))?;
        if batch == 0 || classes == 0 {
            return Ok(vec![out]);
        }

        let mut total = 0.0f64;
        for (row, label_row) in logits.data().chunks(classes).zip(labels.data().chunks(classes)) {
            let lse = log_sum_exp(row);
            for (&x, &y) in row.iter().zip(label_row) {
                // y == 0 contributes nothing, even when log softmax underflows to -inf.
                if y != 0.0 {
                    total -= f64::from(y) * f64::from(x - lse);
                }
            }
        }
        let loss = (total / batch as f64) as f32;
        if !loss.is_finite() {
            warn!("softmax cross-entropy produced a non-finite loss ({})", loss);
        }
        out.data_mut()[0] = loss;
        Ok(vec![out])
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let [logits, labels] = node_inputs::<2>(graph, node)?;
        let grad_logits = graph.softmax_cross_entropy_grad(logits, labels, upstream)?;
        let grad_labels = graph.zeros_like(labels)?;
        Ok(vec![grad_logits, grad_labels])
    }
}

/// `(softmax(logits) · Σ_j y_ij − labels) · g / N` for a one-element upstream `g`.
///
/// With one-hot or probability labels the row sum is 1 and this is the familiar
/// `softmax − labels`; a masked (all-zero) label row gets a zero gradient.
///
/// Keeping this fused is what lets the scalar upstream reach every logit without a
/// general broadcast operator.
#[derive(Debug)]
pub struct SoftmaxCrossEntropyGradOp;

impl Operator for SoftmaxCrossEntropyGradOp {
    fn kind(&self) -> OpKind {
        OpKind::SoftmaxCrossEntropyGrad
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::SoftmaxCrossEntropyGrad, input_shapes.len())?;
        let (logits, labels, upstream) = (input_shapes[0], input_shapes[1], input_shapes[2]);
        check_logits_and_labels(OpKind::SoftmaxCrossEntropyGrad, logits, labels)?;
        if upstream.numel() != 1 {
            return Err(DagradError::ShapeMismatch {
                expected: vec![1],
                actual: upstream.to_vec(),
                operation: "SoftmaxCrossEntropyGrad (upstream gradient)".to_string(),
            });
        }
        Ok(vec![logits.clone()])
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let (logits, labels, upstream) = (inputs[0], inputs[1], inputs[2]);
        let dims = logits.shape().dims();
        let (batch, classes) = (dims[0], dims[1]);
        let mut out = ctx.alloc(logits.shape().clone())?;
        if batch == 0 || classes == 0 {
            return Ok(vec![out]);
        }

        let scale = upstream.data()[0] / batch as f32;
        for ((row, label_row), out_row) in logits
            .data()
            .chunks(classes)
            .zip(labels.data().chunks(classes))
            .zip(out.data_mut().chunks_mut(classes))
        {
            softmax_row(row, out_row);
            let label_sum: f32 = label_row.iter().sum();
            for (o, &y) in out_row.iter_mut().zip(label_row) {
                *o = (*o * label_sum - y) * scale;
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
            operation: "SoftmaxCrossEntropyGrad (second-order gradients are not supported)"
                .to_string(),
        })
    }
}
