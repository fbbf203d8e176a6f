// src/ops/linalg/matmul.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::builder::{TRANS_A, TRANS_B};
use crate::ops::{check_arity, check_rank, node_inputs, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Rank-2 matrix product `op(A) · op(B)`, where `op` transposes its argument when the
/// node's `trans_a` / `trans_b` flag is set.
///
/// With `op(A)` of shape `[m, k]` and `op(B)` of shape `[k, n]` the output is `[m, n]`.
#[derive(Debug)]
pub struct MatMulOp;

/// Row/column counts of `op(X)` for a stored `[rows, cols]` matrix.
fn effective_dims(shape: &Shape, transposed: bool) -> (usize, usize) {
    let (rows, cols) = (shape.dims()[0], shape.dims()[1]);
    if transposed {
        (cols, rows)
    } else {
        (rows, cols)
    }
}

fn transpose_flags(node: &Node) -> Result<(bool, bool), DagradError> {
    Ok((node.attr_bool(TRANS_A)?, node.attr_bool(TRANS_B)?))
}

impl Operator for MatMulOp {
    fn kind(&self) -> OpKind {
        OpKind::MatMul
    }

    fn infer(&self, node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::MatMul, input_shapes.len())?;
        let (trans_a, trans_b) = transpose_flags(node)?;
        let (a, b) = (input_shapes[0], input_shapes[1]);
        check_rank(OpKind::MatMul, a, 2)?;
        check_rank(OpKind::MatMul, b, 2)?;

        let (m, k_a) = effective_dims(a, trans_a);
        let (k_b, n) = effective_dims(b, trans_b);
        if k_a != k_b {
            return Err(DagradError::IncompatibleShapes {
                shape1: a.to_vec(),
                shape2: b.to_vec(),
                operation: format!(
                    "MatMul(trans_a={}, trans_b={}): inner dimensions {} and {} differ",
                    trans_a, trans_b, k_a, k_b
                ),
            });
        }
        Ok(vec![Shape::new(vec![m, n])])
    }

    fn compute(
        &self,
        node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let (trans_a, trans_b) = transpose_flags(node)?;
        let (a, b) = (inputs[0], inputs[1]);
        let a_cols = a.shape().dims()[1];
        let b_cols = b.shape().dims()[1];
        let (m, k) = effective_dims(a.shape(), trans_a);
        let (_, n) = effective_dims(b.shape(), trans_b);

        let a_data = a.data();
        let b_data = b.data();
        let a_at = |i: usize, p: usize| {
            if trans_a {
                a_data[p * a_cols + i]
            } else {
                a_data[i * a_cols + p]
            }
        };
        let b_at = |p: usize, j: usize| {
            if trans_b {
                b_data[j * b_cols + p]
            } else {
                b_data[p * b_cols + j]
            }
        };

        let mut out = ctx.alloc(Shape::new(vec![m, n]))?;
        let out_data = out.data_mut();
        for i in 0..m {
            for j in 0..n {
                let mut acc = 0.0f32;
                for p in 0..k {
                    acc += a_at(i, p) * b_at(p, j);
                }
                out_data[i * n + j] = acc;
            }
        }
        Ok(vec![out])
    }

    /// For `C = op(A)·op(B)` with upstream `G`:
    ///
    /// | trans_a | trans_b | dA        | dB        |
    /// |---------|---------|-----------|-----------|
    /// | false   | false   | G·Bᵀ      | Aᵀ·G      |
    /// | true    | false   | B·Gᵀ      | A·G       |
    /// | false   | true    | G·B       | Gᵀ·A      |
    /// | true    | true    | Bᵀ·Gᵀ     | Gᵀ·Aᵀ     |
    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let (trans_a, trans_b) = transpose_flags(graph.node(node)?)?;
        let [a, b] = node_inputs::<2>(graph, node)?;
        let g = upstream;
        let (grad_a, grad_b) = match (trans_a, trans_b) {
            (false, false) => (
                graph.matmul(g, b, false, true)?,
                graph.matmul(a, g, true, false)?,
            ),
            (true, false) => (
                graph.matmul(b, g, false, true)?,
                graph.matmul(a, g, false, false)?,
            ),
            (false, true) => (
                graph.matmul(g, b, false, false)?,
                graph.matmul(g, a, true, false)?,
            ),
            (true, true) => (
                graph.matmul(b, g, true, true)?,
                graph.matmul(g, a, true, true)?,
            ),
        };
        Ok(vec![grad_a, grad_b])
    }
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
