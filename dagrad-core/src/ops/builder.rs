//! Node construction helpers.
//!
//! [`OpBuilder`] wires inputs and attributes for any operator kind; the `Graph`
//! methods below are the everyday entry points (`graph.add(a, b)`,
//! `graph.matmul(x, w, false, false)`, ...). Rust operators cannot borrow the arena
//! mutably, so `a += b` is spelled `a = graph.add(a, b)?`.

use crate::error::DagradError;
use crate::graph::{AttrValue, Attrs, Graph, NodeId};
use crate::ops::OpKind;

/// Fluent builder for one operator node.
#[derive(Debug, Clone)]
pub struct OpBuilder {
    kind: OpKind,
    inputs: Vec<NodeId>,
    attrs: Attrs,
}

impl OpBuilder {
    pub fn new(kind: OpKind) -> Self {
        OpBuilder {
            kind,
            inputs: Vec::new(),
            attrs: Attrs::new(),
        }
    }

    /// Builder for the operator with type tag `name`.
    ///
    /// # Errors
    /// `DagradError::UnknownOperator` if `name` is not a known tag.
    pub fn from_name(name: &str) -> Result<Self, DagradError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn input(mut self, id: NodeId) -> Self {
        self.inputs.push(id);
        self
    }

    pub fn inputs(mut self, ids: &[NodeId]) -> Self {
        self.inputs.extend_from_slice(ids);
        self
    }

    pub fn attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Adds the node to `graph` (or returns the identical node already there).
    pub fn build(self, graph: &mut Graph) -> Result<NodeId, DagradError> {
        graph.insert_op_node(self.kind, self.inputs, self.attrs)
    }
}

pub(crate) const TRANS_A: &str = "trans_a";
pub(crate) const TRANS_B: &str = "trans_b";
pub(crate) const CONST_VAL: &str = "const_val";

impl Graph {
    fn binary(&mut self, kind: OpKind, lhs: NodeId, rhs: NodeId) -> Result<NodeId, DagradError> {
        OpBuilder::new(kind).input(lhs).input(rhs).build(self)
    }

    fn unary(&mut self, kind: OpKind, x: NodeId) -> Result<NodeId, DagradError> {
        OpBuilder::new(kind).input(x).build(self)
    }

    pub fn add(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, DagradError> {
        self.binary(OpKind::Add, lhs, rhs)
    }

    pub fn sub(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, DagradError> {
        self.binary(OpKind::Subtract, lhs, rhs)
    }

    pub fn mul(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, DagradError> {
        self.binary(OpKind::Multiply, lhs, rhs)
    }

    pub fn div(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, DagradError> {
        self.binary(OpKind::Divide, lhs, rhs)
    }

    /// Matrix product `op(lhs) · op(rhs)` where `op` transposes when the flag is set.
    pub fn matmul(
        &mut self,
        lhs: NodeId,
        rhs: NodeId,
        trans_a: bool,
        trans_b: bool,
    ) -> Result<NodeId, DagradError> {
        OpBuilder::new(OpKind::MatMul)
            .input(lhs)
            .input(rhs)
            .attr(TRANS_A, trans_a)
            .attr(TRANS_B, trans_b)
            .build(self)
    }

    /// `x * k`
    pub fn scale(&mut self, x: NodeId, k: f32) -> Result<NodeId, DagradError> {
        check_finite(k, "scale")?;
        OpBuilder::new(OpKind::ScaleByConstant)
            .input(x)
            .attr(CONST_VAL, k)
            .build(self)
    }

    /// `x + k`
    pub fn add_scalar(&mut self, x: NodeId, k: f32) -> Result<NodeId, DagradError> {
        check_finite(k, "add_scalar")?;
        OpBuilder::new(OpKind::AddConstant)
            .input(x)
            .attr(CONST_VAL, k)
            .build(self)
    }

    /// `x - k`, built as `x + (-k)`.
    pub fn sub_scalar(&mut self, x: NodeId, k: f32) -> Result<NodeId, DagradError> {
        self.add_scalar(x, -k)
    }

    /// `x / k`, built as `x * (1/k)`.
    pub fn div_scalar(&mut self, x: NodeId, k: f32) -> Result<NodeId, DagradError> {
        if k == 0.0 {
            return Err(DagradError::MalformedAttribute {
                node: format!("ScaleByConstant({})", x),
                key: CONST_VAL.to_string(),
                expected: "a non-zero divisor".to_string(),
            });
        }
        self.scale(x, 1.0 / k)
    }

    /// `-x`, built as `x * -1`.
    pub fn neg(&mut self, x: NodeId) -> Result<NodeId, DagradError> {
        self.scale(x, -1.0)
    }

    pub fn reduce_sum_axis0(&mut self, x: NodeId) -> Result<NodeId, DagradError> {
        self.unary(OpKind::ReduceSumAxis0, x)
    }

    /// Replicates `x` along a new leading axis so it takes the shape of `target`.
    pub fn broadcast_to(&mut self, x: NodeId, target: NodeId) -> Result<NodeId, DagradError> {
        self.binary(OpKind::BroadcastTo, x, target)
    }

    pub fn softmax(&mut self, x: NodeId) -> Result<NodeId, DagradError> {
        self.unary(OpKind::Softmax, x)
    }

    /// Mean cross-entropy between `softmax(logits)` and one-hot (or soft) `labels`.
    pub fn softmax_cross_entropy(
        &mut self,
        logits: NodeId,
        labels: NodeId,
    ) -> Result<NodeId, DagradError> {
        self.binary(OpKind::SoftmaxCrossEntropy, logits, labels)
    }

    pub fn relu(&mut self, x: NodeId) -> Result<NodeId, DagradError> {
        self.unary(OpKind::Relu, x)
    }

    pub(crate) fn relu_mask(&mut self, x: NodeId) -> Result<NodeId, DagradError> {
        self.unary(OpKind::ReluMask, x)
    }

    pub(crate) fn softmax_cross_entropy_grad(
        &mut self,
        logits: NodeId,
        labels: NodeId,
        upstream: NodeId,
    ) -> Result<NodeId, DagradError> {
        OpBuilder::new(OpKind::SoftmaxCrossEntropyGrad)
            .inputs(&[logits, labels, upstream])
            .build(self)
    }

    /// Zeros shaped like `x`.
    pub fn zeros_like(&mut self, x: NodeId) -> Result<NodeId, DagradError> {
        self.unary(OpKind::Zeros, x)
    }

    /// Ones shaped like `x`.
    pub fn ones_like(&mut self, x: NodeId) -> Result<NodeId, DagradError> {
        self.unary(OpKind::Ones, x)
    }
}

fn check_finite(k: f32, operation: &str) -> Result<(), DagradError> {
    if !k.is_finite() {
        return Err(DagradError::MalformedAttribute {
            node: operation.to_string(),
            key: CONST_VAL.to_string(),
            expected: format!("a finite constant, got {}", k),
        });
    }
    Ok(())
}
