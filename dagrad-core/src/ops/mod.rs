//! # Operators (`ops`)
//!
//! Every non-placeholder node dispatches to one [`Operator`]. An operator exposes
//! three things to the graph engine:
//!
//! - **`infer`**: output shapes from input shapes and the node's attributes. Never
//!   looks at values.
//! - **`compute`**: output tensors from input tensors whose shapes already passed
//!   `infer`.
//! - **`gradient`**: the *symbolic* local gradient. Given the node and a node holding
//!   the upstream gradient, it builds one new graph node per input using the graph
//!   helpers, so gradients are ordinary nodes that the evaluator runs like any other.
//!
//! The operator set is closed ([`OpKind`]). Instances are stateless and shared: the
//! [`registry`] creates each one on first use and hands out the same `Arc` afterwards.
//! Attribute values (transpose flags, constants) live on the node, not the operator.
//!
//! ## Submodules
//!
//! - [`arithmetic`]: element-wise binaries and constant scaling/shifting.
//! - [`linalg`]: matrix multiplication with transpose flags.
//! - [`reduction`]: sum over axis 0.
//! - [`view`]: broadcast along a new axis 0.
//! - [`activation`]: relu, relu mask, softmax.
//! - [`loss`]: softmax cross-entropy and its fused gradient.
//! - [`creation`]: shape-preserving zeros/ones.

pub mod activation;
pub mod arithmetic;
pub mod builder;
pub mod creation;
pub mod linalg;
pub mod loss;
pub mod reduction;
pub mod registry;
pub mod view;

pub use builder::OpBuilder;

use crate::device::StorageDevice;
use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::shape::Shape;
use crate::tensor::Tensor;
use std::fmt::{self, Debug};
use std::str::FromStr;

/// Per-run information handed to every kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpContext {
    /// Where output buffers must be allocated.
    pub device: StorageDevice,
}

impl OpContext {
    pub fn new(device: StorageDevice) -> Self {
        OpContext { device }
    }

    /// Allocates a zero-filled output buffer on this context's device.
    pub fn alloc(&self, shape: Shape) -> Result<Tensor, DagradError> {
        Tensor::zeros_on(shape, self.device)
    }
}

/// The closed set of operator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    MatMul,
    ScaleByConstant,
    AddConstant,
    ReduceSumAxis0,
    BroadcastTo,
    Softmax,
    SoftmaxCrossEntropy,
    SoftmaxCrossEntropyGrad,
    Relu,
    ReluMask,
    Zeros,
    Ones,
}

impl OpKind {
    pub const ALL: [OpKind; 16] = [
        OpKind::Add,
        OpKind::Subtract,
        OpKind::Multiply,
        OpKind::Divide,
        OpKind::MatMul,
        OpKind::ScaleByConstant,
        OpKind::AddConstant,
        OpKind::ReduceSumAxis0,
        OpKind::BroadcastTo,
        OpKind::Softmax,
        OpKind::SoftmaxCrossEntropy,
        OpKind::SoftmaxCrossEntropyGrad,
        OpKind::Relu,
        OpKind::ReluMask,
        OpKind::Zeros,
        OpKind::Ones,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "Add",
            OpKind::Subtract => "Subtract",
            OpKind::Multiply => "Multiply",
            OpKind::Divide => "Divide",
            OpKind::MatMul => "MatMul",
            OpKind::ScaleByConstant => "ScaleByConstant",
            OpKind::AddConstant => "AddConstant",
            OpKind::ReduceSumAxis0 => "ReduceSumAxis0",
            OpKind::BroadcastTo => "BroadcastTo",
            OpKind::Softmax => "Softmax",
            OpKind::SoftmaxCrossEntropy => "SoftmaxCrossEntropy",
            OpKind::SoftmaxCrossEntropyGrad => "SoftmaxCrossEntropyGrad",
            OpKind::Relu => "Relu",
            OpKind::ReluMask => "ReluMask",
            OpKind::Zeros => "Zeros",
            OpKind::Ones => "Ones",
        }
    }

    /// Number of inputs a node of this kind must have.
    pub fn arity(&self) -> usize {
        match self {
            OpKind::Add
            | OpKind::Subtract
            | OpKind::Multiply
            | OpKind::Divide
            | OpKind::MatMul
            | OpKind::BroadcastTo
            | OpKind::SoftmaxCrossEntropy => 2,
            OpKind::SoftmaxCrossEntropyGrad => 3,
            OpKind::ScaleByConstant
            | OpKind::AddConstant
            | OpKind::ReduceSumAxis0
            | OpKind::Softmax
            | OpKind::Relu
            | OpKind::ReluMask
            | OpKind::Zeros
            | OpKind::Ones => 1,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpKind {
    type Err = DagradError;

    /// Parses an operator tag. Unknown tags are an error, never a fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DagradError::UnknownOperator(s.to_string()))
    }
}

/// Contract between one operator family and the graph engine.
///
/// Implementations are stateless; everything node-specific comes in through `node`.
pub trait Operator: Debug + Send + Sync {
    fn kind(&self) -> OpKind;

    fn arity(&self) -> usize {
        self.kind().arity()
    }

    /// Output shapes for the given input shapes.
    ///
    /// # Errors
    /// A shape-class error when the inputs violate the operator's rank or
    /// dimension requirements.
    fn infer(&self, node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError>;

    /// Output values for the given input values, allocated through `ctx`.
    fn compute(
        &self,
        node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError>;

    /// Builds one gradient node per input of `node`, given the node `upstream`
    /// holding d(output)/d(node).
    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError>;
}

/// Shared `infer` for element-wise binaries: both operands must have the same shape.
pub(crate) fn infer_same_shape(
    kind: OpKind,
    input_shapes: &[&Shape],
) -> Result<Vec<Shape>, DagradError> {
    check_arity(kind, input_shapes.len())?;
    let (a, b) = (input_shapes[0], input_shapes[1]);
    if a != b {
        return Err(DagradError::IncompatibleShapes {
            shape1: a.to_vec(),
            shape2: b.to_vec(),
            operation: kind.as_str().to_string(),
        });
    }
    Ok(vec![a.clone()])
}

/// Shared `compute` for element-wise binaries on same-shaped inputs.
pub(crate) fn apply_binary_op<F>(
    inputs: &[&Tensor],
    ctx: &OpContext,
    op: F,
) -> Result<Vec<Tensor>, DagradError>
where
    F: Fn(f32, f32) -> f32,
{
    let (a, b) = (inputs[0], inputs[1]);
    let mut out = ctx.alloc(a.shape().clone())?;
    out.data_mut()
        .iter_mut()
        .zip(a.data().iter().zip(b.data().iter()))
        .for_each(|(o, (&x, &y))| *o = op(x, y));
    Ok(vec![out])
}

/// Shared `compute` for shape-preserving unary maps.
pub(crate) fn apply_unary_op<F>(
    inputs: &[&Tensor],
    ctx: &OpContext,
    op: F,
) -> Result<Vec<Tensor>, DagradError>
where
    F: Fn(f32) -> f32,
{
    let a = inputs[0];
    let mut out = ctx.alloc(a.shape().clone())?;
    out.data_mut()
        .iter_mut()
        .zip(a.data().iter())
        .for_each(|(o, &x)| *o = op(x));
    Ok(vec![out])
}

pub(crate) fn check_arity(kind: OpKind, actual: usize) -> Result<(), DagradError> {
    if actual != kind.arity() {
        return Err(DagradError::ArityMismatch {
            operation: kind.as_str().to_string(),
            expected: kind.arity(),
            actual,
        });
    }
    Ok(())
}

pub(crate) fn check_rank(kind: OpKind, shape: &Shape, rank: usize) -> Result<(), DagradError> {
    if shape.ndim() != rank {
        return Err(DagradError::RankMismatch {
            expected: rank,
            actual: shape.ndim(),
            operation: kind.as_str().to_string(),
        });
    }
    Ok(())
}

/// Inputs of `node` as a fixed-size array (after the arity check done at construction).
pub(crate) fn node_inputs<const N: usize>(
    graph: &Graph,
    node: NodeId,
) -> Result<[NodeId; N], DagradError> {
    let n = graph.node(node)?;
    n.inputs().try_into().map_err(|_| {
        DagradError::InternalError(format!(
            "node '{}' has {} input(s), expected {}",
            n.name(),
            n.inputs().len(),
            N
        ))
    })
}
