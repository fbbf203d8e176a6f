use crate::device::StorageDevice;
use thiserror::Error;

/// Broad family an error belongs to.
///
/// Callers that retry (e.g. re-binding placeholders and running again) can branch on
/// this instead of matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Building the graph went wrong (unknown operator, name clash, bad attribute).
    Construction,
    /// `Infer` rejected the input shapes, or a tensor was built with the wrong length.
    Shape,
    /// Evaluation reached a value that was never supplied.
    Binding,
    /// A gradient was requested that cannot be built.
    Differentiation,
    /// The requested placement cannot be served by the kernels.
    Device,
    /// An internal invariant did not hold.
    Internal,
}

/// Custom error type for the dagrad framework.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum DagradError {
    // --- Construction ---
    #[error("Unknown operator type: {0}")]
    UnknownOperator(String),

    #[error("A node named '{name}' already exists in the graph")]
    DuplicateNode { name: String },

    #[error("Attribute '{key}' of node '{node}' is malformed: expected {expected}")]
    MalformedAttribute {
        node: String,
        key: String,
        expected: String,
    },

    #[error("Node '{node}' has no attribute '{key}'")]
    MissingAttribute { node: String, key: String },

    #[error("Operator {operation} expects {expected} input(s), got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Node id {0} does not belong to this graph")]
    InvalidNodeId(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // --- Shape ---
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Incompatible shapes for operation {operation}: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
        operation: String,
    },

    #[error("Rank mismatch in {operation}: expected rank {expected}, got {actual}")]
    RankMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Axis {axis} is out of range for rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },

    #[error("Index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    // --- Binding ---
    #[error("Placeholder '{name}' has no bound value")]
    UnboundPlaceholder { name: String },

    #[error("Input '{input}' of node '{node}' has no computed value")]
    MissingInput { node: String, input: String },

    // --- Differentiation ---
    #[error("Node '{name}' is not connected to the differentiated output")]
    Disconnected { name: String },

    #[error("Operator {operation} has no gradient rule")]
    NotDifferentiable { operation: String },

    // --- Device ---
    #[error("Device {device:?} is not supported by operation '{operation}'")]
    UnsupportedDevice {
        device: StorageDevice,
        operation: String,
    },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DagradError {
    /// Returns the family this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            DagradError::UnknownOperator(_)
            | DagradError::DuplicateNode { .. }
            | DagradError::MalformedAttribute { .. }
            | DagradError::MissingAttribute { .. }
            | DagradError::ArityMismatch { .. }
            | DagradError::InvalidNodeId(_)
            | DagradError::InvalidConfig(_) => ErrorClass::Construction,
            DagradError::ShapeMismatch { .. }
            | DagradError::IncompatibleShapes { .. }
            | DagradError::RankMismatch { .. }
            | DagradError::TensorCreationError { .. }
            | DagradError::AxisOutOfRange { .. }
            | DagradError::IndexOutOfBounds { .. } => ErrorClass::Shape,
            DagradError::UnboundPlaceholder { .. } | DagradError::MissingInput { .. } => {
                ErrorClass::Binding
            }
            DagradError::Disconnected { .. } | DagradError::NotDifferentiable { .. } => {
                ErrorClass::Differentiation
            }
            DagradError::UnsupportedDevice { .. } => ErrorClass::Device,
            DagradError::InternalError(_) => ErrorClass::Internal,
        }
    }
}
