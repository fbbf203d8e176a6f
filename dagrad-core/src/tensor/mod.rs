// src/tensor/mod.rs

use crate::device::StorageDevice;
use crate::error::DagradError;
use crate::shape::Shape;

pub mod create;
mod debug;
mod inplace_ops;

pub use create::{ones_like, zeros_like};

/// A dense, row-major buffer of `f32` values bound to a fixed [`Shape`].
///
/// The shape is chosen at construction and never changes; the content is mutable.
/// Cloning a `Tensor` copies its buffer.
///
/// The `device` field is a placement tag. Buffers tagged with a device the CPU
/// kernels cannot address are never allocated (see [`Tensor::zeros_on`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub(crate) shape: Shape,
    pub(crate) data: Vec<f32>,
    pub(crate) device: StorageDevice,
}

impl Tensor {
    /// Creates a new CPU tensor from row-major data.
    ///
    /// # Errors
    /// Returns `DagradError::TensorCreationError` if the length of `data` does not match
    /// the number of elements described by `shape`.
    pub fn new(data: Vec<f32>, shape: impl Into<Shape>) -> Result<Self, DagradError> {
        let shape = shape.into();
        if data.len() != shape.numel() {
            return Err(DagradError::TensorCreationError {
                data_len: data.len(),
                shape: shape.to_vec(),
            });
        }
        Ok(Tensor {
            shape,
            data,
            device: StorageDevice::CPU,
        })
    }

    // --- Accessors ---

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn device(&self) -> StorageDevice {
        self.device
    }

    /// Read access to the whole buffer, row-major.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Write access to the whole buffer. The length cannot change.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone()
    }

    /// Reads one element by its multi-dimensional coordinates.
    pub fn at(&self, coords: &[usize]) -> Result<f32, DagradError> {
        let dims = self.shape.dims();
        if coords.len() != dims.len() {
            return Err(DagradError::RankMismatch {
                expected: dims.len(),
                actual: coords.len(),
                operation: "at".to_string(),
            });
        }
        let mut offset = 0;
        for (axis, (&c, &d)) in coords.iter().zip(dims.iter()).enumerate() {
            if c >= d {
                return Err(DagradError::AxisOutOfRange { axis, rank: dims.len() });
            }
            offset = offset * d + c;
        }
        Ok(self.data[offset])
    }

    /// Value of a single-element tensor (any rank).
    pub fn item(&self) -> Result<f32, DagradError> {
        if self.data.len() != 1 {
            return Err(DagradError::ShapeMismatch {
                expected: vec![1],
                actual: self.shape.to_vec(),
                operation: "item".to_string(),
            });
        }
        Ok(self.data[0])
    }
}

impl approx::AbsDiffEq for Tensor {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl approx::RelativeEq for Tensor {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
