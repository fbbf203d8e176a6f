// src/tensor/create.rs

use crate::device::StorageDevice;
use crate::error::DagradError;
use crate::shape::Shape;
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, Normal};

impl Tensor {
    /// Creates a CPU tensor filled with `value`.
    pub fn full(shape: impl Into<Shape>, value: f32) -> Self {
        let shape = shape.into();
        let numel = shape.numel();
        Tensor {
            shape,
            data: vec![value; numel],
            device: StorageDevice::CPU,
        }
    }

    pub fn zeros(shape: impl Into<Shape>) -> Self {
        Self::full(shape, 0.0)
    }

    pub fn ones(shape: impl Into<Shape>) -> Self {
        Self::full(shape, 1.0)
    }

    /// Rank-0 tensor holding one value.
    pub fn scalar(value: f32) -> Self {
        Self::full(Shape::scalar(), value)
    }

    /// Allocates a zero-filled output buffer on `device`.
    ///
    /// Kernels call this for every output they produce, so the placement tag of the
    /// running executor decides where results live.
    ///
    /// # Errors
    /// `DagradError::UnsupportedDevice` if the CPU kernels cannot address `device`.
    pub fn zeros_on(shape: impl Into<Shape>, device: StorageDevice) -> Result<Self, DagradError> {
        if !device.is_host_addressable() {
            return Err(DagradError::UnsupportedDevice {
                device,
                operation: "allocate".to_string(),
            });
        }
        let mut t = Self::zeros(shape);
        t.device = device;
        Ok(t)
    }

    /// Samples every element from a normal distribution.
    pub fn randn(shape: impl Into<Shape>, mean: f32, std_dev: f32) -> Result<Self, DagradError> {
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            DagradError::InvalidConfig(format!("randn(mean={}, std={}): {}", mean, std_dev, e))
        })?;
        let shape = shape.into();
        let mut rng = rand::thread_rng();
        let data: Vec<f32> = (0..shape.numel()).map(|_| normal.sample(&mut rng)).collect();
        Tensor::new(data, shape)
    }

    /// Samples every element uniformly from `[low, high)`.
    pub fn uniform(shape: impl Into<Shape>, low: f32, high: f32) -> Result<Self, DagradError> {
        if !(low < high) {
            return Err(DagradError::InvalidConfig(format!(
                "uniform requires low < high, got [{}, {})",
                low, high
            )));
        }
        let shape = shape.into();
        let mut rng = rand::thread_rng();
        let data: Vec<f32> = (0..shape.numel()).map(|_| rng.gen_range(low..high)).collect();
        Tensor::new(data, shape)
    }
}

/// Creates a new tensor filled with zeros, with the same shape and device as `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, DagradError> {
    Tensor::zeros_on(tensor.shape().clone(), tensor.device())
}

/// Creates a new tensor filled with ones, with the same shape and device as `tensor`.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, DagradError> {
    let mut t = zeros_like(tensor)?;
    t.fill(1.0);
    Ok(t)
}
