// In-place updates of a tensor's content. None of these change the shape.

use crate::error::DagradError;
use crate::tensor::Tensor;

impl Tensor {
    /// Sets every element to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Copies `values` into the buffer, row-major.
    ///
    /// This is how externally produced data (e.g. a batch from a loader) is bound
    /// into an existing placeholder value before a run.
    pub fn fill_from_slice(&mut self, values: &[f32]) -> Result<(), DagradError> {
        if values.len() != self.data.len() {
            return Err(DagradError::TensorCreationError {
                data_len: values.len(),
                shape: self.shape.to_vec(),
            });
        }
        self.data.copy_from_slice(values);
        Ok(())
    }

    /// `self += other`, element-wise. Shapes must match exactly.
    pub fn add_(&mut self, other: &Tensor) -> Result<(), DagradError> {
        self.check_same_shape(other, "add_")?;
        self.data
            .iter_mut()
            .zip(other.data.iter())
            .for_each(|(a, &b)| *a += b);
        Ok(())
    }

    /// `self -= alpha * other`, element-wise. Shapes must match exactly.
    pub fn sub_scaled_(&mut self, other: &Tensor, alpha: f32) -> Result<(), DagradError> {
        self.check_same_shape(other, "sub_scaled_")?;
        self.data
            .iter_mut()
            .zip(other.data.iter())
            .for_each(|(a, &b)| *a -= alpha * b);
        Ok(())
    }

    fn check_same_shape(&self, other: &Tensor, operation: &str) -> Result<(), DagradError> {
        if self.shape != other.shape {
            return Err(DagradError::ShapeMismatch {
                expected: self.shape.to_vec(),
                actual: other.shape.to_vec(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}
