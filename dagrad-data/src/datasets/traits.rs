// dagrad-data/src/datasets/traits.rs

use dagrad_core::DagradError;

/// Indexed access to individual samples.
pub trait Dataset {
    /// The type of a single sample.
    type Item;

    /// Returns the sample at `index`.
    ///
    /// # Errors
    /// `DagradError::IndexOutOfBounds` if `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Self::Item, DagradError>;

    /// Returns the total number of samples in the dataset.
    fn len(&self) -> usize;

    /// Returns true if the dataset contains no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
