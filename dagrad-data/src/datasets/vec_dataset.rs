use super::traits::Dataset;
use dagrad_core::DagradError;

/// A dataset that wraps a `Vec` of items; each item is one sample.
#[derive(Debug, Clone)]
pub struct VecDataset<T: Clone> {
    data: Vec<T>,
}

impl<T: Clone> VecDataset<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Clone> Dataset for VecDataset<T> {
    type Item = T;

    /// Clones the item at `index`.
    fn get(&self, index: usize) -> Result<Self::Item, DagradError> {
        self.data
            .get(index)
            .cloned()
            .ok_or(DagradError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            })
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
#[path = "vec_dataset_test.rs"]
mod tests;
