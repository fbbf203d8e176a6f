//! # DataLoader
//!
//! Groups the rows of a [`RowDataset`] into [`Batch`]es, in the order chosen by a
//! [`Sampler`].
//!
//! ```rust
//! use dagrad_data::{DataLoader, RowDataset, SequentialSampler};
//!
//! let dataset = RowDataset::from_flat(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2).unwrap();
//! let loader = DataLoader::new(dataset, 2, SequentialSampler::new(), false).unwrap();
//! let batches: Vec<_> = loader.collect::<Result<_, _>>().unwrap();
//! assert_eq!(batches.len(), 2);
//! assert_eq!(batches[1].rows, 1);
//! ```

use crate::batch::Batch;
use crate::datasets::{Dataset, RowDataset};
use crate::samplers::Sampler;
use dagrad_core::DagradError;
use log::{debug, warn};

/// Iterator over the batches of one epoch. [`reset`](DataLoader::reset) starts the
/// next epoch.
pub struct DataLoader<S: Sampler> {
    dataset: RowDataset,
    batch_size: usize,
    sampler: S,
    drop_last: bool,
    indices_iter: Box<dyn Iterator<Item = usize> + Send + Sync>,
}

impl<S: Sampler> DataLoader<S> {
    /// # Arguments
    /// - `batch_size`: rows per batch.
    /// - `drop_last`: skip a final batch with fewer than `batch_size` rows.
    ///
    /// # Errors
    /// `InvalidConfig` if `batch_size` is zero.
    pub fn new(
        dataset: RowDataset,
        batch_size: usize,
        sampler: S,
        drop_last: bool,
    ) -> Result<Self, DagradError> {
        if batch_size == 0 {
            return Err(DagradError::InvalidConfig(
                "DataLoader batch_size must be positive".to_string(),
            ));
        }
        if drop_last && batch_size > sampler.len(dataset.len()) {
            warn!(
                "DataLoader: batch_size {} exceeds the {} sample(s) per epoch with drop_last set, no batch will be produced",
                batch_size,
                sampler.len(dataset.len())
            );
        }
        let indices_iter = sampler.iter(dataset.len());
        Ok(DataLoader {
            dataset,
            batch_size,
            sampler,
            drop_last,
            indices_iter,
        })
    }

    pub fn dataset(&self) -> &RowDataset {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches a full epoch yields.
    pub fn num_batches(&self) -> usize {
        let samples = self.sampler.len(self.dataset.len());
        if self.drop_last {
            samples / self.batch_size
        } else {
            (samples + self.batch_size - 1) / self.batch_size
        }
    }

    /// Starts a new epoch, asking the sampler for a fresh order.
    pub fn reset(&mut self) {
        debug!("DataLoader: new epoch over {} row(s)", self.dataset.len());
        self.indices_iter = self.sampler.iter(self.dataset.len());
    }
}

impl<S: Sampler> Iterator for DataLoader<S> {
    type Item = Result<Batch, DagradError>;

    /// `Some(Err(_))` if the sampler produced an index outside the dataset.
    fn next(&mut self) -> Option<Self::Item> {
        let cols = self.dataset.cols();
        let mut data = Vec::with_capacity(self.batch_size * cols);
        let mut rows = 0;
        while rows < self.batch_size {
            let idx = match self.indices_iter.next() {
                Some(idx) => idx,
                None => break,
            };
            match self.dataset.row(idx) {
                Ok(row) => data.extend_from_slice(row),
                Err(e) => return Some(Err(e)),
            }
            rows += 1;
        }
        if rows == 0 || (self.drop_last && rows < self.batch_size) {
            return None;
        }
        Some(Ok(Batch { data, rows, cols }))
    }
}

#[cfg(test)]
#[path = "dataloader_test.rs"]
mod tests;
