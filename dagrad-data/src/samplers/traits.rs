// dagrad-data/src/samplers/traits.rs

use std::fmt::Debug;

/// Decides the order in which a [`DataLoader`](crate::DataLoader) visits rows.
pub trait Sampler: Debug + Send + Sync {
    /// Returns the indices of one epoch over a dataset of `dataset_len` samples.
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync>;

    /// Number of indices [`iter`](Sampler::iter) yields for `dataset_len`.
    fn len(&self, dataset_len: usize) -> usize;
}
