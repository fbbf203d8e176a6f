// dagrad-data/src/samplers/random_sampler.rs

use super::traits::Sampler;
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Visits indices in random order.
///
/// Without replacement every index appears at most once per epoch; with replacement
/// indices are drawn independently. A seeded sampler is reproducible: epoch `k` of two
/// samplers built with the same seed yields the same indices.
#[derive(Debug)]
pub struct RandomSampler {
    replacement: bool,
    num_samples: Option<usize>,
    seed: Option<u64>,
    epoch: AtomicU64,
    clamp_warned: AtomicBool,
}

impl RandomSampler {
    /// # Arguments
    ///
    /// * `replacement`: if `true`, an index can be drawn several times per epoch.
    /// * `num_samples`: indices per epoch; defaults to the dataset length.
    pub fn new(replacement: bool, num_samples: Option<usize>) -> Self {
        RandomSampler {
            replacement,
            num_samples,
            seed: None,
            epoch: AtomicU64::new(0),
            clamp_warned: AtomicBool::new(false),
        }
    }

    /// Makes the sequence of epochs deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(epoch)),
            None => StdRng::from_entropy(),
        }
    }
}

impl Clone for RandomSampler {
    fn clone(&self) -> Self {
        RandomSampler {
            replacement: self.replacement,
            num_samples: self.num_samples,
            seed: self.seed,
            epoch: AtomicU64::new(self.epoch.load(Ordering::Relaxed)),
            clamp_warned: AtomicBool::new(self.clamp_warned.load(Ordering::Relaxed)),
        }
    }
}

impl Sampler for RandomSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        if dataset_len == 0 {
            return Box::new(std::iter::empty());
        }
        let mut rng = self.rng();
        let num_samples = self.len(dataset_len);
        if let Some(requested) = self.num_samples {
            if requested > num_samples && !self.clamp_warned.swap(true, Ordering::Relaxed) {
                warn!(
                    "RandomSampler: num_samples ({}) > dataset_len ({}) without replacement, clamping",
                    requested, dataset_len
                );
            }
        }

        if self.replacement {
            let indices: Vec<usize> = (0..num_samples)
                .map(|_| rng.gen_range(0..dataset_len))
                .collect();
            Box::new(indices.into_iter())
        } else {
            let mut indices: Vec<usize> = (0..dataset_len).collect();
            indices.shuffle(&mut rng);
            indices.truncate(num_samples);
            Box::new(indices.into_iter())
        }
    }

    /// Without replacement this never exceeds `dataset_len`.
    fn len(&self, dataset_len: usize) -> usize {
        let requested = self.num_samples.unwrap_or(dataset_len);
        if self.replacement {
            requested
        } else {
            requested.min(dataset_len)
        }
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;
