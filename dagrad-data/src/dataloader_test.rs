use super::*;
use crate::samplers::{RandomSampler, SequentialSampler};

fn dataset(rows: usize) -> RowDataset {
    RowDataset::from_flat((0..rows * 2).map(|v| v as f32).collect(), 2).unwrap()
}

/// Always yields one index past the end.
#[derive(Debug)]
struct OutOfRangeSampler;

impl Sampler for OutOfRangeSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        Box::new(std::iter::once(dataset_len))
    }

    fn len(&self, _dataset_len: usize) -> usize {
        1
    }
}

#[test]
fn test_sequential_batches() {
    let loader = DataLoader::new(dataset(5), 2, SequentialSampler::new(), false).unwrap();
    assert_eq!(loader.num_batches(), 3);
    let batches: Vec<Batch> = loader.collect::<Result<_, _>>().unwrap();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0], Batch { data: vec![0.0, 1.0, 2.0, 3.0], rows: 2, cols: 2 });
    assert_eq!(batches[2], Batch { data: vec![8.0, 9.0], rows: 1, cols: 2 });
}

#[test]
fn test_drop_last() {
    let loader = DataLoader::new(dataset(5), 2, SequentialSampler::new(), true).unwrap();
    assert_eq!(loader.num_batches(), 2);
    let batches: Vec<Batch> = loader.collect::<Result<_, _>>().unwrap();
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|b| b.rows == 2));
}

#[test]
fn test_drop_last_with_oversized_batch_yields_nothing() {
    let mut loader = DataLoader::new(dataset(3), 4, SequentialSampler::new(), true).unwrap();
    assert!(loader.next().is_none());
}

#[test]
fn test_zero_batch_size_rejected() {
    assert!(matches!(
        DataLoader::new(dataset(3), 0, SequentialSampler::new(), false),
        Err(DagradError::InvalidConfig(_))
    ));
}

#[test]
fn test_empty_dataset() {
    let mut loader = DataLoader::new(dataset(0), 2, SequentialSampler::new(), false).unwrap();
    assert!(loader.next().is_none());
}

#[test]
fn test_reset_starts_a_new_epoch() {
    let mut loader = DataLoader::new(dataset(4), 2, SequentialSampler::new(), false).unwrap();
    assert_eq!(loader.by_ref().count(), 2);
    assert!(loader.next().is_none());
    loader.reset();
    let first = loader.next().unwrap().unwrap();
    assert_eq!(first.data, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_random_epoch_covers_every_row_once() {
    let sampler = RandomSampler::new(false, None).with_seed(3);
    let loader = DataLoader::new(dataset(6), 4, sampler, false).unwrap();
    let mut firsts: Vec<f32> = loader
        .map(|b| b.unwrap())
        .flat_map(|b| b.data.chunks(2).map(|r| r[0]).collect::<Vec<_>>())
        .collect();
    firsts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(firsts, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
}

#[test]
fn test_out_of_range_index_is_an_error() {
    let mut loader = DataLoader::new(dataset(2), 2, OutOfRangeSampler, false).unwrap();
    assert_eq!(
        loader.next(),
        Some(Err(DagradError::IndexOutOfBounds { index: 2, len: 2 }))
    );
}
