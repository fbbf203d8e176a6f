use super::*;
use std::collections::HashSet;

#[test]
fn test_random_sampler_len() {
    assert_eq!(RandomSampler::new(false, None).len(10), 10);
    assert_eq!(RandomSampler::new(false, Some(5)).len(10), 5);
    assert_eq!(RandomSampler::new(true, Some(25)).len(10), 25);
}

#[test]
fn test_without_replacement_is_a_permutation_prefix() {
    let sampler = RandomSampler::new(false, Some(5));
    let indices: Vec<usize> = sampler.iter(10).collect();
    assert_eq!(indices.len(), 5);
    let unique: HashSet<usize> = indices.iter().copied().collect();
    assert_eq!(unique.len(), 5);
    assert!(indices.iter().all(|&i| i < 10));
}

#[test]
fn test_without_replacement_full_epoch() {
    let sampler = RandomSampler::new(false, None);
    let mut indices: Vec<usize> = sampler.iter(7).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..7).collect::<Vec<_>>());
}

#[test]
fn test_without_replacement_clamps_oversized_request() {
    let sampler = RandomSampler::new(false, Some(10));
    assert_eq!(sampler.len(5), 5);
    let mut indices: Vec<usize> = sampler.iter(5).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_with_replacement_draws_requested_count() {
    let sampler = RandomSampler::new(true, Some(10));
    let indices: Vec<usize> = sampler.iter(3).collect();
    assert_eq!(indices.len(), 10);
    assert!(indices.iter().all(|&i| i < 3));
}

#[test]
fn test_empty_dataset() {
    assert_eq!(RandomSampler::new(false, Some(5)).iter(0).count(), 0);
    assert_eq!(RandomSampler::new(true, Some(5)).iter(0).count(), 0);
}

#[test]
fn test_seeded_samplers_agree_epoch_by_epoch() {
    let a = RandomSampler::new(false, None).with_seed(42);
    let b = RandomSampler::new(false, None).with_seed(42);
    for _ in 0..3 {
        let ia: Vec<usize> = a.iter(20).collect();
        let ib: Vec<usize> = b.iter(20).collect();
        assert_eq!(ia, ib);
    }
}

#[test]
fn test_seeded_sampler_changes_between_epochs() {
    let sampler = RandomSampler::new(false, None).with_seed(7);
    let first: Vec<usize> = sampler.iter(50).collect();
    let second: Vec<usize> = sampler.iter(50).collect();
    // 50! orderings; two seeded epochs coinciding would mean the epoch is ignored.
    assert_ne!(first, second);
}

#[test]
fn test_clamp_warning_is_raised_once_per_sampler() {
    let sampler = RandomSampler::new(false, Some(10));
    for _ in 0..3 {
        assert_eq!(sampler.len(5), 5);
    }
    assert!(!sampler.clamp_warned.load(Ordering::Relaxed));

    assert_eq!(sampler.iter(5).count(), 5);
    assert!(sampler.clamp_warned.load(Ordering::Relaxed));
    assert_eq!(sampler.iter(5).count(), 5);

    let fitting = RandomSampler::new(false, Some(3));
    assert_eq!(fitting.iter(5).count(), 3);
    assert!(!fitting.clamp_warned.load(Ordering::Relaxed));
}
