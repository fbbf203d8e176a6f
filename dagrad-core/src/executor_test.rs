use super::*;
use crate::utils::testing::{check_tensor_near, create_test_tensor, feed};

fn add_graph() -> (Graph, NodeId, NodeId, NodeId) {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.add(a, b).unwrap();
    (g, a, b, c)
}

#[test]
fn test_run_stores_computed_values() {
    let (g, a, b, c) = add_graph();
    let mut inputs = feed(vec![
        (a, Tensor::ones(vec![2, 2])),
        (b, Tensor::ones(vec![2, 2])),
    ]);
    let mut evaluator = Evaluator::new(StorageDevice::CPU);
    let out = evaluator.run(&g, &[c], &mut inputs).unwrap();
    check_tensor_near(&out[0], &[2, 2], &[2.0; 4], 0.0);
    assert!(inputs.contains_key(&c));
}

#[test]
fn test_present_values_are_not_recomputed() {
    let (g, a, b, c) = add_graph();
    let mut inputs = feed(vec![(c, create_test_tensor(vec![42.0], vec![1]))]);
    let mut evaluator = Evaluator::new(StorageDevice::CPU);
    // a and b are unbound, but c is already known.
    let out = evaluator.run(&g, &[c], &mut inputs).unwrap();
    assert_eq!(out[0].data(), &[42.0]);
    assert!(!inputs.contains_key(&a) && !inputs.contains_key(&b));
}

#[test]
fn test_unbound_placeholder_reported_by_name() {
    let (g, a, _b, c) = add_graph();
    let mut inputs = feed(vec![(a, Tensor::ones(vec![2]))]);
    let err = Evaluator::new(StorageDevice::CPU)
        .run(&g, &[c], &mut inputs)
        .unwrap_err();
    assert_eq!(err, DagradError::UnboundPlaceholder { name: "b".to_string() });
    assert_eq!(err.class(), crate::error::ErrorClass::Binding);
}

#[test]
fn test_failed_run_leaves_feed_unchanged() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let doubled = g.scale(a, 2.0).unwrap();
    let bad = g.add(doubled, b).unwrap();
    let mut inputs = feed(vec![
        (a, Tensor::ones(vec![3])),
        (b, Tensor::ones(vec![4])),
    ]);
    let before = inputs.clone();
    let err = Evaluator::new(StorageDevice::CPU)
        .run(&g, &[bad], &mut inputs)
        .unwrap_err();
    assert!(matches!(err, DagradError::IncompatibleShapes { .. }));
    assert_eq!(inputs, before);
}

#[test]
fn test_repeated_runs_are_bit_identical() {
    let mut g = Graph::new();
    let x = g.placeholder("x").unwrap();
    let w = g.placeholder("w").unwrap();
    let y = g.matmul(x, w, false, true).unwrap();
    let s = g.softmax(y).unwrap();
    let mut inputs = feed(vec![
        (x, Tensor::randn(vec![4, 3], 0.0, 1.0).unwrap()),
        (w, Tensor::randn(vec![5, 3], 0.0, 1.0).unwrap()),
    ]);
    let mut executor = Executor::new(StorageDevice::CPU);
    let first = executor.run(&g, &[s], &mut inputs).unwrap();
    let second = executor.run(&g, &[s], &mut inputs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_executor_run_keeps_only_bindings() {
    let (g, a, b, c) = add_graph();
    let mut inputs = feed(vec![(a, Tensor::ones(vec![2])), (b, Tensor::ones(vec![2]))]);
    let mut executor = Executor::new(StorageDevice::CPU);
    executor.run(&g, &[c], &mut inputs).unwrap();
    assert_eq!(inputs.len(), 2);

    // re-binding a leaf is picked up on the next run
    inputs.insert(a, create_test_tensor(vec![5.0, 6.0], vec![2]));
    let out = executor.run(&g, &[c], &mut inputs).unwrap();
    check_tensor_near(&out[0], &[2], &[6.0, 7.0], 0.0);
}

#[test]
fn test_gpu_executor_is_rejected() {
    let (g, a, b, c) = add_graph();
    let mut inputs = feed(vec![(a, Tensor::ones(vec![2])), (b, Tensor::ones(vec![2]))]);
    let err = Executor::new(StorageDevice::GPU)
        .run(&g, &[c], &mut inputs)
        .unwrap_err();
    assert!(matches!(err, DagradError::UnsupportedDevice { device: StorageDevice::GPU, .. }));
}

#[test]
fn test_run_with_gradients() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.mul(a, b).unwrap();
    let mut executor = Executor::with_gradients(&mut g, StorageDevice::CPU, c, &[a, b]).unwrap();
    assert_eq!(executor.loss(), Some(c));

    let mut inputs = feed(vec![
        (a, create_test_tensor(vec![2.0, 3.0], vec![2])),
        (b, create_test_tensor(vec![4.0, 5.0], vec![2])),
    ]);
    let (values, grads) = executor.run_with_gradients(&g, &[c], &[b, a], &mut inputs).unwrap();
    check_tensor_near(&values[0], &[2], &[8.0, 15.0], 1e-6);
    check_tensor_near(&grads[0], &[2], &[2.0, 3.0], 1e-6);
    check_tensor_near(&grads[1], &[2], &[4.0, 5.0], 1e-6);
    assert_eq!(inputs.len(), 2);
}

#[test]
fn test_run_with_gradients_unknown_target() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.mul(a, b).unwrap();
    let mut executor = Executor::with_gradients(&mut g, StorageDevice::CPU, c, &[a]).unwrap();
    let mut inputs = feed(vec![(a, Tensor::ones(vec![1])), (b, Tensor::ones(vec![1]))]);
    let err = executor.run_with_gradients(&g, &[c], &[b], &mut inputs).unwrap_err();
    assert_eq!(err, DagradError::Disconnected { name: "b".to_string() });
}
