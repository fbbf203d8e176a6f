use crate::executor::FeedDict;
use crate::graph::NodeId;
use crate::tensor::Tensor;

/// Checks that `actual` has `expected_shape` and that every element is within
/// `tolerance` of `expected_data`. Panics otherwise.
pub fn check_tensor_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f32],
    tolerance: f32,
) {
    assert_eq!(actual.shape().dims(), expected_shape, "Shape mismatch");
    assert_eq!(actual.numel(), expected_data.len(), "Data length mismatch");

    for (i, (a, e)) in actual.data().iter().zip(expected_data.iter()).enumerate() {
        let diff = (*a - *e).abs();
        if diff > tolerance || diff.is_nan() {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Helper to create a simple f32 tensor for testing purposes.
pub(crate) fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Failed to create test tensor")
}

/// Builds a feed dict from `(node, value)` pairs.
pub(crate) fn feed(bindings: Vec<(NodeId, Tensor)>) -> FeedDict {
    bindings.into_iter().collect()
}
