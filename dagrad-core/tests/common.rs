use dagrad_core::{FeedDict, NodeId, Tensor};

/// Routes `log` output through the test harness. Safe to call from every test.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

#[allow(dead_code)]
pub fn feed(bindings: Vec<(NodeId, Tensor)>) -> FeedDict {
    bindings.into_iter().collect()
}

/// Deterministic, non-degenerate values in roughly [-1, 1].
#[allow(dead_code)]
pub fn ramp(shape: Vec<usize>, offset: f32) -> Tensor {
    let n: usize = shape.iter().product();
    let data = (0..n)
        .map(|i| ((i as f32 + offset) * 0.7).sin())
        .collect();
    create_test_tensor(data, shape)
}

/// One-hot rows of width `classes` for the given labels.
#[allow(dead_code)]
pub fn one_hot(labels: &[usize], classes: usize) -> Tensor {
    let mut data = vec![0.0; labels.len() * classes];
    for (row, &label) in labels.iter().enumerate() {
        data[row * classes + label] = 1.0;
    }
    create_test_tensor(data, vec![labels.len(), classes])
}
