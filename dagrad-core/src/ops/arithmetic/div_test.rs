use crate::autograd::gradients;
use crate::executor::evaluate;
use crate::graph::Graph;
use crate::utils::testing::{check_tensor_near, create_test_tensor, feed};

#[test]
fn test_div_ok() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.div(a, b).unwrap();
    let inputs = feed(vec![
        (a, create_test_tensor(vec![6.0, 8.0, 9.0], vec![3])),
        (b, create_test_tensor(vec![2.0, 4.0, 3.0], vec![3])),
    ]);
    let out = evaluate(&g, &[c], &inputs).unwrap();
    check_tensor_near(&out[0], &[3], &[3.0, 2.0, 3.0], 1e-6);
}

#[test]
fn test_div_by_zero_follows_ieee() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.div(a, b).unwrap();
    let inputs = feed(vec![
        (a, create_test_tensor(vec![1.0, 0.0], vec![2])),
        (b, create_test_tensor(vec![0.0, 0.0], vec![2])),
    ]);
    let out = evaluate(&g, &[c], &inputs).unwrap();
    assert!(out[0].data()[0].is_infinite());
    assert!(out[0].data()[1].is_nan());
}

#[test]
fn test_div_backward() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.div(a, b).unwrap();
    let grads = gradients(&mut g, c, &[a, b]).unwrap();
    let inputs = feed(vec![
        (a, create_test_tensor(vec![3.0, -1.0], vec![2])),
        (b, create_test_tensor(vec![2.0, 4.0], vec![2])),
    ]);
    let out = evaluate(&g, &grads, &inputs).unwrap();
    // d/da = 1/b, d/db = -a/b^2
    check_tensor_near(&out[0], &[2], &[0.5, 0.25], 1e-6);
    check_tensor_near(&out[1], &[2], &[-0.75, 0.0625], 1e-6);
}
