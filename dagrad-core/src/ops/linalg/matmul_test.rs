use crate::autograd::gradients;
use crate::executor::evaluate;
use crate::graph::Graph;
use crate::ops::{OpBuilder, OpKind};
use crate::utils::testing::{check_tensor_near, create_test_tensor, feed};
use crate::DagradError;

fn a_2x3() -> crate::tensor::Tensor {
    create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])
}

fn b_3x2() -> crate::tensor::Tensor {
    create_test_tensor(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], vec![3, 2])
}

#[test]
fn test_matmul_plain() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.matmul(a, b, false, false).unwrap();
    let inputs = feed(vec![(a, a_2x3()), (b, b_3x2())]);
    let out = evaluate(&g, &[c], &inputs).unwrap();
    check_tensor_near(&out[0], &[2, 2], &[58.0, 64.0, 139.0, 154.0], 1e-5);
}

#[test]
fn test_matmul_transposed_operands() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    // a: [2,3], so aᵀ·a is [3,3] and a·aᵀ is [2,2]
    let ata = g.matmul(a, a, true, false).unwrap();
    let aat = g.matmul(a, a, false, true).unwrap();
    // bᵀ: [2,3], aᵀ: [3,2]
    let btat = g.matmul(b, a, true, true).unwrap();
    let inputs = feed(vec![(a, a_2x3()), (b, b_3x2())]);
    let out = evaluate(&g, &[ata, aat, btat], &inputs).unwrap();
    check_tensor_near(
        &out[0],
        &[3, 3],
        &[17.0, 22.0, 27.0, 22.0, 29.0, 36.0, 27.0, 36.0, 45.0],
        1e-5,
    );
    check_tensor_near(&out[1], &[2, 2], &[14.0, 32.0, 32.0, 77.0], 1e-5);
    // (a·b)ᵀ
    check_tensor_near(&out[2], &[2, 2], &[58.0, 139.0, 64.0, 154.0], 1e-5);
}

#[test]
fn test_matmul_inner_dimension_mismatch() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.matmul(a, b, false, false).unwrap();
    let inputs = feed(vec![(a, a_2x3()), (b, a_2x3())]);
    let err = evaluate(&g, &[c], &inputs).unwrap_err();
    assert!(matches!(err, DagradError::IncompatibleShapes { .. }));
}

#[test]
fn test_matmul_requires_rank_two() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.matmul(a, b, false, false).unwrap();
    let inputs = feed(vec![
        (a, create_test_tensor(vec![1.0, 2.0, 3.0], vec![3])),
        (b, b_3x2()),
    ]);
    let err = evaluate(&g, &[c], &inputs).unwrap_err();
    assert_eq!(
        err,
        DagradError::RankMismatch { expected: 2, actual: 1, operation: "MatMul".to_string() }
    );
}

#[test]
fn test_matmul_missing_flag() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = OpBuilder::new(OpKind::MatMul)
        .inputs(&[a, b])
        .attr("trans_a", false)
        .build(&mut g)
        .unwrap();
    let inputs = feed(vec![(a, a_2x3()), (b, b_3x2())]);
    let err = evaluate(&g, &[c], &inputs).unwrap_err();
    assert!(matches!(err, DagradError::MissingAttribute { ref key, .. } if key == "trans_b"));
}

#[test]
fn test_matmul_backward_plain() {
    let mut g = Graph::new();
    let a = g.placeholder("a").unwrap();
    let b = g.placeholder("b").unwrap();
    let c = g.matmul(a, b, false, false).unwrap();
    let grads = gradients(&mut g, c, &[a, b]).unwrap();
    let inputs = feed(vec![(a, a_2x3()), (b, b_3x2())]);
    let out = evaluate(&g, &grads, &inputs).unwrap();
    // dA = 1·Bᵀ: row sums of B per column index
    check_tensor_near(&out[0], &[2, 3], &[15.0, 19.0, 23.0, 15.0, 19.0, 23.0], 1e-5);
    // dB = Aᵀ·1: column sums of A
    check_tensor_near(&out[1], &[3, 2], &[5.0, 5.0, 7.0, 7.0, 9.0, 9.0], 1e-5);
}

#[test]
fn test_matmul_gradient_shapes_match_inputs_for_all_flags() {
    for &(trans_a, trans_b) in &[(false, false), (true, false), (false, true), (true, true)] {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let b = g.placeholder("b").unwrap();
        let c = g.matmul(a, b, trans_a, trans_b).unwrap();
        let grads = gradients(&mut g, c, &[a, b]).unwrap();

        let a_shape = if trans_a { vec![3, 2] } else { vec![2, 3] };
        let b_shape = if trans_b { vec![4, 3] } else { vec![3, 4] };
        let inputs = feed(vec![
            (a, create_test_tensor(vec![0.5; 6], a_shape.clone())),
            (b, create_test_tensor(vec![0.25; 12], b_shape.clone())),
        ]);
        let out = evaluate(&g, &[c, grads[0], grads[1]], &inputs).unwrap();
        assert_eq!(out[0].shape().dims(), &[2, 4]);
        assert_eq!(out[1].shape().dims(), a_shape.as_slice());
        assert_eq!(out[2].shape().dims(), b_shape.as_slice());
        // every entry of dA is the sum of one row of op(B); every entry of dB a column sum of op(A)
        assert!(out[1].data().iter().all(|&x| (x - 1.0).abs() < 1e-6));
        assert!(out[2].data().iter().all(|&x| (x - 1.0).abs() < 1e-6));
    }
}
