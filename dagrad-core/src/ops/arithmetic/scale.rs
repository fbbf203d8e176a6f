// dagrad-core/src/ops/arithmetic/scale.rs

use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::builder::CONST_VAL;
use crate::ops::{apply_unary_op, check_arity, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// `a * k` for the node's `const_val` attribute `k`. Gradient: `grad * k`.
#[derive(Debug)]
pub struct ScaleByConstantOp;

impl Operator for ScaleByConstantOp {
    fn kind(&self) -> OpKind {
        OpKind::ScaleByConstant
    }

    fn infer(&self, node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::ScaleByConstant, input_shapes.len())?;
        node.attr_float(CONST_VAL)?;
        Ok(vec![input_shapes[0].clone()])
    }

    fn compute(
        &self,
        node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let k = node.attr_float(CONST_VAL)?;
        apply_unary_op(inputs, ctx, |x| x * k)
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let k = graph.node(node)?.attr_float(CONST_VAL)?;
        Ok(vec![graph.scale(upstream, k)?])
    }
}

/// `a + k` for the node's `const_val` attribute `k`. Gradient: `grad`.
#[derive(Debug)]
pub struct AddConstantOp;

impl Operator for AddConstantOp {
    fn kind(&self) -> OpKind {
        OpKind::AddConstant
    }

    fn infer(&self, node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::AddConstant, input_shapes.len())?;
        node.attr_float(CONST_VAL)?;
        Ok(vec![input_shapes[0].clone()])
    }

    fn compute(
        &self,
        node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let k = node.attr_float(CONST_VAL)?;
        apply_unary_op(inputs, ctx, |x| x + k)
    }

    fn gradient(
        &self,
        _graph: &mut Graph,
        _node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        Ok(vec![upstream])
    }
}

#[cfg(test)]
mod tests {
    use crate::executor::evaluate;
    use crate::graph::Graph;
    use crate::ops::{OpBuilder, OpKind};
    use crate::tensor::Tensor;
    use crate::utils::testing::{check_tensor_near, feed};
    use crate::DagradError;

    #[test]
    fn test_scale_and_shift() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let scaled = g.scale(a, 2.5).unwrap();
        let shifted = g.sub_scalar(a, 1.0).unwrap();
        let divided = g.div_scalar(a, 4.0).unwrap();
        let inputs = feed(vec![(a, Tensor::new(vec![1.0, -2.0], vec![2]).unwrap())]);

        let out = evaluate(&g, &[scaled, shifted, divided], &inputs).unwrap();
        check_tensor_near(&out[0], &[2], &[2.5, -5.0], 1e-6);
        check_tensor_near(&out[1], &[2], &[0.0, -3.0], 1e-6);
        check_tensor_near(&out[2], &[2], &[0.25, -0.5], 1e-6);
    }

    #[test]
    fn test_scale_gradient_uses_constant() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let y = g.scale(a, 3.0).unwrap();
        let grads = crate::autograd::gradients(&mut g, y, &[a]).unwrap();
        let inputs = feed(vec![(a, Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap())]);
        let out = evaluate(&g, &grads, &inputs).unwrap();
        check_tensor_near(&out[0], &[3], &[3.0, 3.0, 3.0], 1e-6);
    }

    #[test]
    fn test_div_by_zero_constant_rejected() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        assert!(matches!(g.div_scalar(a, 0.0), Err(DagradError::MalformedAttribute { .. })));
        assert!(matches!(g.scale(a, f32::NAN), Err(DagradError::MalformedAttribute { .. })));
    }

    #[test]
    fn test_wrong_attribute_type_is_reported() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let bad = OpBuilder::new(OpKind::ScaleByConstant)
            .input(a)
            .attr("const_val", true)
            .build(&mut g)
            .unwrap();
        let inputs = feed(vec![(a, Tensor::ones(vec![2]))]);
        let err = evaluate(&g, &[bad], &inputs).unwrap_err();
        assert!(matches!(err, DagradError::MalformedAttribute { ref key, .. } if key == "const_val"));
    }
}
