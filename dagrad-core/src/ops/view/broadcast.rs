use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId};
use crate::ops::{check_arity, node_inputs, OpContext, OpKind, Operator};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// `BroadcastTo(a, target)`: replicates `a` along a new leading axis so the result
/// has `target`'s shape. Requires `a.shape == target.shape[1..]`; only the target's
/// shape is read, never its values.
///
/// Gradients: `ReduceSumAxis0(grad)` for `a` and zeros for `target`.
#[derive(Debug)]
pub struct BroadcastToOp;

impl Operator for BroadcastToOp {
    fn kind(&self) -> OpKind {
        OpKind::BroadcastTo
    }

    fn infer(&self, _node: &Node, input_shapes: &[&Shape]) -> Result<Vec<Shape>, DagradError> {
        check_arity(OpKind::BroadcastTo, input_shapes.len())?;
        let (source, target) = (input_shapes[0], input_shapes[1]);
        if target.ndim() == 0 || target.dims()[1..] != *source.dims() {
            return Err(DagradError::IncompatibleShapes {
                shape1: source.to_vec(),
                shape2: target.to_vec(),
                operation: "BroadcastTo (source must equal target without its leading axis)"
                    .to_string(),
            });
        }
        Ok(vec![target.clone()])
    }

    fn compute(
        &self,
        _node: &Node,
        inputs: &[&Tensor],
        ctx: &OpContext,
    ) -> Result<Vec<Tensor>, DagradError> {
        let (source, target) = (inputs[0], inputs[1]);
        let mut out = ctx.alloc(target.shape().clone())?;
        let row = source.data();
        if !row.is_empty() {
            for chunk in out.data_mut().chunks_mut(row.len()) {
                chunk.copy_from_slice(row);
            }
        }
        Ok(vec![out])
    }

    fn gradient(
        &self,
        graph: &mut Graph,
        node: NodeId,
        upstream: NodeId,
    ) -> Result<Vec<NodeId>, DagradError> {
        let [_, target] = node_inputs::<2>(graph, node)?;
        let grad_source = graph.reduce_sum_axis0(upstream)?;
        let grad_target = graph.zeros_like(target)?;
        Ok(vec![grad_source, grad_target])
    }
}
