use crate::error::DagradError;
use crate::graph::{topological_order, Graph, NodeId};
use log::{debug, trace};
use std::collections::HashMap;

/// Builds gradient nodes of `output` with respect to each node in `wrt`.
///
/// Returns one node id per entry of `wrt`, in the same order; a node listed twice
/// gets the same gradient node twice. The walk:
///
/// 1. orders every node reachable from `output`,
/// 2. seeds `output` with `Ones(output)`,
/// 3. visits the order in reverse, summing each node's contributions left to right
///    with `Add` nodes and asking its operator for the local gradients of its inputs.
///
/// Only nodes lying on a path from some `wrt` node to `output` are differentiated.
///
/// # Errors
/// - `Disconnected` if a requested node receives no contribution from `output`.
/// - `NotDifferentiable` if the walk has to pass through an operator without a
///   gradient.
/// - `InvalidNodeId` for ids not in `graph`.
pub fn gradients(
    graph: &mut Graph,
    output: NodeId,
    wrt: &[NodeId],
) -> Result<Vec<NodeId>, DagradError> {
    for &id in wrt {
        graph.node(id)?;
    }
    let order = topological_order(graph, &[output])?;

    // A node matters if it is requested or one of its inputs matters.
    let mut on_path = vec![false; graph.len()];
    for &id in wrt {
        on_path[id.index()] = true;
    }
    for &id in &order {
        if graph.node(id)?.inputs().iter().any(|input| on_path[input.index()]) {
            on_path[id.index()] = true;
        }
    }

    debug!(
        "autograd: differentiating '{}' with respect to {} node(s), {} node(s) in scope",
        graph.name(output)?,
        wrt.len(),
        order.iter().filter(|id| on_path[id.index()]).count()
    );

    let mut pending: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    let mut grads: HashMap<NodeId, NodeId> = HashMap::new();
    if on_path[output.index()] {
        let seed = graph.ones_like(output)?;
        pending.insert(output, vec![seed]);
    }

    for &id in order.iter().rev() {
        let contributions = match pending.remove(&id) {
            Some(c) => c,
            None => continue,
        };
        let total = sum_contributions(graph, contributions)?;
        grads.insert(id, total);

        let node = graph.node(id)?;
        let op = match node.op() {
            Some(op) => op,
            None => continue,
        };
        let inputs = node.inputs().to_vec();
        if !inputs.iter().any(|input| on_path[input.index()]) {
            continue;
        }

        let input_grads = op.gradient(graph, id, total)?;
        if input_grads.len() != inputs.len() {
            return Err(DagradError::InternalError(format!(
                "{} gradient returned {} node(s) for {} input(s)",
                op.kind(),
                input_grads.len(),
                inputs.len()
            )));
        }
        for (input, grad) in inputs.into_iter().zip(input_grads) {
            if on_path[input.index()] {
                trace!("autograd: {} -> {} contributes {}", id, input, grad);
                pending.entry(input).or_default().push(grad);
            }
        }
    }

    wrt.iter()
        .map(|id| {
            grads.get(id).copied().ok_or_else(|| DagradError::Disconnected {
                name: graph.name(*id).unwrap_or_default().to_string(),
            })
        })
        .collect()
}

fn sum_contributions(graph: &mut Graph, contributions: Vec<NodeId>) -> Result<NodeId, DagradError> {
    let mut iter = contributions.into_iter();
    let first = iter.next().ok_or_else(|| {
        DagradError::InternalError("gradient node with an empty contribution list".to_string())
    })?;
    iter.try_fold(first, |acc, next| graph.add(acc, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::evaluate;
    use crate::ops::OpKind;
    use crate::utils::testing::{check_tensor_near, create_test_tensor, feed};

    #[test]
    fn test_output_with_respect_to_itself_is_seed() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let b = g.placeholder("b").unwrap();
        let c = g.mul(a, b).unwrap();
        let grads = gradients(&mut g, c, &[c]).unwrap();
        let seed = g.node(grads[0]).unwrap();
        assert_eq!(seed.kind(), Some(OpKind::Ones));
        assert_eq!(seed.inputs(), &[c]);
    }

    #[test]
    fn test_disconnected_node_is_an_error() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let b = g.placeholder("b").unwrap();
        let unrelated = g.placeholder("unrelated").unwrap();
        let c = g.add(a, b).unwrap();
        let err = gradients(&mut g, c, &[a, unrelated]).unwrap_err();
        assert_eq!(err, DagradError::Disconnected { name: "unrelated".to_string() });
    }

    #[test]
    fn test_repeated_request_returns_same_node() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let c = g.mul(a, a).unwrap();
        let grads = gradients(&mut g, c, &[a, a]).unwrap();
        assert_eq!(grads[0], grads[1]);
    }

    #[test]
    fn test_fan_out_contributions_are_summed() {
        // y = a*b + a  =>  dy/da = b + 1
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let b = g.placeholder("b").unwrap();
        let ab = g.mul(a, b).unwrap();
        let y = g.add(ab, a).unwrap();
        let grads = gradients(&mut g, y, &[a]).unwrap();
        assert_eq!(g.node(grads[0]).unwrap().kind(), Some(OpKind::Add));

        let inputs = feed(vec![
            (a, create_test_tensor(vec![2.0, 3.0], vec![2])),
            (b, create_test_tensor(vec![5.0, -7.0], vec![2])),
        ]);
        let out = evaluate(&g, &grads, &inputs).unwrap();
        check_tensor_near(&out[0], &[2], &[6.0, -6.0], 1e-6);
    }

    #[test]
    fn test_unrelated_non_differentiable_branch_is_skipped() {
        // softmax(b) feeds the output but does not depend on `a`
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let b = g.placeholder("b").unwrap();
        let s = g.softmax(b).unwrap();
        let y = g.mul(a, s).unwrap();
        assert!(gradients(&mut g, y, &[a]).is_ok());
        assert!(matches!(
            gradients(&mut g, y, &[b]),
            Err(DagradError::NotDifferentiable { .. })
        ));
    }

    #[test]
    fn test_second_call_reuses_gradient_nodes() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let b = g.placeholder("b").unwrap();
        let c = g.mul(a, b).unwrap();
        let first = gradients(&mut g, c, &[a, b]).unwrap();
        let len = g.len();
        let second = gradients(&mut g, c, &[a, b]).unwrap();
        assert_eq!(first, second);
        assert_eq!(g.len(), len);
    }

    #[test]
    fn test_invalid_wrt_id() {
        let mut g = Graph::new();
        let a = g.placeholder("a").unwrap();
        let bogus = NodeId(42);
        assert_eq!(gradients(&mut g, a, &[bogus]), Err(DagradError::InvalidNodeId(42)));
    }
}
