use crate::error::DagradError;
use crate::graph::{Graph, NodeId};
use log::debug;

/// Orders every node reachable from `outputs` so that each node comes after all of
/// its inputs.
///
/// Depth-first post-order, inputs visited left to right, outputs processed in the
/// order given. Each reachable node appears exactly once. The walk uses an explicit
/// stack so deep chains do not exhaust the call stack.
pub fn topological_order(graph: &Graph, outputs: &[NodeId]) -> Result<Vec<NodeId>, DagradError> {
    let mut visited = vec![false; graph.len()];
    let mut order = Vec::new();
    // (node, index of the next input to visit)
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for &output in outputs {
        graph.node(output)?;
        if visited[output.0] {
            continue;
        }
        visited[output.0] = true;
        stack.push((output, 0));

        while let Some(top) = stack.last_mut() {
            let id = top.0;
            let inputs = graph.node(id)?.inputs();
            if top.1 < inputs.len() {
                let child = inputs[top.1];
                top.1 += 1;
                if !visited[child.0] {
                    visited[child.0] = true;
                    stack.push((child, 0));
                }
            } else {
                stack.pop();
                order.push(id);
            }
        }
    }
    Ok(order)
}

/// Memoized topological order for a requested output list.
///
/// The order is recomputed only when it is stale: on first use, after
/// [`invalidate`](TopoCache::invalidate), or when the requested outputs differ from
/// the previous request.
#[derive(Debug, Clone)]
pub struct TopoCache {
    requested: Vec<NodeId>,
    order: Vec<NodeId>,
    stale: bool,
}

impl Default for TopoCache {
    fn default() -> Self {
        TopoCache {
            requested: Vec::new(),
            order: Vec::new(),
            stale: true,
        }
    }
}

impl TopoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn order_for(&mut self, graph: &Graph, outputs: &[NodeId]) -> Result<&[NodeId], DagradError> {
        if self.requested.as_slice() != outputs {
            self.stale = true;
        }
        if self.stale {
            self.order = topological_order(graph, outputs)?;
            self.requested = outputs.to_vec();
            self.stale = false;
            debug!(
                "topo: computed order of {} node(s) for {} output(s)",
                self.order.len(),
                outputs.len()
            );
        } else {
            debug!("topo: reusing cached order of {} node(s)", self.order.len());
        }
        Ok(&self.order)
    }
}
