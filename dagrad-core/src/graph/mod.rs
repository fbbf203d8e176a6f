//! # Computation graph arena
//!
//! A [`Graph`] owns every [`Node`] it contains in a flat arena; callers hold
//! [`NodeId`] handles. Nodes are never mutated or removed once inserted, so a node's
//! inputs always have smaller ids than the node itself and the graph is acyclic by
//! construction.
//!
//! Node identity is the node's name. Placeholders are named by the caller; operator
//! nodes get a name derived from the operator tag, the attribute bag and the input
//! ids, so building the same operation twice yields the same node.

pub mod node;
pub mod topo;

pub use node::{AttrValue, Attrs, Node, NodeId};
pub use topo::{topological_order, TopoCache};

use crate::error::DagradError;
use crate::ops::OpKind;
use log::trace;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a leaf whose value is bound at evaluation time.
    ///
    /// # Errors
    /// `DuplicateNode` if any node already uses `name`, `InvalidConfig` if `name` is empty.
    pub fn placeholder(&mut self, name: &str) -> Result<NodeId, DagradError> {
        if name.is_empty() {
            return Err(DagradError::InvalidConfig(
                "placeholder name must not be empty".to_string(),
            ));
        }
        if self.by_name.contains_key(name) {
            return Err(DagradError::DuplicateNode { name: name.to_string() });
        }
        Ok(self.push(Node {
            id: NodeId(self.nodes.len()),
            name: name.to_string(),
            inputs: Vec::new(),
            kind: None,
            attrs: Attrs::new(),
        }))
    }

    /// Inserts (or finds) the node applying `kind` to `inputs` with `attrs`.
    ///
    /// Checks that every input exists and that the operator's arity is respected.
    pub(crate) fn insert_op_node(
        &mut self,
        kind: OpKind,
        inputs: Vec<NodeId>,
        attrs: Attrs,
    ) -> Result<NodeId, DagradError> {
        if inputs.len() != kind.arity() {
            return Err(DagradError::ArityMismatch {
                operation: kind.as_str().to_string(),
                expected: kind.arity(),
                actual: inputs.len(),
            });
        }
        for input in &inputs {
            self.node(*input)?;
        }

        let name = derive_name(kind, &inputs, &attrs);
        if let Some(&existing) = self.by_name.get(&name) {
            if self.nodes[existing.0].is_placeholder() {
                return Err(DagradError::DuplicateNode { name });
            }
            return Ok(existing);
        }

        Ok(self.push(Node {
            id: NodeId(self.nodes.len()),
            name,
            inputs,
            kind: Some(kind),
            attrs,
        }))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = node.id;
        trace!("graph: new node {} '{}'", id, node.name);
        self.by_name.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, DagradError> {
        self.nodes.get(id.0).ok_or(DagradError::InvalidNodeId(id.0))
    }

    pub fn name(&self, id: NodeId) -> Result<&str, DagradError> {
        Ok(self.node(id)?.name())
    }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Renders the expression rooted at `id`, spelling placeholders by name.
    ///
    /// Shared subexpressions are printed once per use, so keep this to logs and
    /// error messages on small graphs.
    pub fn expr(&self, id: NodeId) -> Result<String, DagradError> {
        let node = self.node(id)?;
        let kind = match node.kind {
            None => return Ok(node.name.clone()),
            Some(kind) => kind,
        };
        let args = node
            .inputs
            .iter()
            .map(|&input| self.expr(input))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}{}({})", kind, format_attrs(&node.attrs), args.join(", ")))
    }
}

fn derive_name(kind: OpKind, inputs: &[NodeId], attrs: &Attrs) -> String {
    let ids: Vec<String> = inputs.iter().map(|id| id.to_string()).collect();
    format!("{}{}({})", kind, format_attrs(attrs), ids.join(","))
}

fn format_attrs(attrs: &Attrs) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = attrs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("[{}]", parts.join(","))
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
