use crate::error::DagradError;
use crate::ops::registry;
use crate::ops::{OpKind, Operator};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handle to a node stored in a [`Graph`](crate::graph::Graph).
///
/// Handles are plain indices into the graph arena: copying one never copies the
/// subgraph behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// A typed attribute value attached to an operator node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Float(f32),
    Int(i64),
}

impl AttrValue {
    fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Float(_) => "float",
            AttrValue::Int(_) => "int",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Float(x) => write!(f, "{:?}", x),
            AttrValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

/// Attribute bag of a node. Keys are kept sorted so derived names are deterministic.
pub type Attrs = BTreeMap<String, AttrValue>;

/// One vertex of the computation graph.
///
/// A node with no inputs is a placeholder: it carries no operator and its value is
/// supplied by the caller at evaluation time. Every other node is the output of
/// exactly one operator applied to its (ordered) inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) kind: Option<OpKind>,
    pub(crate) attrs: Attrs,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Unique name of the node within its graph.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inputs in operand order (left operand first).
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Operator tag, `None` for placeholders.
    pub fn kind(&self) -> Option<OpKind> {
        self.kind
    }

    /// Shared operator instance for this node, `None` for placeholders.
    pub fn op(&self) -> Option<Arc<dyn Operator>> {
        self.kind.map(registry::get)
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind.is_none()
    }

    fn attr(&self, key: &str) -> Result<&AttrValue, DagradError> {
        self.attrs.get(key).ok_or_else(|| DagradError::MissingAttribute {
            node: self.name.clone(),
            key: key.to_string(),
        })
    }

    fn malformed(&self, key: &str, expected: &str, found: &AttrValue) -> DagradError {
        DagradError::MalformedAttribute {
            node: self.name.clone(),
            key: key.to_string(),
            expected: format!("{}, found {}", expected, found.type_name()),
        }
    }

    pub fn attr_bool(&self, key: &str) -> Result<bool, DagradError> {
        match self.attr(key)? {
            AttrValue::Bool(b) => Ok(*b),
            other => Err(self.malformed(key, "bool", other)),
        }
    }

    pub fn attr_float(&self, key: &str) -> Result<f32, DagradError> {
        match self.attr(key)? {
            AttrValue::Float(x) => Ok(*x),
            other => Err(self.malformed(key, "float", other)),
        }
    }

    pub fn attr_int(&self, key: &str) -> Result<i64, DagradError> {
        match self.attr(key)? {
            AttrValue::Int(i) => Ok(*i),
            other => Err(self.malformed(key, "int", other)),
        }
    }
}
