//! # Evaluation
//!
//! [`Evaluator`] walks a topological order forward, filling a [`FeedDict`] with one
//! value per node. [`Executor`] pairs an evaluator with gradient nodes built once up
//! front, which is the shape of a training loop: bind inputs, run loss and gradients,
//! update parameters, repeat.

use crate::autograd::gradients;
use crate::device::StorageDevice;
use crate::error::DagradError;
use crate::graph::{Graph, Node, NodeId, TopoCache};
use crate::ops::OpContext;
use crate::shape::Shape;
use crate::tensor::Tensor;
use log::{debug, trace};
use std::collections::HashMap;

/// Node → value map. Callers bind placeholders here; evaluation adds computed nodes.
pub type FeedDict = HashMap<NodeId, Tensor>;

/// Forward evaluator with a memoized topological order.
///
/// The cached order is keyed on the requested outputs only, so one evaluator should
/// be used with one graph.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    device: StorageDevice,
    cache: TopoCache,
}

impl Evaluator {
    pub fn new(device: StorageDevice) -> Self {
        Evaluator {
            device,
            cache: TopoCache::new(),
        }
    }

    pub fn device(&self) -> StorageDevice {
        self.device
    }

    /// Evaluates `outputs`, storing every computed node into `feed`.
    ///
    /// Nodes already present in `feed` are taken as given and not recomputed, which
    /// allows partial pre-computation. Leaves must be bound beforehand.
    ///
    /// On failure every entry this call inserted is removed again, so `feed` is left
    /// as the caller passed it.
    ///
    /// # Errors
    /// - `UnboundPlaceholder` for a reachable placeholder missing from `feed`.
    /// - Any shape error raised by an operator's `infer`.
    /// - `UnsupportedDevice` when outputs cannot be allocated on this evaluator's device.
    pub fn run(
        &mut self,
        graph: &Graph,
        outputs: &[NodeId],
        feed: &mut FeedDict,
    ) -> Result<Vec<Tensor>, DagradError> {
        let mut inserted = Vec::new();
        let result = self
            .fill(graph, outputs, feed, &mut inserted)
            .and_then(|()| collect_outputs(outputs, feed));
        if result.is_err() {
            debug!("evaluator: run failed, rolling back {} value(s)", inserted.len());
            for id in &inserted {
                feed.remove(id);
            }
        }
        result
    }

    /// Like [`run`](Evaluator::run) but drops every computed intermediate afterwards,
    /// leaving `feed` with exactly the bindings it came in with.
    pub fn run_transient(
        &mut self,
        graph: &Graph,
        outputs: &[NodeId],
        feed: &mut FeedDict,
    ) -> Result<Vec<Tensor>, DagradError> {
        let mut inserted = Vec::new();
        let result = self
            .fill(graph, outputs, feed, &mut inserted)
            .and_then(|()| collect_outputs(outputs, feed));
        for id in &inserted {
            feed.remove(id);
        }
        result
    }

    fn fill(
        &mut self,
        graph: &Graph,
        outputs: &[NodeId],
        feed: &mut FeedDict,
        inserted: &mut Vec<NodeId>,
    ) -> Result<(), DagradError> {
        let ctx = OpContext::new(self.device);
        let order = self.cache.order_for(graph, outputs)?;
        debug!(
            "evaluator: running {} node(s) for {} output(s) on {:?}",
            order.len(),
            outputs.len(),
            ctx.device
        );

        for &id in order {
            if feed.contains_key(&id) {
                continue;
            }
            let node = graph.node(id)?;
            let value = evaluate_node(graph, node, feed, &ctx)?;
            trace!("evaluator: {} '{}' -> {}", id, node.name(), value.shape());
            feed.insert(id, value);
            inserted.push(id);
        }
        Ok(())
    }
}

fn evaluate_node(
    graph: &Graph,
    node: &Node,
    feed: &FeedDict,
    ctx: &OpContext,
) -> Result<Tensor, DagradError> {
    let op = node.op().ok_or_else(|| DagradError::UnboundPlaceholder {
        name: node.name().to_string(),
    })?;

    let inputs = node
        .inputs()
        .iter()
        .map(|input| {
            feed.get(input).ok_or_else(|| DagradError::MissingInput {
                node: node.name().to_string(),
                input: graph.name(*input).unwrap_or_default().to_string(),
            })
        })
        .collect::<Result<Vec<&Tensor>, _>>()?;
    let input_shapes: Vec<&Shape> = inputs.iter().map(|t| t.shape()).collect();

    let expected = op.infer(node, &input_shapes)?;
    let mut values = op.compute(node, &inputs, ctx)?;
    if values.len() != 1 || expected.len() != 1 {
        return Err(DagradError::InternalError(format!(
            "node '{}' produced {} value(s) for {} inferred shape(s), expected exactly one",
            node.name(),
            values.len(),
            expected.len()
        )));
    }
    let value = values.remove(0);
    if value.shape() != &expected[0] {
        return Err(DagradError::InternalError(format!(
            "{} computed shape {} but inferred {} for node '{}'",
            op.kind(),
            value.shape(),
            expected[0],
            node.name()
        )));
    }
    Ok(value)
}

fn collect_outputs(outputs: &[NodeId], feed: &FeedDict) -> Result<Vec<Tensor>, DagradError> {
    outputs
        .iter()
        .map(|id| {
            feed.get(id).cloned().ok_or_else(|| {
                DagradError::InternalError(format!("output {} has no value after evaluation", id))
            })
        })
        .collect()
}

/// Evaluates `outputs` on the CPU against a copy of `feed`.
///
/// Convenience for one-off evaluations that must not touch the caller's bindings.
pub fn evaluate(
    graph: &Graph,
    outputs: &[NodeId],
    feed: &FeedDict,
) -> Result<Vec<Tensor>, DagradError> {
    let mut scratch = feed.clone();
    Evaluator::new(StorageDevice::CPU).run(graph, outputs, &mut scratch)
}

/// Evaluator plus the gradient nodes of one loss.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    evaluator: Evaluator,
    loss: Option<NodeId>,
    grad_nodes: HashMap<NodeId, NodeId>,
}

impl Executor {
    pub fn new(device: StorageDevice) -> Self {
        Executor {
            evaluator: Evaluator::new(device),
            loss: None,
            grad_nodes: HashMap::new(),
        }
    }

    /// Differentiates `loss` with respect to `wrt` once and keeps the gradient nodes
    /// for [`run_with_gradients`](Executor::run_with_gradients).
    pub fn with_gradients(
        graph: &mut Graph,
        device: StorageDevice,
        loss: NodeId,
        wrt: &[NodeId],
    ) -> Result<Self, DagradError> {
        let grads = gradients(graph, loss, wrt)?;
        let mut executor = Executor::new(device);
        executor.loss = Some(loss);
        executor.grad_nodes = wrt.iter().copied().zip(grads).collect();
        Ok(executor)
    }

    pub fn device(&self) -> StorageDevice {
        self.evaluator.device()
    }

    pub fn loss(&self) -> Option<NodeId> {
        self.loss
    }

    /// Gradient node built for `wrt`, if it was differentiated.
    pub fn gradient_node(&self, wrt: NodeId) -> Option<NodeId> {
        self.grad_nodes.get(&wrt).copied()
    }

    /// Evaluates `outputs`. `feed` keeps only its original bindings afterwards.
    pub fn run(
        &mut self,
        graph: &Graph,
        outputs: &[NodeId],
        feed: &mut FeedDict,
    ) -> Result<Vec<Tensor>, DagradError> {
        self.evaluator.run_transient(graph, outputs, feed)
    }

    /// Evaluates `outputs` and the gradients of `grad_targets` in one pass.
    ///
    /// # Errors
    /// `Disconnected` for a target that was not differentiated at construction.
    pub fn run_with_gradients(
        &mut self,
        graph: &Graph,
        outputs: &[NodeId],
        grad_targets: &[NodeId],
        feed: &mut FeedDict,
    ) -> Result<(Vec<Tensor>, Vec<Tensor>), DagradError> {
        let mut requested = outputs.to_vec();
        for &target in grad_targets {
            let grad = self.gradient_node(target).ok_or_else(|| DagradError::Disconnected {
                name: graph.name(target).unwrap_or_default().to_string(),
            })?;
            requested.push(grad);
        }
        let mut values = self.evaluator.run_transient(graph, &requested, feed)?;
        let grad_values = values.split_off(outputs.len());
        Ok((values, grad_values))
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
