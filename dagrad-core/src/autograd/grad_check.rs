use crate::autograd::gradients;
use crate::device::StorageDevice;
use crate::error::DagradError;
use crate::executor::{Evaluator, FeedDict};
use crate::graph::{Graph, NodeId};
use log::debug;
use num_traits::Float;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical grad {analytical_grad:?} != numerical grad {numerical_grad:?} (difference {difference:?})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index} (loss+ {loss_plus:?}, loss- {loss_minus:?})")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },

    #[error("Gradient check input {input_index} ('{name}') must be a placeholder")]
    InputNotPlaceholder { input_index: usize, name: String },

    #[error("Invalid gradient check configuration: {0}")]
    InvalidConfig(String),

    #[error("Graph error during gradient check: {0}")]
    Graph(#[from] DagradError),
}

/// Step size and acceptance threshold for [`check_grad`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    /// Central-difference step.
    pub epsilon: f64,
    /// Absolute tolerance, scaled by `max(1, |numerical|)`.
    pub tolerance: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            epsilon: 1e-3,
            tolerance: 1e-3,
        }
    }
}

/// Sum of every element of `values`, accumulated in `f64`.
fn total<F: Float>(values: &[F]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v.to_f64().unwrap_or(f64::NAN))
}

/// Checks the symbolic gradients of `loss` against central finite differences.
///
/// The scalar being differentiated is the sum of all elements of `loss`. Every
/// element of every `wrt` placeholder is perturbed by `±epsilon` in a private copy of
/// `feed`; the caller's bindings are never modified.
pub fn check_grad(
    graph: &mut Graph,
    loss: NodeId,
    wrt: &[NodeId],
    feed: &FeedDict,
    config: &GradCheckConfig,
) -> Result<(), GradCheckError> {
    if !(config.epsilon > 0.0 && config.epsilon.is_finite()) {
        return Err(GradCheckError::InvalidConfig(format!(
            "epsilon must be positive and finite, got {}",
            config.epsilon
        )));
    }
    if !(config.tolerance >= 0.0) {
        return Err(GradCheckError::InvalidConfig(format!(
            "tolerance must be non-negative, got {}",
            config.tolerance
        )));
    }
    for (input_index, &id) in wrt.iter().enumerate() {
        let node = graph.node(id)?;
        if !node.is_placeholder() {
            return Err(GradCheckError::InputNotPlaceholder {
                input_index,
                name: node.name().to_string(),
            });
        }
    }

    let grad_nodes = gradients(graph, loss, wrt)?;
    let graph: &Graph = graph;
    let mut evaluator = Evaluator::new(StorageDevice::CPU);
    let mut scratch = feed.clone();

    let analytical = evaluator.run_transient(graph, &grad_nodes, &mut scratch)?;
    debug!(
        "grad_check: comparing {} gradient(s) of '{}' (epsilon {}, tolerance {})",
        wrt.len(),
        graph.name(loss)?,
        config.epsilon,
        config.tolerance
    );

    for (input_index, (&id, analytical_grad)) in wrt.iter().zip(&analytical).enumerate() {
        let numel = match scratch.get(&id) {
            Some(value) => value.numel(),
            None => {
                return Err(DagradError::UnboundPlaceholder {
                    name: graph.name(id)?.to_string(),
                }
                .into())
            }
        };

        for element_index in 0..numel {
            let original = scratch[&id].data()[element_index];
            let plus = (f64::from(original) + config.epsilon) as f32;
            let minus = (f64::from(original) - config.epsilon) as f32;
            let mut loss_at = |x: f32| -> Result<f64, GradCheckError> {
                if let Some(value) = scratch.get_mut(&id) {
                    value.data_mut()[element_index] = x;
                }
                let out = evaluator.run_transient(graph, &[loss], &mut scratch)?;
                Ok(total(out[0].data()))
            };
            let loss_plus = loss_at(plus)?;
            let loss_minus = loss_at(minus)?;
            if let Some(value) = scratch.get_mut(&id) {
                value.data_mut()[element_index] = original;
            }

            // Divide by the step actually taken after rounding to f32.
            let numerical = (loss_plus - loss_minus) / (f64::from(plus) - f64::from(minus));
            if !numerical.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }
            let symbolic = f64::from(analytical_grad.data()[element_index]);
            if !symbolic.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index,
                    element_index,
                    value: symbolic,
                });
            }
            let difference = (symbolic - numerical).abs();
            if difference > config.tolerance * numerical.abs().max(1.0) {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    element_index,
                    analytical_grad: symbolic,
                    numerical_grad: numerical,
                    difference,
                });
            }
        }
    }
    Ok(())
}
