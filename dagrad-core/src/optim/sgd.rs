use crate::error::DagradError;
use crate::executor::FeedDict;
use crate::graph::NodeId;
use crate::tensor::Tensor;
use log::{debug, trace};
use std::collections::HashMap;

/// Stochastic gradient descent, with optional classical momentum.
///
/// Without momentum a step is `param -= lr * grad`. With momentum `m` it keeps one
/// velocity buffer per parameter: `v = m * v + grad; param -= lr * v`.
#[derive(Debug, Clone)]
pub struct Sgd {
    lr: f32,
    momentum: f32,
    velocity: HashMap<NodeId, Tensor>,
}

impl Sgd {
    /// # Errors
    /// `InvalidConfig` unless `lr` is finite and positive.
    pub fn new(lr: f32) -> Result<Self, DagradError> {
        if !(lr.is_finite() && lr > 0.0) {
            return Err(DagradError::InvalidConfig(format!(
                "learning rate must be finite and positive, got {}",
                lr
            )));
        }
        Ok(Sgd {
            lr,
            momentum: 0.0,
            velocity: HashMap::new(),
        })
    }

    /// # Errors
    /// `InvalidConfig` unless `0 <= momentum < 1`.
    pub fn with_momentum(mut self, momentum: f32) -> Result<Self, DagradError> {
        if !(0.0..1.0).contains(&momentum) {
            return Err(DagradError::InvalidConfig(format!(
                "momentum must be in [0, 1), got {}",
                momentum
            )));
        }
        self.momentum = momentum;
        Ok(self)
    }

    pub fn lr(&self) -> f32 {
        self.lr
    }

    pub fn set_lr(&mut self, lr: f32) -> Result<(), DagradError> {
        self.lr = Sgd::new(lr)?.lr;
        Ok(())
    }

    /// Updates each bound parameter in `feed` with its gradient value.
    ///
    /// All pairs are validated before any tensor is touched, so an error leaves every
    /// parameter and momentum buffer unchanged. A momentum buffer whose shape no longer
    /// matches its gradient (the parameter was rebound) is discarded.
    ///
    /// # Errors
    /// - `UnboundPlaceholder` if a parameter has no value in `feed`.
    /// - `ShapeMismatch` if a gradient's shape differs from its parameter's.
    pub fn step(
        &mut self,
        feed: &mut FeedDict,
        updates: &[(NodeId, &Tensor)],
    ) -> Result<(), DagradError> {
        let mut stale = Vec::new();
        for (param, grad) in updates {
            let value = feed.get(param).ok_or_else(|| DagradError::UnboundPlaceholder {
                name: param.to_string(),
            })?;
            if value.shape() != grad.shape() {
                return Err(DagradError::ShapeMismatch {
                    expected: value.shape().to_vec(),
                    actual: grad.shape().to_vec(),
                    operation: format!("Sgd::step for parameter {}", param),
                });
            }
            if let Some(v) = self.velocity.get(param) {
                if v.shape() != grad.shape() {
                    stale.push(*param);
                }
            }
        }

        // A parameter rebound with a new shape starts over with a fresh velocity.
        for param in stale {
            debug!("sgd: dropping momentum buffer of {} after a shape change", param);
            self.velocity.remove(&param);
        }

        for (param, grad) in updates {
            let direction: &Tensor = if self.momentum > 0.0 {
                let momentum = self.momentum;
                let v = self
                    .velocity
                    .entry(*param)
                    .or_insert_with(|| Tensor::zeros(grad.shape().clone()));
                v.data_mut().iter_mut().for_each(|x| *x *= momentum);
                v.add_(grad)?;
                v
            } else {
                grad
            };
            if let Some(value) = feed.get_mut(param) {
                value.sub_scaled_(direction, self.lr)?;
                trace!("sgd: updated {} ({} element(s))", param, value.numel());
            }
        }
        Ok(())
    }

    /// Forgets the momentum buffers.
    pub fn reset(&mut self) {
        self.velocity.clear();
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
