// src/ops/loss/mod.rs

//! # Loss Functions
//!
//! - [`SoftmaxCrossEntropyOp`]: mean cross-entropy between `softmax(logits)` and a
//!   label distribution, reduced to a one-element tensor.
//! - [`SoftmaxCrossEntropyGradOp`]: the fused gradient of the above with respect to
//!   the logits, scaled by the upstream value.

pub mod cross_entropy;

pub use cross_entropy::{SoftmaxCrossEntropyGradOp, SoftmaxCrossEntropyOp};
