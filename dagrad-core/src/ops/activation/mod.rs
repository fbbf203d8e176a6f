// src/ops/activation/mod.rs

//! # Activation Functions
//!
//! - [`ReluOp`]: `max(a, 0)`, differentiated through [`ReluMaskOp`].
//! - [`SoftmaxOp`]: numerically stable row-wise softmax over a `[N, C]` input.
//!   Its gradient is only available fused with cross-entropy (see `ops::loss`).

pub mod relu;
pub mod softmax;

pub use relu::{ReluMaskOp, ReluOp};
pub use softmax::SoftmaxOp;
