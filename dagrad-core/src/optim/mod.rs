// dagrad-core/src/optim/mod.rs

//! Parameter updates for training loops.
//!
//! Parameters are placeholders whose current values live in the caller's
//! [`FeedDict`](crate::executor::FeedDict); an optimizer step rewrites those bound
//! tensors in place from gradient values produced by an
//! [`Executor`](crate::executor::Executor).

pub mod sgd;

pub use sgd::Sgd;
