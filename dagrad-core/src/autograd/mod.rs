//! # Reverse-mode differentiation
//!
//! [`gradients`] extends a graph with the nodes computing d(output)/d(node) for a
//! set of requested nodes. Nothing is evaluated here: the returned ids are ordinary
//! graph nodes that the evaluator runs alongside (or instead of) the forward outputs.
//!
//! [`check_grad`] compares those symbolic gradients against central finite differences.

pub mod grad_check;
pub mod gradient;

pub use grad_check::{check_grad, GradCheckConfig, GradCheckError};
pub use gradient::gradients;
