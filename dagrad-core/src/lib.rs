//! # dagrad-core
//!
//! A computation-graph engine with symbolic reverse-mode differentiation.
//!
//! Build a [`Graph`] from placeholders and operator nodes, ask
//! [`autograd::gradients`] for gradient *nodes*, then evaluate any mix of forward
//! and gradient nodes with an [`Evaluator`] or [`Executor`] against a [`FeedDict`]
//! of placeholder bindings.
//!
//! ```
//! use dagrad_core::{Executor, FeedDict, Graph, StorageDevice, Tensor};
//!
//! let mut graph = Graph::new();
//! let a = graph.placeholder("a")?;
//! let b = graph.placeholder("b")?;
//! let c = graph.add(a, b)?;
//!
//! let mut feed = FeedDict::new();
//! feed.insert(a, Tensor::ones(vec![2, 2]));
//! feed.insert(b, Tensor::ones(vec![2, 2]));
//! let out = Executor::new(StorageDevice::CPU).run(&graph, &[c], &mut feed)?;
//! assert_eq!(out[0].data(), &[2.0; 4]);
//! # Ok::<(), dagrad_core::DagradError>(())
//! ```

pub mod autograd;
pub mod device;
pub mod error;
pub mod executor;
pub mod graph;
pub mod ops;
pub mod optim;
pub mod shape;
pub mod tensor;
pub mod utils;

pub use autograd::{check_grad, gradients, GradCheckConfig, GradCheckError};
pub use device::StorageDevice;
pub use error::{DagradError, ErrorClass};
pub use executor::{evaluate, Evaluator, Executor, FeedDict};
pub use graph::{AttrValue, Graph, Node, NodeId};
pub use ops::{OpBuilder, OpKind, Operator};
pub use shape::Shape;
pub use tensor::Tensor;

// Re-export traits required by public functions/structs
pub use num_traits;
