//! # dagrad-data
//!
//! Feeds training data into a dagrad graph: a [`Dataset`] holds samples, a
//! [`Sampler`] decides the visiting order, and a [`DataLoader`] groups rows into
//! [`Batch`]es that bind straight into a placeholder of a
//! [`FeedDict`](dagrad_core::FeedDict).

pub mod batch;
pub mod dataloader;
pub mod datasets;
pub mod samplers;

pub use batch::Batch;
pub use dataloader::DataLoader;
pub use datasets::{Dataset, RowDataset, VecDataset};
pub use samplers::{RandomSampler, Sampler, SequentialSampler};
