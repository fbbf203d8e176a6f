// src/ops/view/mod.rs

pub mod broadcast;

pub use broadcast::BroadcastToOp;
