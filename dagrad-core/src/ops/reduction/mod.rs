// src/ops/reduction/mod.rs

pub mod sum;

pub use sum::ReduceSumAxis0Op;
