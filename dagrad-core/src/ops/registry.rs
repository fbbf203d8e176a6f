//! Process-wide operator registry.
//!
//! One stateless instance per [`OpKind`], created on first request and shared by
//! every node of that kind afterwards.

use crate::error::DagradError;
use crate::ops::activation::{ReluMaskOp, ReluOp, SoftmaxOp};
use crate::ops::arithmetic::{AddConstantOp, AddOp, DivOp, MulOp, ScaleByConstantOp, SubOp};
use crate::ops::creation::{OnesOp, ZerosOp};
use crate::ops::linalg::MatMulOp;
use crate::ops::loss::{SoftmaxCrossEntropyGradOp, SoftmaxCrossEntropyOp};
use crate::ops::reduction::ReduceSumAxis0Op;
use crate::ops::view::BroadcastToOp;
use crate::ops::{OpKind, Operator};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

static REGISTRY: Lazy<RwLock<HashMap<OpKind, Arc<dyn Operator>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn instantiate(kind: OpKind) -> Arc<dyn Operator> {
    match kind {
        OpKind::Add => Arc::new(AddOp),
        OpKind::Subtract => Arc::new(SubOp),
        OpKind::Multiply => Arc::new(MulOp),
        OpKind::Divide => Arc::new(DivOp),
        OpKind::MatMul => Arc::new(MatMulOp),
        OpKind::ScaleByConstant => Arc::new(ScaleByConstantOp),
        OpKind::AddConstant => Arc::new(AddConstantOp),
        OpKind::ReduceSumAxis0 => Arc::new(ReduceSumAxis0Op),
        OpKind::BroadcastTo => Arc::new(BroadcastToOp),
        OpKind::Softmax => Arc::new(SoftmaxOp),
        OpKind::SoftmaxCrossEntropy => Arc::new(SoftmaxCrossEntropyOp),
        OpKind::SoftmaxCrossEntropyGrad => Arc::new(SoftmaxCrossEntropyGradOp),
        OpKind::Relu => Arc::new(ReluOp),
        OpKind::ReluMask => Arc::new(ReluMaskOp),
        OpKind::Zeros => Arc::new(ZerosOp),
        OpKind::Ones => Arc::new(OnesOp),
    }
}

/// Returns the shared operator for `kind`, creating it if this is the first request.
pub fn get(kind: OpKind) -> Arc<dyn Operator> {
    // The map only ever grows with immutable values, so a poisoned lock still
    // holds a consistent map.
    {
        let map = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
        if let Some(op) = map.get(&kind) {
            return Arc::clone(op);
        }
    }
    let mut map = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    Arc::clone(map.entry(kind).or_insert_with(|| {
        debug!("registry: instantiating operator {}", kind);
        instantiate(kind)
    }))
}

/// Looks an operator up by its type tag.
///
/// # Errors
/// `DagradError::UnknownOperator` for a tag outside the known set.
pub fn lookup(name: &str) -> Result<Arc<dyn Operator>, DagradError> {
    Ok(get(name.parse::<OpKind>()?))
}
