// Element-wise arithmetic on same-shaped operands, plus scaling/shifting by a constant.
pub mod add;
pub mod div;
pub mod mul;
pub mod scale;
pub mod sub;

pub use add::AddOp;
pub use div::DivOp;
pub use mul::MulOp;
pub use scale::{AddConstantOp, ScaleByConstantOp};
pub use sub::SubOp;
