// src/tensor/debug.rs
use crate::tensor::Tensor;
use std::fmt;

/// Human-readable rendering: rank 0 and 1 on one line, rank 2 one row per line.
/// Higher ranks fall back to a flat listing prefixed by the shape.
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self.shape.dims();
        match dims.len() {
            0 | 1 => write_row(f, &self.data),
            2 => {
                let cols = dims[1];
                if cols == 0 {
                    return write!(f, "[]");
                }
                for (i, row) in self.data.chunks(cols).enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write_row(f, row)?;
                }
                Ok(())
            }
            _ => {
                write!(f, "Tensor{} ", self.shape)?;
                write_row(f, &self.data)
            }
        }
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[f32]) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in row.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", v)?;
    }
    write!(f, "]")
}
