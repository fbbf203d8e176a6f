use crate::error::DagradError;
use std::fmt;

/// The dimensions of a tensor, outermost first.
///
/// A rank-0 shape describes a single scalar element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape(dims)
    }

    /// Rank-0 shape holding exactly one element.
    pub fn scalar() -> Self {
        Shape(Vec::new())
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements (product of all dimensions, 1 for a scalar).
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    /// Size of the given axis.
    pub fn dim(&self, axis: usize) -> Result<usize, DagradError> {
        self.0.get(axis).copied().ok_or(DagradError::AxisOutOfRange {
            axis,
            rank: self.0.len(),
        })
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.clone()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape(dims.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_basics() {
        let s = Shape::from([2, 3, 4]);
        assert_eq!(s.ndim(), 3);
        assert_eq!(s.numel(), 24);
        assert_eq!(s.dim(1).unwrap(), 3);
        assert_eq!(s.to_string(), "[2, 3, 4]");
    }

    #[test]
    fn test_scalar_shape() {
        let s = Shape::scalar();
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.numel(), 1);
        assert_eq!(s.to_string(), "[]");
    }

    #[test]
    fn test_dim_out_of_range() {
        let s = Shape::from([2, 2]);
        assert_eq!(s.dim(2), Err(DagradError::AxisOutOfRange { axis: 2, rank: 2 }));
    }

    #[test]
    fn test_shape_equality_is_elementwise() {
        assert_eq!(Shape::from([2, 3]), Shape::new(vec![2, 3]));
        assert_ne!(Shape::from([2, 3]), Shape::from([3, 2]));
        assert_eq!(Shape::from([0, 5]).numel(), 0);
    }
}
