use super::traits::Dataset;
use dagrad_core::DagradError;

/// Fixed-width rows of `f32`, stored contiguously.
///
/// This is the shape a [`DataLoader`](crate::DataLoader) batches: every row has
/// [`cols`](RowDataset::cols) values, so a batch of `n` rows is an `[n, cols]` tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDataset {
    data: Vec<f32>,
    cols: usize,
}

impl RowDataset {
    /// Builds a dataset from individual rows.
    ///
    /// # Errors
    /// `ShapeMismatch` if the rows do not all have the same length.
    pub fn new(rows: Vec<Vec<f32>>) -> Result<Self, DagradError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(DagradError::ShapeMismatch {
                    expected: vec![cols],
                    actual: vec![row.len()],
                    operation: format!("RowDataset::new (row {})", i),
                });
            }
            data.extend(row);
        }
        Ok(RowDataset { data, cols })
    }

    /// Builds a dataset from row-major values, `cols` per row.
    ///
    /// # Errors
    /// `InvalidConfig` if `cols` is zero, `TensorCreationError` if `data.len()` is not a
    /// multiple of `cols`.
    pub fn from_flat(data: Vec<f32>, cols: usize) -> Result<Self, DagradError> {
        if cols == 0 {
            return Err(DagradError::InvalidConfig(
                "RowDataset needs at least one column".to_string(),
            ));
        }
        if data.len() % cols != 0 {
            return Err(DagradError::TensorCreationError {
                data_len: data.len(),
                shape: vec![data.len() / cols + 1, cols],
            });
        }
        Ok(RowDataset { data, cols })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrows row `index` without copying it.
    pub fn row(&self, index: usize) -> Result<&[f32], DagradError> {
        let len = self.len();
        if index >= len {
            return Err(DagradError::IndexOutOfBounds { index, len });
        }
        Ok(&self.data[index * self.cols..(index + 1) * self.cols])
    }
}

impl Dataset for RowDataset {
    type Item = Vec<f32>;

    fn get(&self, index: usize) -> Result<Self::Item, DagradError> {
        self.row(index).map(<[f32]>::to_vec)
    }

    fn len(&self) -> usize {
        if self.cols == 0 {
            0
        } else {
            self.data.len() / self.cols
        }
    }
}
