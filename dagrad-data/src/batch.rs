use dagrad_core::{DagradError, FeedDict, NodeId, Tensor};

/// A group of rows gathered by a [`DataLoader`](crate::DataLoader), packed row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub data: Vec<f32>,
    pub rows: usize,
    pub cols: usize,
}

impl Batch {
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Copies the batch into a `[rows, cols]` tensor.
    pub fn to_tensor(&self) -> Result<Tensor, DagradError> {
        Tensor::new(self.data.clone(), self.shape())
    }

    /// Binds the batch as the value of placeholder `node`.
    ///
    /// An existing value of the same shape is overwritten in place; anything else is
    /// replaced by a fresh tensor (a short last batch changes the shape).
    pub fn bind(&self, feed: &mut FeedDict, node: NodeId) -> Result<(), DagradError> {
        if let Some(existing) = feed.get_mut(&node) {
            if existing.shape().dims() == self.shape() {
                return existing.fill_from_slice(&self.data);
            }
        }
        feed.insert(node, self.to_tensor()?);
        Ok(())
    }

    /// Splits every row at column `at`: `(columns [0, at), columns [at, cols))`.
    ///
    /// Datasets that pack features and one-hot labels into one row use this to get
    /// the two halves.
    ///
    /// # Errors
    /// `IndexOutOfBounds` if `at > cols`.
    pub fn split_columns(&self, at: usize) -> Result<(Batch, Batch), DagradError> {
        if at > self.cols {
            return Err(DagradError::IndexOutOfBounds {
                index: at,
                len: self.cols,
            });
        }
        let right_cols = self.cols - at;
        let mut left = Vec::with_capacity(self.rows * at);
        let mut right = Vec::with_capacity(self.rows * right_cols);
        for row in self.data.chunks(self.cols.max(1)).take(self.rows) {
            left.extend_from_slice(&row[..at]);
            right.extend_from_slice(&row[at..]);
        }
        Ok((
            Batch { data: left, rows: self.rows, cols: at },
            Batch { data: right, rows: self.rows, cols: right_cols },
        ))
    }
}
