pub mod row_dataset;
pub mod traits;
pub mod vec_dataset;

pub use row_dataset::RowDataset;
pub use traits::Dataset;
pub use vec_dataset::VecDataset;
