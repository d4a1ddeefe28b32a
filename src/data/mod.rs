pub mod dataset;
pub mod loader;

pub use dataset::{Dataset, Sample};
pub use loader::{DatasetLoader, LoadStats, RowOutcome, RowRejection, DATASET_PATH, LABEL_SCALE};
