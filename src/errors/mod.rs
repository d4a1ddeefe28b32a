//! Error types for dataset loading, network construction and training.

use thiserror::Error;

/// Failures while reading a dataset file.
///
/// A missing file is not an error (it loads as an empty dataset) and a
/// malformed row is recovered locally, so only genuine I/O faults land here.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors building a network from explicit weights.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("Weight matrix {name} has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Weight matrix {name} has ragged rows")]
    Ragged { name: &'static str },
}

/// Conditions that abort a training run.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Dataset is empty; nothing to train on")]
    EmptyDataset,

    #[error("Sample {index} has {actual} features, network expects {expected}")]
    InputWidthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Training diverged at epoch {epoch}: mean loss is {loss}")]
    Diverged { epoch: usize, loss: f64 },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
