pub mod math;
pub mod activation;
pub mod network;
pub mod optim;
pub mod train;
pub mod data;
pub mod errors;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::{sigmoid, sigmoid_derivative};
pub use network::{NeuralNet, Topology};
pub use optim::sgd::Sgd;
pub use data::{Dataset, DatasetLoader, Sample};
pub use errors::{DatasetError, NetError, TrainError};
pub use train::{train_loop, EpochStats, Hyperparams, TrainConfig, TrainingSummary, UpdateStrategy};
