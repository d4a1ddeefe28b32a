pub mod epoch_stats;
pub mod train_config;
pub mod trainer;
pub mod loop_fn;

pub use epoch_stats::{EpochStats, TrainingSummary};
pub use train_config::{Hyperparams, TrainConfig, UpdateStrategy, EPOCHS};
pub use trainer::train_epoch;
pub use loop_fn::train_loop;
