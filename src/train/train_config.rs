use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::optim::{Sgd, LEARNING_RATE};
use crate::train::epoch_stats::EpochStats;

/// Default number of passes over the dataset.
pub const EPOCHS: usize = 100;

/// How concurrent workers share the weights within an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum UpdateStrategy {
    /// Lock-free shared updates: every worker trains on live weights that
    /// other workers are updating at the same time. Fast, but the trajectory
    /// depends on scheduling and is not reproducible with more than one
    /// thread.
    Hogwild,
    /// Samples are taken in consecutive groups of `sync_every`. Each group's
    /// steps are computed in parallel against frozen weights, then summed in
    /// sample order and applied together. Reproducible for any thread count;
    /// `sync_every = 1` is exactly sequential online SGD.
    Synchronized { sync_every: usize },
}

impl Default for UpdateStrategy {
    fn default() -> Self {
        UpdateStrategy::Hogwild
    }
}

/// Training hyperparameters.
///
/// `learning_rate` must match the optimizer the network was built with;
/// build it with [`Hyperparams::optimizer`] and `train_loop` checks the two agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparams {
    pub learning_rate: f64,
    pub epochs: usize,
    /// Worker count; `None` uses rayon's default (one per logical CPU).
    pub threads: Option<usize>,
    pub strategy: UpdateStrategy,
}

impl Hyperparams {
    pub fn optimizer(&self) -> Sgd {
        Sgd::new(self.learning_rate)
    }
}

impl Default for Hyperparams {
    fn default() -> Self {
        Hyperparams {
            learning_rate: LEARNING_RATE,
            epochs: EPOCHS,
            threads: None,
            strategy: UpdateStrategy::default(),
        }
    }
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `hyper`       — epochs, worker count and update strategy
/// - `progress_tx` — optional channel sender; one `EpochStats` is sent per
///                   completed epoch, after every sample of that epoch has
///                   been processed.
#[derive(Debug, Default)]
pub struct TrainConfig {
    pub hyper: Hyperparams,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no progress channel.
    pub fn new(hyper: Hyperparams) -> Self {
        TrainConfig {
            hyper,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }
}
