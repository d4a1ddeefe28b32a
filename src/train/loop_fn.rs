use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::data::Dataset;
use crate::errors::TrainError;
use crate::network::{NeuralNet, Step};
use crate::optim::SgdAccumulator;
use crate::train::epoch_stats::{EpochStats, TrainingSummary};
use crate::train::train_config::{TrainConfig, UpdateStrategy};
use crate::train::trainer::train_epoch;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.hyper.epochs` epochs over `dataset`.
///
/// Samples of one epoch are spread over a dedicated rayon pool; epochs run
/// strictly one after another and an epoch's `EpochStats` is produced only
/// once every sample of it has been trained.
///
/// # Errors
/// - `EmptyDataset` when there is nothing to average a loss over
/// - `InputWidthMismatch` when a sample does not fit the network's input layer
/// - `InvalidConfig` for zero threads, `sync_every == 0`, or a
///   `learning_rate` that differs from the network's optimizer
/// - `Diverged` as soon as an epoch's mean loss is NaN or infinite; that
///   epoch's stats are still sent first
pub fn train_loop(
    network: &NeuralNet,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<TrainingSummary, TrainError> {
    let hyper = &config.hyper;

    if dataset.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    let expected = network.topology().input_nodes;
    if let Some((index, actual)) = dataset.find_width_mismatch(expected) {
        return Err(TrainError::InputWidthMismatch { index, expected, actual });
    }
    let net_rate = network.optimizer().learning_rate;
    if hyper.learning_rate != net_rate {
        return Err(TrainError::InvalidConfig {
            message: format!(
                "learning_rate {} does not match the network's optimizer ({net_rate})",
                hyper.learning_rate
            ),
        });
    }
    if hyper.threads == Some(0) {
        return Err(TrainError::InvalidConfig {
            message: "threads must be at least 1".into(),
        });
    }
    if hyper.strategy == (UpdateStrategy::Synchronized { sync_every: 0 }) {
        return Err(TrainError::InvalidConfig {
            message: "sync_every must be at least 1".into(),
        });
    }

    let pool = build_pool(hyper.threads)?;
    log::info!(
        "Training {} weights on {} samples for {} epochs ({} threads, {:?})",
        network.topology().param_count(),
        dataset.len(),
        hyper.epochs,
        pool.current_num_threads(),
        hyper.strategy
    );

    let run_start = Instant::now();
    let mut losses = Vec::with_capacity(hyper.epochs);

    for epoch in 1..=hyper.epochs {
        let t_start = Instant::now();

        let train_loss = run_one_epoch(network, dataset, hyper.strategy, &pool);
        losses.push(train_loss);

        let stats = EpochStats {
            epoch,
            total_epochs: hyper.epochs,
            train_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        log::debug!("{stats} ({} ms)", stats.elapsed_ms);

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                log::debug!("Progress receiver dropped; training continues");
            }
        }

        if !train_loss.is_finite() {
            return Err(TrainError::Diverged { epoch, loss: train_loss });
        }
    }

    Ok(TrainingSummary {
        epochs: hyper.epochs,
        losses,
        elapsed_ms: run_start.elapsed().as_millis() as u64,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn build_pool(threads: Option<usize>) -> Result<ThreadPool, TrainError> {
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("sgd-worker-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    Ok(builder.build()?)
}

/// Runs one full epoch and returns the mean squared error over all samples.
fn run_one_epoch(
    network: &NeuralNet,
    dataset: &Dataset,
    strategy: UpdateStrategy,
    pool: &ThreadPool,
) -> f64 {
    match strategy {
        // A single worker trains in file order so runs are reproducible.
        UpdateStrategy::Hogwild if pool.current_num_threads() == 1 => train_epoch(network, dataset),
        UpdateStrategy::Hogwild => run_hogwild_epoch(network, dataset, pool),
        UpdateStrategy::Synchronized { sync_every } => {
            run_synchronized_epoch(network, dataset, sync_every, pool)
        }
    }
}

/// Every worker calls `NeuralNet::train` on the shared weights with no
/// barrier between samples. The loss sum is a plain parallel reduction.
fn run_hogwild_epoch(network: &NeuralNet, dataset: &Dataset, pool: &ThreadPool) -> f64 {
    let total: f64 = pool.install(|| {
        dataset
            .samples()
            .par_iter()
            .map(|sample| network.train(&sample.features, sample.label))
            .sum()
    });
    total / dataset.len() as f64
}

/// Steps of one group are computed concurrently against the same frozen
/// weights, then folded in sample order and applied at the group barrier.
fn run_synchronized_epoch(
    network: &NeuralNet,
    dataset: &Dataset,
    sync_every: usize,
    pool: &ThreadPool,
) -> f64 {
    let mut total_loss = 0.0;

    for group in dataset.samples().chunks(sync_every) {
        let steps: Vec<Step> = pool.install(|| {
            group
                .par_iter()
                .map(|sample| network.compute_step(&sample.features, sample.label))
                .collect()
        });

        let mut acc = SgdAccumulator::new(network.optimizer(), network.topology());
        for (sample, step) in group.iter().zip(&steps) {
            total_loss += step.squared_error();
            acc.accumulate(&sample.features, step);
        }
        network.apply_accumulated(&acc);
    }

    total_loss / dataset.len() as f64
}
