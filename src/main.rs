// Trains the 11-16-1 network on `wine.csv` in the working directory and
// prints one loss line per epoch. Log verbosity follows RUST_LOG (default
// `info`, written to stderr).
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;

use hogwild_nn::data::DATASET_PATH;
use hogwild_nn::{
    train_loop, DatasetLoader, EpochStats, Hyperparams, NeuralNet, Topology, TrainConfig, TrainError,
};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let topology = Topology::default();
    let hyper = Hyperparams::default();
    log::info!("Hyperparameters: {}", serde_json::to_string(&hyper)?);

    let dataset = DatasetLoader::default()
        .load(DATASET_PATH)
        .with_context(|| format!("loading {DATASET_PATH}"))?;

    let mut rng = StdRng::from_entropy();
    let network = NeuralNet::new(topology, hyper.optimizer(), &mut rng);

    let (tx, rx) = mpsc::channel::<EpochStats>();
    let printer = thread::spawn(move || {
        for stats in rx {
            println!("{stats}");
        }
    });

    let start = Instant::now();
    let config = TrainConfig::new(hyper).with_progress(tx);
    let result = train_loop(&network, &dataset, &config);
    // Closing the channel lets the printer drain and exit.
    drop(config);
    let elapsed = start.elapsed();

    if printer.join().is_err() {
        log::error!("Epoch printer thread panicked");
    }

    match result {
        Ok(summary) => {
            log::info!(
                "Final loss {:.6} after {} epochs",
                summary.final_loss().unwrap_or(f64::NAN),
                summary.epochs
            );
        }
        Err(e @ (TrainError::EmptyDataset | TrainError::Diverged { .. })) => {
            log::error!("{e}");
        }
        Err(e) => return Err(e.into()),
    }

    println!("\nTraining completed in: {} ms", elapsed.as_millis());
    Ok(())
}
