use crate::{data::Dataset, network::NeuralNet};

/// One sequential pass of online SGD over `dataset`, in file order.
///
/// Returns the mean squared error of the pass (NaN for an empty dataset;
/// `train_loop` rejects those before calling this).
pub fn train_epoch(network: &NeuralNet, dataset: &Dataset) -> f64 {
    let mut total_loss = 0.0;

    for sample in dataset {
        total_loss += network.train(&sample.features, sample.label);
    }

    total_loss / dataset.len() as f64
}
