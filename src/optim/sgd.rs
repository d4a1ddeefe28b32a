use serde::{Deserialize, Serialize};

use crate::math::{AtomicMatrix, Matrix};
use crate::network::step::Step;
use crate::network::topology::Topology;

/// Default step size for online SGD.
pub const LEARNING_RATE: f64 = 0.01;

/// Plain stochastic gradient descent without momentum or decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one sample's update in place.
    ///
    /// Output weights first, then input weights. Both use only values held in
    /// `step` (pre-update activations and deltas), so the order is immaterial.
    pub fn step(
        &self,
        weights_input_hidden: &AtomicMatrix,
        weights_hidden_output: &AtomicMatrix,
        sample: &[f64],
        step: &Step,
    ) {
        for (i, &h) in step.hidden.iter().enumerate() {
            weights_hidden_output.add(i, 0, self.learning_rate * step.output_delta * h);
        }

        for (i, &x) in sample.iter().enumerate() {
            for (j, &delta) in step.hidden_deltas.iter().enumerate() {
                weights_input_hidden.add(i, j, self.learning_rate * delta * x);
            }
        }
    }
}

impl Default for Sgd {
    fn default() -> Self {
        Sgd::new(LEARNING_RATE)
    }
}

/// Sums the updates of several steps so they can be applied at one barrier.
///
/// Steps are accumulated in the order they are fed, which keeps the summed
/// update bit-identical no matter how many threads computed the steps.
#[derive(Debug, Clone)]
pub struct SgdAccumulator {
    optimizer: Sgd,
    input_hidden: Matrix,
    hidden_output: Matrix,
    steps: usize,
}

impl SgdAccumulator {
    pub fn new(optimizer: Sgd, topology: Topology) -> SgdAccumulator {
        let (ih_rows, ih_cols) = topology.input_hidden_shape();
        let (ho_rows, ho_cols) = topology.hidden_output_shape();
        SgdAccumulator {
            optimizer,
            input_hidden: Matrix::zeros(ih_rows, ih_cols),
            hidden_output: Matrix::zeros(ho_rows, ho_cols),
            steps: 0,
        }
    }

    pub fn accumulate(&mut self, sample: &[f64], step: &Step) {
        let lr = self.optimizer.learning_rate;
        for (i, &h) in step.hidden.iter().enumerate() {
            self.hidden_output.data[i][0] += lr * step.output_delta * h;
        }
        for (i, &x) in sample.iter().enumerate() {
            for (j, &delta) in step.hidden_deltas.iter().enumerate() {
                self.input_hidden.data[i][j] += lr * delta * x;
            }
        }
        self.steps += 1;
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Adds the summed update to the live weights.
    pub fn apply(&self, weights_input_hidden: &AtomicMatrix, weights_hidden_output: &AtomicMatrix) {
        if self.steps == 0 {
            return;
        }
        for (i, row) in self.hidden_output.data.iter().enumerate() {
            for (j, &delta) in row.iter().enumerate() {
                weights_hidden_output.add(i, j, delta);
            }
        }
        for (i, row) in self.input_hidden.data.iter().enumerate() {
            for (j, &delta) in row.iter().enumerate() {
                weights_input_hidden.add(i, j, delta);
            }
        }
    }
}
