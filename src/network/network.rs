use rand::Rng;

use crate::activation::{sigmoid, sigmoid_derivative};
use crate::errors::NetError;
use crate::math::{AtomicMatrix, Matrix};
use crate::network::step::Step;
use crate::network::topology::Topology;
use crate::optim::{Sgd, SgdAccumulator};

/// Fully-connected `input → hidden → 1` network with sigmoid activations and
/// no bias terms, trained one sample at a time.
///
/// Weights live in `AtomicMatrix` cells so `train` takes `&self` and may run
/// on many threads at once without locking (Hogwild-style). Concurrent calls
/// read weights that other in-flight calls are partway through updating;
/// results then depend on scheduling. Single-threaded use is deterministic.
#[derive(Debug)]
pub struct NeuralNet {
    topology: Topology,
    optimizer: Sgd,
    weights_input_hidden: AtomicMatrix,
    weights_hidden_output: AtomicMatrix,
}

impl NeuralNet {
    /// Draws every weight independently from U[-1, 1]: all of `W_ih`
    /// row-major first, then `W_ho`.
    pub fn new<R: Rng + ?Sized>(topology: Topology, optimizer: Sgd, rng: &mut R) -> NeuralNet {
        let (ih_rows, ih_cols) = topology.input_hidden_shape();
        let (ho_rows, ho_cols) = topology.hidden_output_shape();
        let input_hidden = Matrix::random_uniform(ih_rows, ih_cols, rng);
        let hidden_output = Matrix::random_uniform(ho_rows, ho_cols, rng);

        NeuralNet {
            topology,
            optimizer,
            weights_input_hidden: AtomicMatrix::from_matrix(&input_hidden),
            weights_hidden_output: AtomicMatrix::from_matrix(&hidden_output),
        }
    }

    /// Builds a network from explicit weights, checking both shapes against
    /// `topology`.
    pub fn from_weights(
        topology: Topology,
        optimizer: Sgd,
        input_hidden: Matrix,
        hidden_output: Matrix,
    ) -> Result<NeuralNet, NetError> {
        check_shape("W_ih", &input_hidden, topology.input_hidden_shape())?;
        check_shape("W_ho", &hidden_output, topology.hidden_output_shape())?;

        Ok(NeuralNet {
            topology,
            optimizer,
            weights_input_hidden: AtomicMatrix::from_matrix(&input_hidden),
            weights_hidden_output: AtomicMatrix::from_matrix(&hidden_output),
        })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn optimizer(&self) -> Sgd {
        self.optimizer
    }

    fn forward_hidden(&self, sample: &[f64]) -> Vec<f64> {
        (0..self.topology.hidden_nodes)
            .map(|j| {
                let mut z = 0.0;
                for (i, &x) in sample.iter().enumerate() {
                    z += x * self.weights_input_hidden.get(i, j);
                }
                sigmoid(z)
            })
            .collect()
    }

    fn forward_output(&self, hidden: &[f64]) -> f64 {
        let mut z = 0.0;
        for (j, &h) in hidden.iter().enumerate() {
            z += h * self.weights_hidden_output.get(j, 0);
        }
        sigmoid(z)
    }

    /// Forward pass only.
    pub fn predict(&self, sample: &[f64]) -> f64 {
        debug_assert_eq!(sample.len(), self.topology.input_nodes);
        let hidden = self.forward_hidden(sample);
        self.forward_output(&hidden)
    }

    /// Forward pass, error and deltas for one sample. Does not touch weights.
    pub fn compute_step(&self, sample: &[f64], target: f64) -> Step {
        debug_assert_eq!(sample.len(), self.topology.input_nodes);

        let hidden = self.forward_hidden(sample);
        let output = self.forward_output(&hidden);

        let error = target - output;
        let output_delta = error * sigmoid_derivative(output);

        let hidden_deltas = hidden
            .iter()
            .enumerate()
            .map(|(i, &h)| output_delta * self.weights_hidden_output.get(i, 0) * sigmoid_derivative(h))
            .collect();

        Step {
            hidden,
            output,
            error,
            output_delta,
            hidden_deltas,
        }
    }

    /// Applies a step previously computed for `sample`.
    pub fn apply_step(&self, sample: &[f64], step: &Step) {
        self.optimizer.step(
            &self.weights_input_hidden,
            &self.weights_hidden_output,
            sample,
            step,
        );
    }

    /// Applies a batch of summed steps in one go.
    pub fn apply_accumulated(&self, accumulator: &SgdAccumulator) {
        accumulator.apply(&self.weights_input_hidden, &self.weights_hidden_output);
    }

    /// One online SGD step on `(sample, target)`. Returns the squared error
    /// measured before the update.
    pub fn train(&self, sample: &[f64], target: f64) -> f64 {
        let step = self.compute_step(sample, target);
        self.apply_step(sample, &step);
        step.squared_error()
    }

    pub fn weights_input_hidden(&self) -> Matrix {
        self.weights_input_hidden.snapshot()
    }

    pub fn weights_hidden_output(&self) -> Matrix {
        self.weights_hidden_output.snapshot()
    }
}

fn check_shape(name: &'static str, m: &Matrix, expected: (usize, usize)) -> Result<(), NetError> {
    if !m.is_rectangular() {
        return Err(NetError::Ragged { name });
    }
    if m.shape() != expected {
        return Err(NetError::ShapeMismatch {
            name,
            expected,
            actual: m.shape(),
        });
    }
    Ok(())
}
