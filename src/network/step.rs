/// Everything one training sample contributes: the forward activations and
/// the backpropagated deltas, all computed from the same weight reading.
///
/// Produced by `NeuralNet::compute_step` without touching the weights, then
/// turned into an update by `Sgd`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Post-sigmoid hidden activations.
    pub hidden: Vec<f64>,
    /// Post-sigmoid output activation.
    pub output: f64,
    /// `target - output`.
    pub error: f64,
    /// `error * σ'(output)`.
    pub output_delta: f64,
    /// `output_delta * W_ho[j][0] * σ'(hidden[j])`, one per hidden unit.
    pub hidden_deltas: Vec<f64>,
}

impl Step {
    pub fn squared_error(&self) -> f64 {
        self.error * self.error
    }
}
