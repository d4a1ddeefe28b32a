use serde::{Deserialize, Serialize};

/// Number of input features per sample.
pub const INPUT_NODES: usize = 11;
/// Width of the single hidden layer.
pub const HIDDEN_NODES: usize = 16;
/// The network always has exactly one output unit.
pub const OUTPUT_NODES: usize = 1;

/// Layer widths of the 3-layer network (input → hidden → single output).
///
/// Fixed for the lifetime of a `NeuralNet`; weight matrices are sized from
/// it once at construction and never resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub input_nodes: usize,
    pub hidden_nodes: usize,
}

impl Topology {
    pub fn new(input_nodes: usize, hidden_nodes: usize) -> Self {
        Topology { input_nodes, hidden_nodes }
    }

    /// Shape of the input→hidden weight matrix: (input, hidden).
    pub fn input_hidden_shape(&self) -> (usize, usize) {
        (self.input_nodes, self.hidden_nodes)
    }

    /// Shape of the hidden→output weight matrix: (hidden, 1).
    pub fn hidden_output_shape(&self) -> (usize, usize) {
        (self.hidden_nodes, OUTPUT_NODES)
    }

    pub fn param_count(&self) -> usize {
        self.input_nodes * self.hidden_nodes + self.hidden_nodes * OUTPUT_NODES
    }
}

impl Default for Topology {
    fn default() -> Self {
        Topology::new(INPUT_NODES, HIDDEN_NODES)
    }
}
