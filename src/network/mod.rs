pub mod network;
pub mod step;
pub mod topology;

pub use network::NeuralNet;
pub use step::Step;
pub use topology::{Topology, HIDDEN_NODES, INPUT_NODES, OUTPUT_NODES};
