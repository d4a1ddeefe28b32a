pub mod sgd;

pub use sgd::{Sgd, SgdAccumulator, LEARNING_RATE};
