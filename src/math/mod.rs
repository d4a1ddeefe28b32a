pub mod atomic_matrix;
pub mod matrix;

pub use atomic_matrix::AtomicMatrix;
pub use matrix::Matrix;
