pub mod error;
pub mod gradcheck;
pub mod loss;
pub mod math;
pub mod problem;

// Convenience re-exports
pub use error::{Result, SoftmaxErr};
pub use loss::softmax::{Dims, Strategy, softmax_loss_naive, softmax_loss_vectorized};
pub use math::matrix::Matrix;
pub use problem::SoftmaxProblem;
