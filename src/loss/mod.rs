pub mod softmax;

pub use softmax::{Strategy, softmax_loss_naive, softmax_loss_vectorized};
