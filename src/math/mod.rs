pub mod matrix;
pub mod stable;
mod test;

pub use matrix::Matrix;
