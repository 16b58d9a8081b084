//! Softmax cross-entropy loss of a linear classifier `scores = X · W`, plus
//! its gradient with respect to `W` and an L2 penalty `reg * sum(W²)`.
//!
//! Two implementations compute the same thing:
//! - [`softmax_loss_naive`] walks examples and classes one at a time.
//! - [`softmax_loss_vectorized`] expresses the whole batch as `ndarray` products.
//!
//! Both subtract each score row's maximum before exponentiating and agree to
//! within floating-point tolerance.

mod naive;
mod vectorized;

use log::trace;

use crate::{
    error::{Result, SoftmaxErr},
    math::matrix::Matrix,
};

pub use naive::softmax_loss_naive;
pub use vectorized::softmax_loss_vectorized;

/// Batch size, feature dimension and class count of a validated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub num_train: usize,
    pub dim: usize,
    pub num_classes: usize,
}

/// Checks the shapes, labels and regularization strength of a call.
///
/// # Arguments
/// * `w_shape` - `(D, C)` of the weights.
/// * `x_shape` - `(N, D)` of the feature batch.
/// * `y` - One label per example, each in `[0, C)`.
/// * `reg` - L2 strength, finite and non-negative.
///
/// # Returns
/// The dimensions of the problem, or the first violated precondition.
pub fn validate(
    w_shape: (usize, usize),
    x_shape: (usize, usize),
    y: &[usize],
    reg: f64,
) -> Result<Dims> {
    let (dim, num_classes) = w_shape;
    let (num_train, x_dim) = x_shape;

    if x_dim != dim {
        return Err(SoftmaxErr::SizeMismatch {
            a: "X columns",
            b: "W rows",
            got: x_dim,
            expected: dim,
        });
    }

    if y.len() != num_train {
        return Err(SoftmaxErr::SizeMismatch {
            a: "labels",
            b: "X rows",
            got: y.len(),
            expected: num_train,
        });
    }

    if num_train == 0 {
        return Err(SoftmaxErr::EmptyBatch);
    }

    if dim == 0 || num_classes == 0 {
        return Err(SoftmaxErr::EmptyMatrix);
    }

    if let Some((index, &label)) = y.iter().enumerate().find(|&(_, &l)| l >= num_classes) {
        return Err(SoftmaxErr::LabelOutOfRange {
            index,
            label,
            classes: num_classes,
        });
    }

    if !reg.is_finite() || reg < 0.0 {
        return Err(SoftmaxErr::InvalidRegularization(reg));
    }

    trace!("validated softmax inputs: N={num_train} D={dim} C={num_classes}");

    Ok(Dims {
        num_train,
        dim,
        num_classes,
    })
}

/// Which implementation computes the loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Naive,
    #[default]
    Vectorized,
}

impl Strategy {
    /// Runs this strategy on boundary `Matrix` inputs.
    pub fn compute(&self, w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
        match self {
            Strategy::Naive => softmax_loss_naive(w, x, y, reg),
            Strategy::Vectorized => {
                let (loss, dw) = softmax_loss_vectorized(w.view(), x.view(), y, reg)?;
                Ok((loss, dw.into()))
            }
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "naive" => Ok(Strategy::Naive),
            "vectorized" => Ok(Strategy::Vectorized),
            other => Err(format!("unknown strategy {other:?}, use naive or vectorized")),
        }
    }
}
