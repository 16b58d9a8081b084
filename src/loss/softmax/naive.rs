use log::debug;

use super::validate;
use crate::{error::Result, math::matrix::Matrix, math::stable::shifted_exps};

/// Softmax loss and gradient computed one example and one class at a time.
///
/// # Arguments
/// * `w` - Weights, `D x C`.
/// * `x` - Minibatch, `N x D`, one example per row.
/// * `y` - Labels, `y[i] = c` means `x[i]` belongs to class `c`.
/// * `reg` - L2 regularization strength.
///
/// # Returns
/// The mean loss (plus penalty) and the gradient with respect to `w`.
pub fn softmax_loss_naive(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
    let dims = validate(w.shape(), x.shape(), y, reg)?;
    let n = dims.num_train as f64;

    let mut loss = 0.0;
    let mut dw = Matrix::zeros(dims.dim, dims.num_classes);

    for (i, &label) in y.iter().enumerate() {
        let xi = x.row(i);

        // f = x[i] · W
        let mut f = vec![0.0; dims.num_classes];
        for (d, &xd) in xi.iter().enumerate() {
            for (j, fj) in f.iter_mut().enumerate() {
                *fj += xd * w.get(d, j);
            }
        }

        let (exps, sum) = shifted_exps(&f);
        let p = exps[label] / sum;
        loss -= p.ln();

        for (d, &xd) in xi.iter().enumerate() {
            *dw.get_mut(d, label) -= (1.0 - p) * xd;
        }

        for (j, &e) in exps.iter().enumerate() {
            if j == label {
                continue;
            }
            let pj = e / sum;
            for (d, &xd) in xi.iter().enumerate() {
                *dw.get_mut(d, j) += pj * xd;
            }
        }
    }

    loss /= n;
    loss += reg * w.sum_squares();

    let dw = dw.map(|g| g / n) + w.map(|v| 2.0 * reg * v);

    debug!(
        "naive softmax loss {loss:.6} over {} examples, {} classes",
        dims.num_train, dims.num_classes
    );

    Ok((loss, dw))
}
