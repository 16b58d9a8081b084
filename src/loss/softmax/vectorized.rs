use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

use super::validate;
use crate::{error::Result, math::stable::softmax_rows};

/// Softmax loss and gradient computed on the whole batch at once.
///
/// Inputs and outputs match [`super::softmax_loss_naive`], only as `ndarray`
/// views and arrays.
///
/// The gradient is assembled from two `N x C` masks:
/// - `loss_mask`: the softmax probabilities with each true-class entry zeroed.
/// - `corr_mask`: `1 - p_true` at each true-class entry, zero elsewhere.
///
/// so that `dW = (Xᵀ · loss_mask - Xᵀ · corr_mask) / N + 2 · reg · W`.
pub fn softmax_loss_vectorized(
    w: ArrayView2<f64>,
    x: ArrayView2<f64>,
    y: &[usize],
    reg: f64,
) -> Result<(f64, Array2<f64>)> {
    let dims = validate(w.dim(), x.dim(), y, reg)?;
    let n = dims.num_train as f64;
    let labels = ArrayView1::from(y);

    let scores = x.dot(&w);
    let mut loss_mask = softmax_rows(scores.view());

    let p_true: Array1<f64> = Zip::from(loss_mask.rows())
        .and(&labels)
        .map_collect(|row, &label| row[label]);

    let mut loss = -p_true.mapv(f64::ln).sum() / n;
    loss += reg * w.mapv(|v| v * v).sum();

    let mut corr_mask = Array2::<f64>::zeros(loss_mask.raw_dim());
    Zip::from(loss_mask.rows_mut())
        .and(corr_mask.rows_mut())
        .and(&labels)
        .and(&p_true)
        .for_each(|mut probs, mut corr, &label, &p| {
            probs[label] = 0.0;
            corr[label] = 1.0 - p;
        });

    let xt = x.t();
    let mut dw = xt.dot(&loss_mask) - xt.dot(&corr_mask);
    dw /= n;
    dw.scaled_add(2.0 * reg, &w);

    debug!(
        "vectorized softmax loss {loss:.6} over {} examples, {} classes",
        dims.num_train, dims.num_classes
    );

    Ok((loss, dw))
}
