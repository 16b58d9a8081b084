use ndarray::{Array2, ArrayView2, Axis};

/// Largest value in `row`, `-inf` when the row is empty.
pub fn row_max(row: &[f64]) -> f64 {
    row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Exponentials of `scores - max(scores)` and their sum.
///
/// Every exponent is <= 0 so nothing overflows, and the sum is at least 1
/// because the maximum contributes `exp(0)`.
pub fn shifted_exps(scores: &[f64]) -> (Vec<f64>, f64) {
    let max = row_max(scores);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum = exps.iter().sum();
    (exps, sum)
}

/// Subtracts each row's maximum from that row, in place.
pub fn shift_by_row_max(scores: &mut Array2<f64>) {
    for mut row in scores.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, &s| m.max(s));
        row.mapv_inplace(|s| s - max);
    }
}

/// Row-wise softmax of an `N x C` score matrix.
pub fn softmax_rows(scores: ArrayView2<f64>) -> Array2<f64> {
    let mut probs = scores.to_owned();
    shift_by_row_max(&mut probs);
    probs.mapv_inplace(f64::exp);

    let sums = probs.sum_axis(Axis(1)).insert_axis(Axis(1));
    probs /= &sums;
    probs
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn shifted_exps_tops_out_at_one() {
        let (exps, sum) = shifted_exps(&[1000.0, 999.0, 998.0]);

        assert_eq!(exps[0], 1.0);
        assert!(exps.iter().all(|e| e.is_finite()));
        assert!((sum - (1.0 + (-1.0f64).exp() + (-2.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn softmax_rows_sum_to_one_with_huge_scores() {
        let probs = softmax_rows(array![[1e4, -1e4, 0.0], [710.0, 709.0, 708.0]].view());

        for row in probs.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
            assert!(row.iter().all(|p| p.is_finite() && *p >= 0.0));
        }
    }

    #[test]
    fn shifting_a_row_leaves_softmax_unchanged() {
        let scores = array![[0.3, -1.2, 2.5], [4.0, 4.0, -3.0]];
        let mut shifted = scores.clone();
        shifted.row_mut(0).mapv_inplace(|s| s - 17.5);
        shifted.row_mut(1).mapv_inplace(|s| s + 300.0);

        let a = softmax_rows(scores.view());
        let b = softmax_rows(shifted.view());

        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn shift_by_row_max_zeroes_each_maximum() {
        let mut scores = array![[1.0, 0.0], [0.0, 1.0]];
        shift_by_row_max(&mut scores);

        assert_eq!(scores, array![[0.0, -1.0], [-1.0, 0.0]]);
    }
}
