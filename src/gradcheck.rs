//! Finite-difference checks for analytic gradients.
//!
//! Every estimate uses the symmetric difference
//! `(f(w + h·e) - f(w - h·e)) / 2h` for a single perturbed entry `e`.

use log::debug;
use rand::Rng;

use crate::{
    error::{Result, SoftmaxErr},
    math::matrix::Matrix,
};

/// Perturbation used when the caller has no better choice.
pub const DEFAULT_STEP: f64 = 1e-5;

/// One entry compared by [`grad_check_sparse`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheck {
    pub row: usize,
    pub col: usize,
    pub numerical: f64,
    pub analytic: f64,
    pub rel_error: f64,
}

/// `|a - b| / max(1e-8, |a| + |b|)`.
pub fn relative_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / (a.abs() + b.abs()).max(1e-8)
}

/// Symmetric-difference estimate of `∂f/∂w[row, col]`.
///
/// `w` is restored before returning, including on error.
fn partial<F>(f: &mut F, w: &mut Matrix, row: usize, col: usize, h: f64) -> Result<f64>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let old = w.get(row, col);

    w.set(row, col, old + h);
    let plus = f(&*w);
    w.set(row, col, old - h);
    let minus = f(&*w);
    w.set(row, col, old);

    Ok((plus? - minus?) / (2.0 * h))
}

/// Estimates the full gradient of `f` at `w`, one entry at a time.
pub fn numerical_gradient<F>(mut f: F, w: &Matrix, h: f64) -> Result<Matrix>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let mut probe = w.clone();
    let mut grad = Matrix::zeros(w.rows(), w.cols());

    for i in 0..w.rows() {
        for j in 0..w.cols() {
            grad.set(i, j, partial(&mut f, &mut probe, i, j, h)?);
        }
    }

    Ok(grad)
}

/// Compares `analytic` against finite differences at `num_checks` random entries.
///
/// # Arguments
/// * `f` - The scalar function, typically the loss with `X`, `y` and `reg` fixed.
/// * `w` - The point at which both gradients are taken.
/// * `analytic` - The gradient under test, same shape as `w`.
/// * `num_checks` - How many entries to sample (with replacement).
/// * `h` - Perturbation size.
/// * `rng` - Source for the sampled positions.
pub fn grad_check_sparse<F, R>(
    mut f: F,
    w: &Matrix,
    analytic: &Matrix,
    num_checks: usize,
    h: f64,
    rng: &mut R,
) -> Result<Vec<GradCheck>>
where
    F: FnMut(&Matrix) -> Result<f64>,
    R: Rng + ?Sized,
{
    if analytic.shape() != w.shape() {
        return Err(SoftmaxErr::SizeMismatch {
            a: "analytic gradient",
            b: "weights",
            got: analytic.rows() * analytic.cols(),
            expected: w.rows() * w.cols(),
        });
    }

    if w.rows() == 0 || w.cols() == 0 {
        return Err(SoftmaxErr::EmptyMatrix);
    }

    let mut probe = w.clone();
    let mut checks = Vec::with_capacity(num_checks);

    for _ in 0..num_checks {
        let row = rng.gen_range(0..w.rows());
        let col = rng.gen_range(0..w.cols());

        let numerical = partial(&mut f, &mut probe, row, col, h)?;
        let analytic = analytic.get(row, col);
        let rel_error = relative_error(numerical, analytic);

        debug!(
            "numerical: {numerical:.6e} analytic: {analytic:.6e}, relative error: {rel_error:.3e}"
        );

        checks.push(GradCheck {
            row,
            col,
            numerical,
            analytic,
            rel_error,
        });
    }

    Ok(checks)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn sum_of_cubes(w: &Matrix) -> Result<f64> {
        Ok(w.as_slice().iter().map(|v| v * v * v).sum())
    }

    #[test]
    fn relative_error_is_symmetric_and_bounded() {
        assert_eq!(relative_error(1.0, 1.0), 0.0);
        assert_eq!(relative_error(2.0, -1.0), relative_error(-1.0, 2.0));
        assert!(relative_error(1.0, -1.0) <= 1.0);
        assert_eq!(relative_error(0.0, 0.0), 0.0);
    }

    #[test]
    fn numerical_gradient_of_cubes() {
        let w = Matrix::from_rows(vec![vec![1.0, -2.0], vec![0.5, 3.0]]).unwrap();
        let grad = numerical_gradient(sum_of_cubes, &w, DEFAULT_STEP).unwrap();

        assert!(grad.max_abs_diff(&w.map(|v| 3.0 * v * v)).unwrap() < 1e-6);
    }

    #[test]
    fn sparse_check_flags_wrong_gradient() {
        let w = Matrix::from_rows(vec![vec![1.0, -2.0, 0.25]]).unwrap();
        let right = w.map(|v| 3.0 * v * v);
        let wrong = w.map(|v| 2.0 * v);
        let mut rng = StdRng::seed_from_u64(7);

        let good = grad_check_sparse(sum_of_cubes, &w, &right, 10, DEFAULT_STEP, &mut rng).unwrap();
        assert_eq!(good.len(), 10);
        assert!(good.iter().all(|c| c.rel_error < 1e-6));

        let bad = grad_check_sparse(sum_of_cubes, &w, &wrong, 10, DEFAULT_STEP, &mut rng).unwrap();
        assert!(bad.iter().any(|c| c.rel_error > 1e-2));
    }

    #[test]
    fn sparse_check_rejects_misshaped_gradient() {
        let w = Matrix::zeros(2, 2);
        let mut rng = StdRng::seed_from_u64(0);

        let err = grad_check_sparse(sum_of_cubes, &w, &Matrix::zeros(2, 3), 1, 1e-5, &mut rng);
        assert!(matches!(err, Err(SoftmaxErr::SizeMismatch { .. })));
    }

    #[test]
    fn failing_function_leaves_point_untouched() {
        let w = Matrix::from_rows(vec![vec![1.0]]).unwrap();
        let mut probe = w.clone();
        let mut calls = 0;
        let mut f = |_: &Matrix| {
            calls += 1;
            if calls == 1 {
                Err(SoftmaxErr::EmptyBatch)
            } else {
                Ok(0.0)
            }
        };

        assert!(partial(&mut f, &mut probe, 0, 0, 0.1).is_err());
        assert_eq!(probe, w);
    }
}
