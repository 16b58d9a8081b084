use ndarray::{Array2, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::error::{Result, SoftmaxErr};

/// Dense row-major matrix of `f64`.
///
/// On the wire (JSON) a matrix is a list of rows, e.g. `[[1.0, 0.0], [0.0, 1.0]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Entries drawn uniformly from [-scale, scale) using the given generator.
    pub fn random_scaled<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        scale: f64,
        rng: &mut R,
    ) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| (rng.gen::<f64>() * 2.0 - 1.0) * scale)
            .collect();

        Matrix { rows, cols, data }
    }

    /// Wraps a row-major buffer, checking that it holds exactly `rows * cols` values.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(SoftmaxErr::SizeMismatch {
                a: "matrix data",
                b: "rows * cols",
                got: data.len(),
                expected: rows * cols,
            });
        }

        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from nested rows. Rejects empty and ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(SoftmaxErr::EmptyMatrix);
        }

        let nrows = rows.len();
        let mut data = Vec::with_capacity(nrows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(SoftmaxErr::RaggedRows {
                    row: i,
                    got: row.len(),
                    expected: cols,
                });
            }
            data.extend(row);
        }

        Ok(Matrix {
            rows: nrows,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        *self.get_mut(i, j) = value;
    }

    /// The `i`-th row as a contiguous slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Zero-copy `ndarray` view over the same buffer.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        ArrayView2::from_shape((self.rows, self.cols), &self.data)
            .expect("matrix buffer always holds rows * cols values")
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Sum of squared entries.
    pub fn sum_squares(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// Largest absolute element-wise difference between two same-shaped matrices.
    pub fn max_abs_diff(&self, other: &Matrix) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(SoftmaxErr::SizeMismatch {
                a: "lhs entries",
                b: "rhs entries",
                got: other.data.len(),
                expected: self.data.len(),
            });
        }

        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }
}

impl From<Array2<f64>> for Matrix {
    fn from(value: Array2<f64>) -> Self {
        let (rows, cols) = value.dim();
        Matrix {
            rows,
            cols,
            data: value.iter().copied().collect(),
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = SoftmaxErr;

    fn try_from(value: Vec<Vec<f64>>) -> Result<Self> {
        Matrix::from_rows(value)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(value: Matrix) -> Self {
        if value.cols == 0 {
            return vec![Vec::new(); value.rows];
        }
        value.data.chunks(value.cols).map(<[f64]>::to_vec).collect()
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.shape() != rhs.shape() {
            panic!("Matrices are of incorrect sizes")
        }

        let data = self.data.iter().zip(&rhs.data).map(|(a, b)| a + b).collect();
        Matrix { data, ..self }
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.shape() != rhs.shape() {
            panic!("Matrices are of incorrect sizes")
        }

        let data = self.data.iter().zip(&rhs.data).map(|(a, b)| a - b).collect();
        Matrix { data, ..self }
    }
}
