#![cfg(test)]

use ndarray::array;

use super::matrix::Matrix;
use crate::error::SoftmaxErr;

#[test]
fn from_rows_is_row_major() {
    let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    assert_eq!(m.get(0, 2), 3.0);
}

#[test]
fn from_rows_rejects_ragged_and_empty() {
    let ragged = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
    assert!(matches!(
        ragged,
        Err(SoftmaxErr::RaggedRows {
            row: 1,
            got: 1,
            expected: 2
        })
    ));

    assert!(matches!(
        Matrix::from_rows(vec![]),
        Err(SoftmaxErr::EmptyMatrix)
    ));
    assert!(matches!(
        Matrix::from_rows(vec![vec![]]),
        Err(SoftmaxErr::EmptyMatrix)
    ));
}

#[test]
fn from_vec_checks_length() {
    assert!(Matrix::from_vec(2, 2, vec![0.0; 3]).is_err());
    assert!(Matrix::from_vec(2, 2, vec![0.0; 4]).is_ok());
}

#[test]
fn view_and_from_array_agree() {
    let a = array![[1.0, -2.0], [0.5, 4.0], [3.0, 0.0]];
    let m = Matrix::from(a.clone());

    assert_eq!(m.view(), a.view());

    // column-major source keeps logical order
    let m_t = Matrix::from(a.t().to_owned());
    assert_eq!(m_t.shape(), (2, 3));
    assert_eq!(m_t.row(0), &[1.0, 0.5, 3.0]);
    assert_eq!(m_t.view(), a.t());
}

#[test]
fn arithmetic_and_reductions() {
    let a = Matrix::from_rows(vec![vec![1.0, -2.0], vec![3.0, 0.5]]).unwrap();
    let b = a.map(|v| v * 2.0);

    assert_eq!(a.sum_squares(), 1.0 + 4.0 + 9.0 + 0.25);
    assert_eq!(b.clone() - a.clone(), a);
    assert_eq!(a.clone() + a.clone(), b);
    assert_eq!(a.max_abs_diff(&b).unwrap(), 3.0);
    assert!(a.max_abs_diff(&Matrix::zeros(1, 2)).is_err());
}

#[test]
fn random_scaled_stays_in_range() {
    let m = Matrix::random_scaled(10, 10, 0.01, &mut rand::thread_rng());
    assert!(m.as_slice().iter().all(|v| v.abs() <= 0.01));
    assert_eq!(m.shape(), (10, 10));
}

#[test]
fn set_and_get_mut() {
    let mut m = Matrix::zeros(2, 2);
    m.set(1, 0, 7.0);
    *m.get_mut(0, 1) += 2.5;

    assert_eq!(m.get(1, 0), 7.0);
    assert_eq!(m.get(0, 1), 2.5);
    assert_eq!(m.rows(), 2);
    assert_eq!(m.cols(), 2);
}
