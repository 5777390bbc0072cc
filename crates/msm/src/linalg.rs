//! Dense linear algebra helpers for the small matrices of gating models.
//!
//! Chains here have a handful of states, so plain Gaussian elimination
//! with partial pivoting is both sufficient and dependency-free.
//!
//! **Not part of the public API.**

use ndarray::{Array2, ArrayView2};

use crate::error::MsmError;

/// Returns the induced 1-norm (maximum absolute column sum).
pub(crate) fn norm_1(a: ArrayView2<f64>) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Returns the largest absolute entry, or 0.0 for an empty matrix.
pub(crate) fn max_abs(a: ArrayView2<f64>) -> f64 {
    a.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

/// Solves `A X = B` for `X` using LU decomposition with partial pivoting.
///
/// `A` must be square with `A.nrows() == B.nrows()`. A pivot smaller than
/// `n * eps * max|A|` is treated as singular.
pub(crate) fn lu_solve(a: ArrayView2<f64>, b: ArrayView2<f64>) -> Result<Array2<f64>, MsmError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(MsmError::NotSquare {
            rows: n,
            cols: a.ncols(),
        });
    }
    if b.nrows() != n {
        return Err(MsmError::ShapeMismatch {
            what: "right-hand side rows".to_string(),
            expected: n,
            got: b.nrows(),
        });
    }

    let mut lu = a.to_owned();
    let mut x = b.to_owned();
    let m = x.ncols();
    let threshold = n as f64 * f64::EPSILON * max_abs(a);

    for k in 0..n {
        // Partial pivoting: largest magnitude in column k at or below the diagonal.
        let mut p = k;
        let mut best = lu[[k, k]].abs();
        for i in (k + 1)..n {
            let v = lu[[i, k]].abs();
            if v > best {
                best = v;
                p = i;
            }
        }
        if best <= threshold || best == 0.0 {
            return Err(MsmError::SingularSystem { pivot: k });
        }
        if p != k {
            for j in 0..n {
                lu.swap([k, j], [p, j]);
            }
            for j in 0..m {
                x.swap([k, j], [p, j]);
            }
        }

        let pivot = lu[[k, k]];
        for i in (k + 1)..n {
            let factor = lu[[i, k]] / pivot;
            if factor == 0.0 {
                continue;
            }
            lu[[i, k]] = 0.0;
            for j in (k + 1)..n {
                lu[[i, j]] -= factor * lu[[k, j]];
            }
            for j in 0..m {
                x[[i, j]] -= factor * x[[k, j]];
            }
        }
    }

    // Back substitution on the upper-triangular factor.
    for j in 0..m {
        for i in (0..n).rev() {
            let mut s = x[[i, j]];
            for k in (i + 1)..n {
                s -= lu[[i, k]] * x[[k, j]];
            }
            x[[i, j]] = s / lu[[i, i]];
        }
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn norm_1_is_max_column_sum() {
        let a = array![[1.0, -2.0], [-3.0, 0.5]];
        assert_abs_diff_eq!(norm_1(a.view()), 4.0, epsilon = 1e-15);
    }

    #[test]
    fn lu_solve_needs_pivoting() {
        // Zero in the leading position forces a row swap.
        let a = array![[0.0, 1.0], [2.0, 1.0]];
        let b = array![[1.0], [3.0]];
        let x = lu_solve(a.view(), b.view()).unwrap();
        assert_abs_diff_eq!(x[[0, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[[1, 0]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn lu_solve_matrix_rhs_gives_inverse() {
        let a = array![[4.0, 7.0, 2.0], [3.0, 6.0, 1.0], [2.0, 5.0, 3.0]];
        let eye = Array2::eye(3);
        let inv = lu_solve(a.view(), eye.view()).unwrap();
        let prod = a.dot(&inv);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(prod[[i, j]], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn lu_solve_singular() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let b = array![[1.0], [1.0]];
        assert!(matches!(
            lu_solve(a.view(), b.view()),
            Err(MsmError::SingularSystem { pivot: 1 })
        ));
    }

    #[test]
    fn lu_solve_rhs_mismatch() {
        let a = Array2::<f64>::eye(3);
        let b = Array2::<f64>::zeros((2, 1));
        assert!(matches!(
            lu_solve(a.view(), b.view()),
            Err(MsmError::ShapeMismatch { expected: 3, got: 2, .. })
        ));
    }
}
