//! Matrix exponential by scaling and squaring with a degree-13 Padé approximant.
//!
//! Follows Higham, "The Scaling and Squaring Method for the Matrix
//! Exponential Revisited", SIAM J. Matrix Anal. Appl. 26(4), 2005:
//!
//! ```text
//! s    = max(0, ceil(log2(‖A‖₁ / θ₁₃)))
//! A'   = A / 2^s
//! r₁₃  = (V - U)⁻¹ (V + U)       U odd, V even in A'
//! e^A  = r₁₃^(2^s)
//! ```

use ndarray::{Array2, ArrayView2};

use crate::error::MsmError;
use crate::linalg::{lu_solve, norm_1};

/// Largest 1-norm for which the unscaled degree-13 approximant is accurate
/// to double precision.
const THETA_13: f64 = 5.371_920_351_148_152;

/// Padé(13) numerator coefficients `b₀ … b₁₃`.
const PADE_13: [f64; 14] = [
    64_764_752_532_480_000.0,
    32_382_376_266_240_000.0,
    7_771_770_303_897_600.0,
    1_187_353_796_428_800.0,
    129_060_195_264_000.0,
    10_559_470_521_600.0,
    670_442_572_800.0,
    33_522_128_640.0,
    1_323_241_920.0,
    40_840_800.0,
    960_960.0,
    16_380.0,
    182.0,
    1.0,
];

/// Computes `exp(A)` for a square matrix.
///
/// # Errors
///
/// Returns [`MsmError::EmptyMatrix`] or [`MsmError::NotSquare`] for malformed
/// input, [`MsmError::NonFiniteData`] if any entry is NaN or infinite, and
/// [`MsmError::SingularSystem`] if the Padé denominator cannot be inverted.
pub fn expm(a: ArrayView2<f64>) -> Result<Array2<f64>, MsmError> {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return Err(MsmError::EmptyMatrix);
    }
    if rows != cols {
        return Err(MsmError::NotSquare { rows, cols });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(MsmError::NonFiniteData);
    }

    let n = rows;
    let norm = norm_1(a);
    let s = if norm > THETA_13 {
        (norm / THETA_13).log2().ceil().max(0.0) as i32
    } else {
        0
    };
    let scaled = a.mapv(|v| v / 2f64.powi(s));

    let b = &PADE_13;
    let ident = Array2::<f64>::eye(n);
    let a2 = scaled.dot(&scaled);
    let a4 = a2.dot(&a2);
    let a6 = a4.dot(&a2);

    let u_inner = &a6 * b[13] + &a4 * b[11] + &a2 * b[9];
    let u_tail = &a6 * b[7] + &a4 * b[5] + &a2 * b[3] + &ident * b[1];
    let u = scaled.dot(&(a6.dot(&u_inner) + u_tail));

    let v_inner = &a6 * b[12] + &a4 * b[10] + &a2 * b[8];
    let v = a6.dot(&v_inner) + &a6 * b[6] + &a4 * b[4] + &a2 * b[2] + &ident * b[0];

    let numer = &v + &u;
    let denom = &v - &u;
    let mut r = lu_solve(denom.view(), numer.view())?;

    for _ in 0..s {
        r = r.dot(&r);
    }
    Ok(r)
}
