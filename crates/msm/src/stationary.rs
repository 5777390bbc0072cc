//! Stationary distributions of transition matrices.
//!
//! The coarse-graining projector only needs "the stationary distribution
//! of T"; [`StationarySolver`] is the seam where a caller can plug in its
//! own method. Two solvers ship with the crate:
//!
//! | Solver | Method | Notes |
//! |--------|--------|-------|
//! | [`DirectSolver`] | LU solve of `πᵗ(T − I) = 0`, `Σπ = 1` | Default, exact up to rounding |
//! | [`PowerSolver`] | Left power iteration | Requires an aperiodic chain |

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::MsmError;
use crate::linalg::lu_solve;
use crate::matrix::{DEFAULT_TOLERANCE, TransitionMatrix};

/// Computes the stationary distribution of an irreducible transition matrix.
pub trait StationarySolver {
    /// Returns the probability vector `π` with `πᵗ T = πᵗ` and `Σπ = 1`.
    ///
    /// # Errors
    ///
    /// Returns [`MsmError::StationaryFailed`] if no unique distribution can be
    /// found (e.g. the chain is reducible).
    fn stationary_distribution(&self, t: &TransitionMatrix) -> Result<Array1<f64>, MsmError>;
}

/// Direct linear solve for `π`.
///
/// Replaces the last balance equation of `(Tᵗ − I) π = 0` with the
/// normalization `Σπ = 1`. Partial pivoting in the LU decomposition picks
/// the best-conditioned equations when the eigenvalue-1 eigenspace is
/// numerically close to degenerate.
#[derive(Debug, Clone, Copy)]
pub struct DirectSolver {
    tol: f64,
}

impl DirectSolver {
    /// Creates a solver that tolerates negative components down to `-1e-8`.
    pub fn new() -> Self {
        Self {
            tol: DEFAULT_TOLERANCE,
        }
    }

    /// Sets how negative a component may be before the result is rejected.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Returns the negative-component tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tol
    }
}

impl Default for DirectSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StationarySolver for DirectSolver {
    fn stationary_distribution(&self, t: &TransitionMatrix) -> Result<Array1<f64>, MsmError> {
        let n = t.n_states();
        if n == 1 {
            return Ok(Array1::ones(1));
        }

        let mut a = t.as_array().t().to_owned();
        for i in 0..n {
            a[[i, i]] -= 1.0;
        }
        a.row_mut(n - 1).fill(1.0);
        let mut b = Array2::<f64>::zeros((n, 1));
        b[[n - 1, 0]] = 1.0;

        let x = lu_solve(a.view(), b.view()).map_err(|e| MsmError::StationaryFailed {
            reason: format!("chain is not irreducible ({e})"),
        })?;
        let pi = x.column(0).to_owned();
        clean_distribution(pi, self.tol)
    }
}

/// Left power iteration `πₖ₊₁ = πₖ T` from the uniform distribution.
#[derive(Debug, Clone, Copy)]
pub struct PowerSolver {
    max_iter: usize,
    tol: f64,
}

impl PowerSolver {
    /// Creates a solver with `max_iter = 100_000` and an L1 step tolerance of `1e-14`.
    pub fn new() -> Self {
        Self {
            max_iter: 100_000,
            tol: 1e-14,
        }
    }

    /// Sets the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the L1 convergence tolerance between successive iterates.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }
}

impl Default for PowerSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StationarySolver for PowerSolver {
    fn stationary_distribution(&self, t: &TransitionMatrix) -> Result<Array1<f64>, MsmError> {
        let n = t.n_states();
        let mut pi = Array1::from_elem(n, 1.0 / n as f64);
        for iter in 0..self.max_iter {
            let mut next = pi.dot(t.as_array());
            let total = next.sum();
            next /= total;
            let step: f64 = (&next - &pi).iter().map(|d| d.abs()).sum();
            pi = next;
            if step < self.tol {
                debug!(iterations = iter + 1, "power iteration converged");
                return clean_distribution(pi, DEFAULT_TOLERANCE);
            }
        }
        Err(MsmError::StationaryFailed {
            reason: format!("power iteration did not converge in {} steps", self.max_iter),
        })
    }
}

/// Returns the stationary distribution using [`DirectSolver`].
///
/// # Errors
///
/// See [`StationarySolver::stationary_distribution`].
pub fn stationary_distribution(t: &TransitionMatrix) -> Result<Array1<f64>, MsmError> {
    DirectSolver::new().stationary_distribution(t)
}

/// Clamps round-off negatives to zero and renormalizes.
fn clean_distribution(mut pi: Array1<f64>, tol: f64) -> Result<Array1<f64>, MsmError> {
    if pi.iter().any(|v| !v.is_finite()) {
        return Err(MsmError::StationaryFailed {
            reason: "solution contains non-finite values".to_string(),
        });
    }
    if let Some((i, &v)) = pi.iter().enumerate().find(|&(_, &v)| v < -tol) {
        return Err(MsmError::StationaryFailed {
            reason: format!("component {i} = {v} is negative"),
        });
    }
    pi.mapv_inplace(|v| v.max(0.0));
    let total = pi.sum();
    if total <= 0.0 {
        return Err(MsmError::StationaryFailed {
            reason: "solution has zero mass".to_string(),
        });
    }
    pi /= total;
    Ok(pi)
}
