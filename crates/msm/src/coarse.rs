//! Stationary-weighted coarse graining of transition matrices.
//!
//! Projects a fine transition matrix `T` (n×n) onto `m` coarse states given
//! a membership matrix `χ` (n×m):
//!
//! ```text
//! T_c = D_c⁻¹ · χᵗ · D_π · T · χ,     D_π = diag(π),  D_c = diag(χᵗ π)
//! ```
//!
//! This is Eq. 14 of Röblitz & Weber, Adv. Data Anal. Classif. 7 (2013)
//! 147–179. The coarse chain's stationary distribution is exactly `χᵗ π`,
//! and reversibility of `T` with respect to `π` carries over.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::{debug, warn};

use crate::error::MsmError;
use crate::matrix::{DEFAULT_TOLERANCE, TransitionMatrix};
use crate::stationary::{DirectSolver, StationarySolver};

/// Cluster weight at or below which projection fails. Only a cluster with
/// no stationary mass at all is degenerate by default.
pub const DEFAULT_MIN_CLUSTER_WEIGHT: f64 = 0.0;

/// Projects transition matrices onto coarse states.
///
/// The stationary distribution of the fine matrix comes from the injected
/// solver `S`.
///
/// # Example
///
/// ```
/// use kgate_msm::{CoarseGrainer, DirectSolver, TransitionMatrix, crisp_membership};
/// use ndarray::array;
///
/// let t = TransitionMatrix::new(array![
///     [0.8, 0.1, 0.1],
///     [0.2, 0.7, 0.1],
///     [0.1, 0.1, 0.8],
/// ]).unwrap();
/// let chi = crisp_membership(&[0, 0, 1], 2).unwrap();
/// let coarse = CoarseGrainer::new(DirectSolver::new()).project(&t, chi.view()).unwrap();
/// assert_eq!(coarse.dim(), (2, 2));
/// ```
#[derive(Debug, Clone)]
pub struct CoarseGrainer<S = DirectSolver> {
    solver: S,
    min_cluster_weight: f64,
}

impl<S: StationarySolver> CoarseGrainer<S> {
    /// Creates a projector around `solver`.
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            min_cluster_weight: DEFAULT_MIN_CLUSTER_WEIGHT,
        }
    }

    /// Sets the weight at or below which a cluster is reported as degenerate.
    ///
    /// Raising it above zero rejects clusters whose weight is positive but
    /// too small to trust for the caller's purposes.
    pub fn with_min_cluster_weight(mut self, weight: f64) -> Self {
        self.min_cluster_weight = weight;
        self
    }

    /// Returns the degenerate-cluster threshold.
    pub fn min_cluster_weight(&self) -> f64 {
        self.min_cluster_weight
    }

    /// Returns the injected stationary solver.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Computes the coarse transition matrix of `t` under membership `chi`.
    ///
    /// `chi` is not required to be row-stochastic; if it is not, a warning is
    /// logged and the result is returned as computed so the caller can
    /// inspect it.
    ///
    /// # Errors
    ///
    /// Returns [`MsmError::ShapeMismatch`] if `chi` does not have one row per
    /// fine state or has no columns, any error from the stationary solver,
    /// and [`MsmError::DegenerateCluster`] if a cluster's stationary weight is
    /// not above the threshold.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(n_fine = t.n_states(), n_coarse = chi.ncols())
    )]
    pub fn project(
        &self,
        t: &TransitionMatrix,
        chi: ArrayView2<f64>,
    ) -> Result<Array2<f64>, MsmError> {
        check_membership_shape(t.n_states(), chi)?;
        let pi = self.solver.stationary_distribution(t)?;
        self.project_with_stationary(t, chi, pi.view())
    }

    /// Like [`project`](Self::project) but with a caller-supplied stationary
    /// distribution `pi` of `t`.
    ///
    /// # Errors
    ///
    /// As [`project`](Self::project), plus [`MsmError::ShapeMismatch`] if
    /// `pi` has the wrong length.
    pub fn project_with_stationary(
        &self,
        t: &TransitionMatrix,
        chi: ArrayView2<f64>,
        pi: ArrayView1<f64>,
    ) -> Result<Array2<f64>, MsmError> {
        let n = t.n_states();
        check_membership_shape(n, chi)?;
        if pi.len() != n {
            return Err(MsmError::ShapeMismatch {
                what: "stationary distribution".to_string(),
                expected: n,
                got: pi.len(),
            });
        }
        if let Err(e) = check_membership(chi, DEFAULT_TOLERANCE) {
            warn!(error = %e, "membership matrix is not row-stochastic; projecting anyway");
        }

        // D_c = diag(χᵗ π), checked before anything is divided by it.
        let weights = cluster_weights(chi, pi);
        for (cluster, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight <= self.min_cluster_weight {
                return Err(MsmError::DegenerateCluster { cluster, weight });
            }
        }

        // χᵗ D_π, built by scaling row i of χ by π_i.
        let mut weighted = chi.to_owned();
        for (mut row, &p) in weighted.rows_mut().into_iter().zip(pi.iter()) {
            row *= p;
        }
        let mut coarse = weighted.t().dot(t.as_array()).dot(&chi);
        for (mut row, &w) in coarse.rows_mut().into_iter().zip(weights.iter()) {
            row /= w;
        }

        debug!(weights = ?weights.to_vec(), "coarse transition matrix computed");
        Ok(coarse)
    }
}

impl Default for CoarseGrainer<DirectSolver> {
    fn default() -> Self {
        Self::new(DirectSolver::new())
    }
}

/// Projects `t` onto coarse states with the default [`DirectSolver`].
///
/// # Errors
///
/// See [`CoarseGrainer::project`].
pub fn coarse_grain(t: &TransitionMatrix, chi: ArrayView2<f64>) -> Result<Array2<f64>, MsmError> {
    CoarseGrainer::new(DirectSolver::new()).project(t, chi)
}

/// Returns the coarse stationary weights `χᵗ π`.
pub fn cluster_weights(chi: ArrayView2<f64>, pi: ArrayView1<f64>) -> Array1<f64> {
    chi.t().dot(&pi)
}

/// Builds a crisp (one-hot) membership matrix from a cluster assignment per
/// fine state.
///
/// # Errors
///
/// Returns [`MsmError::InvalidMembership`] if `n_clusters` is zero or any
/// assignment is `>= n_clusters`.
pub fn crisp_membership(assignment: &[usize], n_clusters: usize) -> Result<Array2<f64>, MsmError> {
    if n_clusters == 0 {
        return Err(MsmError::InvalidMembership {
            reason: "at least one cluster is required".to_string(),
        });
    }
    let mut chi = Array2::zeros((assignment.len(), n_clusters));
    for (state, &cluster) in assignment.iter().enumerate() {
        if cluster >= n_clusters {
            return Err(MsmError::InvalidMembership {
                reason: format!(
                    "state {state} assigned to cluster {cluster}, but only {n_clusters} clusters exist"
                ),
            });
        }
        chi[[state, cluster]] = 1.0;
    }
    Ok(chi)
}

/// Validates a crisp or fuzzy membership matrix.
///
/// Entries must be finite and in `[-tol, 1 + tol]`; rows must sum to 1
/// within `tol`.
///
/// # Errors
///
/// Returns [`MsmError::InvalidMembership`] naming the first violation.
pub fn check_membership(chi: ArrayView2<f64>, tol: f64) -> Result<(), MsmError> {
    for (i, row) in chi.rows().into_iter().enumerate() {
        for (j, &c) in row.iter().enumerate() {
            if !c.is_finite() || c < -tol || c > 1.0 + tol {
                return Err(MsmError::InvalidMembership {
                    reason: format!("chi[{i}][{j}] = {c} is outside [0, 1]"),
                });
            }
        }
        let sum = row.sum();
        if (sum - 1.0).abs() > tol {
            return Err(MsmError::InvalidMembership {
                reason: format!("row {i} sums to {sum}, expected ~1.0"),
            });
        }
    }
    Ok(())
}

fn check_membership_shape(n: usize, chi: ArrayView2<f64>) -> Result<(), MsmError> {
    if chi.nrows() != n {
        return Err(MsmError::ShapeMismatch {
            what: "membership rows".to_string(),
            expected: n,
            got: chi.nrows(),
        });
    }
    if chi.ncols() == 0 {
        return Err(MsmError::ShapeMismatch {
            what: "membership columns".to_string(),
            expected: 1,
            got: 0,
        });
    }
    Ok(())
}
