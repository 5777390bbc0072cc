//! Rate (generator) and transition matrices with their validity invariants.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::MsmError;
use crate::expm::expm;

/// Absolute tolerance for invariant checks on double-precision matrices.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Checks the shape shared by both matrix kinds.
fn check_square(a: ArrayView2<f64>) -> Result<usize, MsmError> {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return Err(MsmError::EmptyMatrix);
    }
    if rows != cols {
        return Err(MsmError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Validates the continuous-time generator invariant.
///
/// Every row must sum to zero within `tol`, off-diagonal entries must be
/// `>= -tol` and diagonal entries `<= tol`.
///
/// # Errors
///
/// Returns [`MsmError::InvalidGeneratorMatrix`] naming the first violation
/// (including non-finite entries), or a shape error for malformed input.
pub fn check_rate_matrix(q: ArrayView2<f64>, tol: f64) -> Result<(), MsmError> {
    check_square(q)?;
    for (i, row) in q.rows().into_iter().enumerate() {
        for (j, &r) in row.iter().enumerate() {
            if !r.is_finite() {
                return Err(MsmError::InvalidGeneratorMatrix {
                    reason: format!("q[{i}][{j}] is not finite: {r}"),
                });
            }
            if i == j && r > tol {
                return Err(MsmError::InvalidGeneratorMatrix {
                    reason: format!("diagonal q[{i}][{i}] = {r} is positive"),
                });
            }
            if i != j && r < -tol {
                return Err(MsmError::InvalidGeneratorMatrix {
                    reason: format!("off-diagonal q[{i}][{j}] = {r} is negative"),
                });
            }
        }
        let sum = row.sum();
        if sum.abs() > tol {
            return Err(MsmError::InvalidGeneratorMatrix {
                reason: format!("row {i} sums to {sum}, expected ~0.0"),
            });
        }
    }
    Ok(())
}

/// Validates that a matrix is row-stochastic.
///
/// Every entry must lie in `[-tol, 1 + tol]` and every row must sum to 1
/// within `tol`.
///
/// # Errors
///
/// Returns [`MsmError::InvalidTransitionMatrix`] naming the first violation
/// (including non-finite entries), or a shape error for malformed input.
pub fn check_transition_matrix(t: ArrayView2<f64>, tol: f64) -> Result<(), MsmError> {
    check_square(t)?;
    for (i, row) in t.rows().into_iter().enumerate() {
        for (j, &p) in row.iter().enumerate() {
            if !p.is_finite() {
                return Err(MsmError::InvalidTransitionMatrix {
                    reason: format!("probs[{i}][{j}] is not finite: {p}"),
                });
            }
            if p < -tol || p > 1.0 + tol {
                return Err(MsmError::InvalidTransitionMatrix {
                    reason: format!("probs[{i}][{j}] = {p} is outside [0, 1]"),
                });
            }
        }
        let sum = row.sum();
        if (sum - 1.0).abs() > tol {
            return Err(MsmError::InvalidTransitionMatrix {
                reason: format!("row {i} sums to {sum}, expected ~1.0"),
            });
        }
    }
    Ok(())
}

/// A validated continuous-time rate (generator) matrix.
///
/// Row `i` holds the transition rates out of state `i`; the diagonal is the
/// negative total exit rate so each row sums to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct RateMatrix {
    rates: Array2<f64>,
}

impl RateMatrix {
    /// Wraps `rates` after checking the generator invariant at [`DEFAULT_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// See [`check_rate_matrix`].
    pub fn new(rates: Array2<f64>) -> Result<Self, MsmError> {
        check_rate_matrix(rates.view(), DEFAULT_TOLERANCE)?;
        Ok(Self { rates })
    }

    /// Builds a generator from its off-diagonal rates.
    ///
    /// Diagonal entries of `off_diagonal` are ignored and replaced by the
    /// negative sum of the remaining row entries, so rows sum to zero up to
    /// a single rounding of the summation.
    ///
    /// # Errors
    ///
    /// See [`check_rate_matrix`].
    pub fn from_off_diagonal(mut off_diagonal: Array2<f64>) -> Result<Self, MsmError> {
        check_square(off_diagonal.view())?;
        let n = off_diagonal.nrows();
        for i in 0..n {
            off_diagonal[[i, i]] = 0.0;
            let exit: f64 = off_diagonal.row(i).sum();
            off_diagonal[[i, i]] = -exit;
        }
        Self::new(off_diagonal)
    }

    /// Returns the number of states.
    pub fn n_states(&self) -> usize {
        self.rates.nrows()
    }

    /// Returns the rate from state `from` to state `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn rate(&self, from: usize, to: usize) -> f64 {
        self.rates[[from, to]]
    }

    /// Returns the rates out of state `from`.
    pub fn row(&self, from: usize) -> ArrayView1<'_, f64> {
        self.rates.row(from)
    }

    /// Returns the underlying matrix.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.rates
    }

    /// Consumes the wrapper and returns the underlying matrix.
    pub fn into_inner(self) -> Array2<f64> {
        self.rates
    }

    /// Returns the matrix as nested rows, e.g. for serialization.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        to_rows(self.rates.view())
    }
}

/// A validated discrete-time row-stochastic transition matrix.
///
/// Each row `i` contains the probabilities of moving from state `i` to every
/// state within one lag.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    probs: Array2<f64>,
}

impl TransitionMatrix {
    /// Wraps `probs` after checking row-stochasticity at [`DEFAULT_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// See [`check_transition_matrix`].
    pub fn new(probs: Array2<f64>) -> Result<Self, MsmError> {
        check_transition_matrix(probs.view(), DEFAULT_TOLERANCE)?;
        Ok(Self { probs })
    }

    /// Computes `exp(lag * Q)` and validates the result.
    ///
    /// A lag of zero yields the identity.
    ///
    /// # Errors
    ///
    /// Returns [`MsmError::InvalidLag`] for a negative or non-finite lag and
    /// [`MsmError::InvalidTransitionMatrix`] if the exponential is not
    /// row-stochastic.
    #[tracing::instrument(
        level = "debug",
        skip(generator),
        fields(n_states = generator.n_states())
    )]
    pub fn from_generator(generator: &RateMatrix, lag: f64) -> Result<Self, MsmError> {
        if !lag.is_finite() || lag < 0.0 {
            return Err(MsmError::InvalidLag { lag });
        }
        let scaled = generator.as_array() * lag;
        let probs = expm(scaled.view())?;
        Self::new(probs)
    }

    /// Returns the number of states.
    pub fn n_states(&self) -> usize {
        self.probs.nrows()
    }

    /// Returns the probability of moving from state `from` to state `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        self.probs[[from, to]]
    }

    /// Returns the transition probabilities out of state `from`.
    pub fn row(&self, from: usize) -> ArrayView1<'_, f64> {
        self.probs.row(from)
    }

    /// Returns the underlying matrix.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.probs
    }

    /// Consumes the wrapper and returns the underlying matrix.
    pub fn into_inner(self) -> Array2<f64> {
        self.probs
    }

    /// Returns the matrix as nested rows, e.g. for serialization.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        to_rows(self.probs.view())
    }

    /// Returns the two-step matrix `self · other`.
    ///
    /// # Errors
    ///
    /// Returns [`MsmError::ShapeMismatch`] if the sizes differ.
    pub fn compose(&self, other: &TransitionMatrix) -> Result<Self, MsmError> {
        if other.n_states() != self.n_states() {
            return Err(MsmError::ShapeMismatch {
                what: "composed transition matrix".to_string(),
                expected: self.n_states(),
                got: other.n_states(),
            });
        }
        Self::new(self.probs.dot(&other.probs))
    }

    /// Samples the next state given the current state, using the cumulative CDF.
    ///
    /// If rounding leaves the row total just below the draw, falls back to the
    /// last state with non-zero probability.
    ///
    /// # Panics
    ///
    /// Panics if `from` is out of range.
    pub fn sample(&self, from: usize, rng: &mut impl rand::Rng) -> usize {
        let row = self.probs.row(from);
        let u: f64 = rng.random();
        let mut cumulative = 0.0;
        for (to, &p) in row.iter().enumerate() {
            cumulative += p;
            if cumulative >= u {
                return to;
            }
        }
        row.iter()
            .rposition(|&p| p > 0.0)
            .unwrap_or(self.n_states() - 1)
    }
}

fn to_rows(a: ArrayView2<f64>) -> Vec<Vec<f64>> {
    a.rows().into_iter().map(|r| r.to_vec()).collect()
}
