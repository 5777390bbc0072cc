//! Five-state potassium channel as a continuous-time Markov chain.
//!
//! Four identical, independent subunits each activate with rate α and
//! deactivate with rate β. Counting activated subunits gives the linear
//! chain
//!
//! ```text
//!      4α      3α      2α       α
//! C1 ⇄ C2 ⇄ C3 ⇄ C4 ⇄ O
//!      β       2β      3β      4β
//! ```
//!
//! The singlet model tracks one subunit on its own: `closed ⇄ open` with
//! rates α and β.

use kgate_msm::{RateMatrix, TransitionMatrix};
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::config::RateConfig;
use crate::error::KineticsError;
use crate::rates::kchannel_params_with;
use crate::state::{ChannelState, SingletState};

/// Number of gating subunits.
pub const N_SUBUNITS: usize = 4;

/// Channel kinetics at one fixed pair of rate constants.
///
/// Rates are taken as given: negative or NaN rates are not rejected here
/// and surface as [`MsmError::InvalidGeneratorMatrix`] when a matrix is
/// built.
///
/// [`MsmError::InvalidGeneratorMatrix`]: kgate_msm::MsmError::InvalidGeneratorMatrix
///
/// # Example
///
/// ```
/// use kgate_kinetics::ChannelModel;
///
/// let model = ChannelModel::new(0.05, 0.07);
/// let q = model.rate_matrix().unwrap();
/// assert!((q.rate(0, 0) + 0.2).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelModel {
    alpha: f64,
    beta: f64,
}

impl ChannelModel {
    /// Creates a model from forward rate `alpha` and backward rate `beta` (ms⁻¹).
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Creates a model with the rates evaluated at membrane voltage `voltage` (mV).
    ///
    /// # Errors
    ///
    /// Propagates rate evaluation errors (see [`kchannel_params_with`]).
    pub fn at_voltage(voltage: f64, config: &RateConfig) -> Result<Self, KineticsError> {
        let params = kchannel_params_with(voltage, config)?;
        debug!(voltage, alpha = params.alpha, beta = params.beta, "rates evaluated");
        Ok(Self::new(params.alpha, params.beta))
    }

    /// Forward rate.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Backward rate.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Builds the 5×5 generator of the subunit-counting chain.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Msm`] wrapping `InvalidGeneratorMatrix` if the
    /// rates do not yield a valid generator.
    pub fn rate_matrix(&self) -> Result<RateMatrix, KineticsError> {
        let n = ChannelState::COUNT;
        let mut off = Array2::zeros((n, n));
        for k in 0..N_SUBUNITS {
            off[[k, k + 1]] = (N_SUBUNITS - k) as f64 * self.alpha;
            off[[k + 1, k]] = (k + 1) as f64 * self.beta;
        }
        let q = RateMatrix::from_off_diagonal(off)?;
        debug!(alpha = self.alpha, beta = self.beta, "built five-state generator");
        Ok(q)
    }

    /// Returns `exp(lag · Q)` for the five-state generator.
    ///
    /// # Errors
    ///
    /// Propagates generator errors and wraps `InvalidLag` or
    /// `InvalidTransitionMatrix` from the exponential.
    pub fn transition_matrix(&self, lag: f64) -> Result<TransitionMatrix, KineticsError> {
        let q = self.rate_matrix()?;
        Ok(TransitionMatrix::from_generator(&q, lag)?)
    }

    /// Builds the 2×2 generator of a single subunit.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Msm`] wrapping `InvalidGeneratorMatrix` if the
    /// rates do not yield a valid generator.
    pub fn rate_matrix_singlet(&self) -> Result<RateMatrix, KineticsError> {
        let mut off = Array2::zeros((2, 2));
        off[[SingletState::Closed.as_index(), SingletState::Open.as_index()]] = self.alpha;
        off[[SingletState::Open.as_index(), SingletState::Closed.as_index()]] = self.beta;
        Ok(RateMatrix::from_off_diagonal(off)?)
    }

    /// Returns `exp(lag · Q₁)` for the singlet generator.
    ///
    /// # Errors
    ///
    /// See [`ChannelModel::transition_matrix`].
    pub fn transition_matrix_singlet(&self, lag: f64) -> Result<TransitionMatrix, KineticsError> {
        let q = self.rate_matrix_singlet()?;
        Ok(TransitionMatrix::from_generator(&q, lag)?)
    }

    /// Steady-state fraction of activated subunits, `α / (α + β)`.
    ///
    /// `None` when `α + β` is not a positive finite number.
    pub fn steady_state(&self) -> Option<f64> {
        let total = self.alpha + self.beta;
        (total.is_finite() && total > 0.0).then(|| self.alpha / total)
    }

    /// Analytic stationary distribution of the five-state chain.
    ///
    /// Subunits are independent, so the number of activated subunits is
    /// `Binomial(4, n∞)`.
    pub fn binomial_occupancy(&self) -> Option<Array1<f64>> {
        let p = self.steady_state()?;
        let occupancy = Array1::from_shape_fn(ChannelState::COUNT, |k| {
            binomial(N_SUBUNITS, k) * p.powi(k as i32) * (1.0 - p).powi((N_SUBUNITS - k) as i32)
        });
        Some(occupancy)
    }

    /// Crisp membership lumping the four closed states into cluster 0 and
    /// the open state into cluster 1.
    pub fn open_cluster_membership() -> Array2<f64> {
        Array2::from_shape_fn((ChannelState::COUNT, 2), |(i, c)| {
            let open = ChannelState::ALL[i].is_open();
            if usize::from(open) == c { 1.0 } else { 0.0 }
        })
    }
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}
