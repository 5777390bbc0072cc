//! Voltage-dependent gating rates of the delayed-rectifier potassium channel.
//!
//! Hodgkin–Huxley n-gate rates in the modern sign convention (mV, ms⁻¹):
//!
//! ```text
//! α(V) = 0.01 (10 − V) / (exp((10 − V) / 10) − 1)
//! β(V) = 0.125 exp(−V / 80)
//! ```
//!
//! With `x = (10 − V) / 10`, `α = 0.1 · x / (eˣ − 1)`, a 0/0 form at
//! V = 10 mV whose limit is 0.1. Outside the guard band the quotient uses
//! `expm1`, which keeps full precision for small `x`; inside it the policy
//! in [`RateConfig`] decides.

use serde::Serialize;

use crate::config::{RateConfig, SingularityPolicy};
use crate::error::KineticsError;

const ALPHA_SCALE: f64 = 0.01;
const ALPHA_HALF_VOLTAGE: f64 = 10.0;
const ALPHA_SLOPE: f64 = 10.0;
const BETA_SCALE: f64 = 0.125;
const BETA_SLOPE: f64 = 80.0;

/// Rate parameters of the gate at one voltage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateParams {
    /// Forward (opening) rate constant, ms⁻¹.
    pub alpha: f64,
    /// Backward (closing) rate constant, ms⁻¹.
    pub beta: f64,
    /// Steady-state open fraction `α / (α + β)`.
    pub steady_state: f64,
    /// Relaxation time constant `1 / (α + β)`, ms.
    pub tau: f64,
}

impl RateParams {
    /// Builds the derived quantities from a pair of rates.
    pub fn from_rates(alpha: f64, beta: f64) -> Self {
        let total = alpha + beta;
        Self {
            alpha,
            beta,
            steady_state: alpha / total,
            tau: 1.0 / total,
        }
    }

    /// Relaxation right-hand side `α (1 − n) − β n` for gate fraction `n`.
    pub fn dndt(&self, n: f64) -> f64 {
        self.alpha * (1.0 - n) - self.beta * n
    }
}

/// Evaluates the forward rate `α(V)`.
///
/// # Errors
///
/// Returns [`KineticsError::NonFiniteVoltage`] for NaN/∞ input and
/// [`KineticsError::SingularRateEvaluation`] inside the guard band under
/// [`SingularityPolicy::Reject`].
pub fn alpha_n(voltage: f64, config: &RateConfig) -> Result<f64, KineticsError> {
    if !voltage.is_finite() {
        return Err(KineticsError::NonFiniteVoltage { voltage });
    }
    let x = (ALPHA_HALF_VOLTAGE - voltage) / ALPHA_SLOPE;
    let amplitude = ALPHA_SCALE * ALPHA_SLOPE;
    if x.abs() < config.guard_band() {
        return match config.policy() {
            // x / (eˣ − 1) = 1 − x/2 + x²/12 − O(x⁴)
            SingularityPolicy::Limit => Ok(amplitude * (1.0 - x / 2.0 + x * x / 12.0)),
            SingularityPolicy::Reject => Err(KineticsError::SingularRateEvaluation { voltage }),
        };
    }
    Ok(amplitude * x / x.exp_m1())
}

/// Evaluates the backward rate `β(V)`.
///
/// # Errors
///
/// Returns [`KineticsError::NonFiniteVoltage`] for NaN/∞ input.
pub fn beta_n(voltage: f64) -> Result<f64, KineticsError> {
    if !voltage.is_finite() {
        return Err(KineticsError::NonFiniteVoltage { voltage });
    }
    Ok(BETA_SCALE * (-voltage / BETA_SLOPE).exp())
}

/// Evaluates all rate parameters at `voltage` with the default [`RateConfig`].
///
/// # Errors
///
/// See [`kchannel_params_with`].
pub fn kchannel_params(voltage: f64) -> Result<RateParams, KineticsError> {
    kchannel_params_with(voltage, &RateConfig::default())
}

/// Evaluates all rate parameters at `voltage`.
///
/// # Errors
///
/// Returns [`KineticsError::InvalidConfig`] for an invalid configuration,
/// [`KineticsError::NonFiniteVoltage`] for NaN/∞ input, and
/// [`KineticsError::SingularRateEvaluation`] under
/// [`SingularityPolicy::Reject`] near V = 10 mV.
pub fn kchannel_params_with(
    voltage: f64,
    config: &RateConfig,
) -> Result<RateParams, KineticsError> {
    config.validate()?;
    let alpha = alpha_n(voltage, config)?;
    let beta = beta_n(voltage)?;
    Ok(RateParams::from_rates(alpha, beta))
}
