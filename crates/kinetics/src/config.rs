//! Configuration for rate parameter evaluation.

use crate::error::KineticsError;

/// What to do when the forward rate is evaluated next to its removable
/// singularity at V = 10 mV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingularityPolicy {
    /// Evaluate the analytic limit via its Taylor series.
    #[default]
    Limit,
    /// Fail with [`KineticsError::SingularRateEvaluation`].
    Reject,
}

/// Configuration for rate parameter evaluation.
///
/// # Example
///
/// ```
/// use kgate_kinetics::{RateConfig, SingularityPolicy};
///
/// let config = RateConfig::new()
///     .with_guard_band(1e-5)
///     .with_policy(SingularityPolicy::Reject);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct RateConfig {
    guard_band: f64,
    policy: SingularityPolicy,
}

impl RateConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `guard_band = 1e-6`, `policy = Limit`.
    pub fn new() -> Self {
        Self {
            guard_band: 1e-6,
            policy: SingularityPolicy::Limit,
        }
    }

    /// Sets the half-width of the guard band in the reduced variable
    /// `x = (10 - V) / 10`.
    pub fn with_guard_band(mut self, guard_band: f64) -> Self {
        self.guard_band = guard_band;
        self
    }

    /// Sets the singularity policy.
    pub fn with_policy(mut self, policy: SingularityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the guard band half-width.
    pub fn guard_band(&self) -> f64 {
        self.guard_band
    }

    /// Returns the singularity policy.
    pub fn policy(&self) -> SingularityPolicy {
        self.policy
    }

    /// Validates this configuration.
    ///
    /// The guard band must be finite and positive. Bands wider than 0.1
    /// would let the three-term series drift from the exact formula, so
    /// they are rejected too.
    pub fn validate(&self) -> Result<(), KineticsError> {
        if !self.guard_band.is_finite() || self.guard_band <= 0.0 || self.guard_band > 0.1 {
            return Err(KineticsError::InvalidConfig {
                reason: format!(
                    "guard_band must be finite and in (0, 0.1], got {}",
                    self.guard_band
                ),
            });
        }
        Ok(())
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self::new()
    }
}
