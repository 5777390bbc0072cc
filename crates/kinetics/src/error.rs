//! Error types for the kgate-kinetics crate.

use kgate_msm::MsmError;

/// Error type for all fallible operations in the kgate-kinetics crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KineticsError {
    /// Returned when the membrane voltage is NaN or infinite.
    #[error("voltage is not finite: {voltage}")]
    NonFiniteVoltage {
        /// The offending voltage (mV).
        voltage: f64,
    },

    /// Returned when the forward rate is evaluated inside the guard band
    /// around its removable singularity under [`SingularityPolicy::Reject`].
    ///
    /// [`SingularityPolicy::Reject`]: crate::SingularityPolicy::Reject
    #[error("rate formula evaluated at its removable singularity (V = {voltage} mV)")]
    SingularRateEvaluation {
        /// The voltage that fell inside the guard band (mV).
        voltage: f64,
    },

    /// Returned when a state index has no label.
    #[error("unknown state index: {index} (must be 0..{n_states})")]
    UnknownStateIndex {
        /// The invalid index.
        index: usize,
        /// Number of states in the model.
        n_states: usize,
    },

    /// Returned when a state label is not recognised.
    #[error("unknown state label: {label:?}")]
    UnknownStateLabel {
        /// The unrecognised label.
        label: String,
    },

    /// Returned when a rate configuration is invalid.
    #[error("invalid rate configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Matrix construction, exponentiation or projection failed.
    #[error(transparent)]
    Msm(#[from] MsmError),
}
