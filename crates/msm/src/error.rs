//! Error types for the kgate-msm crate.

/// Error type for all fallible operations in the kgate-msm crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MsmError {
    /// Returned when a matrix has no rows or columns.
    #[error("matrix is empty")]
    EmptyMatrix,

    /// Returned when a square matrix is required.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Returned when input contains NaN or infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when a matrix violates the rate (generator) matrix invariant.
    #[error("invalid generator matrix: {reason}")]
    InvalidGeneratorMatrix {
        /// Description of the violated invariant.
        reason: String,
    },

    /// Returned when a matrix is not row-stochastic.
    #[error("invalid transition matrix: {reason}")]
    InvalidTransitionMatrix {
        /// Description of the violated invariant.
        reason: String,
    },

    /// Returned when a membership matrix is checked and found invalid.
    #[error("invalid membership matrix: {reason}")]
    InvalidMembership {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a coarse cluster carries no stationary weight.
    #[error("degenerate cluster {cluster}: stationary weight {weight}")]
    DegenerateCluster {
        /// Zero-based coarse cluster index.
        cluster: usize,
        /// Total stationary weight of the cluster.
        weight: f64,
    },

    /// Returned when the lag time is negative or non-finite.
    #[error("invalid lag: {lag} (must be finite and >= 0)")]
    InvalidLag {
        /// The invalid lag.
        lag: f64,
    },

    /// Returned when operand dimensions disagree.
    #[error("shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Which operand is mismatched.
        what: String,
        /// Expected extent.
        expected: usize,
        /// Actual extent.
        got: usize,
    },

    /// Returned when a linear system has a (numerically) singular matrix.
    #[error("singular linear system at pivot {pivot}")]
    SingularSystem {
        /// Column at which elimination broke down.
        pivot: usize,
    },

    /// Returned when the stationary distribution cannot be computed.
    #[error("stationary distribution failed: {reason}")]
    StationaryFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a state index is outside the chain.
    #[error("state {state} out of range for {n_states}-state chain")]
    StateOutOfRange {
        /// The offending state index.
        state: usize,
        /// Number of states in the chain.
        n_states: usize,
    },

    /// Returned when a pre-allocated buffer has the wrong length.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },
}
