//! Markov state model numerics for continuous-time gating schemes.
//!
//! This crate turns a continuous-time rate (generator) matrix into a
//! discrete-time transition matrix for a chosen lag, and lumps fine
//! transition matrices onto coarse states while preserving the stationary
//! distribution exactly.
//!
//! # Pipeline
//!
//! ```text
//!  ┌───────────────┐     ┌──────────────────┐     ┌──────────────────┐
//!  │  RateMatrix   │────▶│ TransitionMatrix │────▶│  CoarseGrainer   │
//!  │  (validate Q) │     │  (expm(lag·Q))   │     │ (π-weighted χ)   │
//!  └───────────────┘     └──────────────────┘     └──────────────────┘
//!                                                           ▲
//!                                                           │ π
//!                                                 ┌──────────────────┐
//!                                                 │ StationarySolver │
//!                                                 └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use kgate_msm::{RateMatrix, TransitionMatrix, coarse_grain};
//! use ndarray::{Array2, array};
//!
//! let q = RateMatrix::new(array![[-0.2, 0.2], [0.1, -0.1]]).unwrap();
//! let t = TransitionMatrix::from_generator(&q, 1.0).unwrap();
//!
//! // Identity membership leaves the matrix unchanged.
//! let coarse = coarse_grain(&t, Array2::eye(2).view()).unwrap();
//! assert!((coarse[[0, 1]] - t.prob(0, 1)).abs() < 1e-12);
//! ```

pub mod coarse;
pub mod error;
pub mod expm;
pub mod matrix;
pub mod simulate;
pub mod stationary;

pub(crate) mod linalg;

pub use coarse::{
    CoarseGrainer, DEFAULT_MIN_CLUSTER_WEIGHT, check_membership, cluster_weights, coarse_grain,
    crisp_membership,
};
pub use error::MsmError;
pub use expm::expm;
pub use matrix::{
    DEFAULT_TOLERANCE, RateMatrix, TransitionMatrix, check_rate_matrix, check_transition_matrix,
};
pub use simulate::{simulate_states, simulate_states_exact, simulate_states_into};
pub use stationary::{DirectSolver, PowerSolver, StationarySolver, stationary_distribution};
