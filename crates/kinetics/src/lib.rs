//! Gating kinetics of the delayed-rectifier potassium channel.
//!
//! Voltage-dependent rate constants feed a five-state Markov model of four
//! independent subunits (or its single-subunit reduction). The resulting
//! generators are exponentiated and lumped with [`kgate_msm`].
//!
//! ```
//! use kgate_kinetics::{ChannelModel, RateConfig};
//! use kgate_msm::coarse_grain;
//!
//! let model = ChannelModel::at_voltage(-20.0, &RateConfig::new()).unwrap();
//! let t = model.transition_matrix(1.0).unwrap();
//! let chi = ChannelModel::open_cluster_membership();
//! let closed_open = coarse_grain(&t, chi.view()).unwrap();
//! assert_eq!(closed_open.dim(), (2, 2));
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod ode;
pub mod rates;
pub mod state;

pub use channel::{ChannelModel, N_SUBUNITS};
pub use config::{RateConfig, SingularityPolicy};
pub use error::KineticsError;
pub use ode::dndt;
pub use rates::{RateParams, alpha_n, beta_n, kchannel_params, kchannel_params_with};
pub use state::{ChannelState, STATE_LABELS, SingletState, index_to_label};
