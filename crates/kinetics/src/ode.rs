//! Right-hand side of the single-gate relaxation equation.
//!
//! Time stepping is left to the caller's integrator.

use crate::error::KineticsError;
use crate::rates::kchannel_params;

/// Returns `dn/dt = α(V)(1 − n) − β(V) n` for gate fraction `n`.
///
/// The equation is autonomous; `t` is accepted so the function plugs into
/// integrators that expect an `f(y, t, ...)` signature, and is ignored.
///
/// # Errors
///
/// Propagates rate evaluation errors (see [`kchannel_params`]).
pub fn dndt(n: f64, _t: f64, voltage: f64) -> Result<f64, KineticsError> {
    Ok(kchannel_params(voltage)?.dndt(n))
}
