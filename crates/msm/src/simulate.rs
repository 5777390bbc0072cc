//! Discrete-time state path sampling.

use crate::error::MsmError;
use crate::matrix::TransitionMatrix;

/// Simulates `n_steps` successive states of the chain.
///
/// # Arguments
///
/// * `transitions` - One-lag transition matrix.
/// * `initial` - The state before the first simulated step.
/// * `n_steps` - Number of states to draw.
/// * `rng` - Random number generator.
///
/// # Errors
///
/// Returns [`MsmError::StateOutOfRange`] if `initial` is not a state of the chain.
pub fn simulate_states(
    transitions: &TransitionMatrix,
    initial: usize,
    n_steps: usize,
    rng: &mut impl rand::Rng,
) -> Result<Vec<usize>, MsmError> {
    let mut out = vec![0; n_steps];
    simulate_states_into(transitions, initial, rng, &mut out)?;
    Ok(out)
}

/// Simulates states into a pre-allocated buffer, one state per slot.
///
/// # Errors
///
/// Returns [`MsmError::StateOutOfRange`] if `initial` is not a state of the chain.
pub fn simulate_states_into(
    transitions: &TransitionMatrix,
    initial: usize,
    rng: &mut impl rand::Rng,
    out: &mut [usize],
) -> Result<(), MsmError> {
    let n_states = transitions.n_states();
    if initial >= n_states {
        return Err(MsmError::StateOutOfRange {
            state: initial,
            n_states,
        });
    }
    let mut prev = initial;
    for slot in out.iter_mut() {
        let next = transitions.sample(prev, rng);
        *slot = next;
        prev = next;
    }
    Ok(())
}

/// Simulates states into `out`, checking that it holds exactly `n_steps` slots.
///
/// # Errors
///
/// Returns [`MsmError::BufferLengthMismatch`] if `out.len() != n_steps`, or
/// [`MsmError::StateOutOfRange`] for a bad `initial` state.
pub fn simulate_states_exact(
    transitions: &TransitionMatrix,
    initial: usize,
    n_steps: usize,
    rng: &mut impl rand::Rng,
    out: &mut [usize],
) -> Result<(), MsmError> {
    if out.len() != n_steps {
        return Err(MsmError::BufferLengthMismatch {
            expected: n_steps,
            got: out.len(),
        });
    }
    simulate_states_into(transitions, initial, rng, out)
}
