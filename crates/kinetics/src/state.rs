//! Named states of the channel models.

use std::fmt;
use std::str::FromStr;

use crate::error::KineticsError;

/// Labels of the five-state model in index order.
pub static STATE_LABELS: [&str; 5] = ["C1", "C2", "C3", "C4", "O"];

/// States of the five-state channel.
///
/// `C1`…`C4` are closed with 0…3 activated subunits; `O` is open with all
/// four subunits activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelState {
    /// No subunit activated.
    C1 = 0,
    /// One subunit activated.
    C2 = 1,
    /// Two subunits activated.
    C3 = 2,
    /// Three subunits activated.
    C4 = 3,
    /// All four subunits activated; the channel conducts.
    O = 4,
}

impl ChannelState {
    /// All five states in index order.
    pub const ALL: [ChannelState; 5] = [Self::C1, Self::C2, Self::C3, Self::C4, Self::O];

    /// Number of states.
    pub const COUNT: usize = 5;

    /// Returns the zero-based index of this state (matches the `#[repr(u8)]` discriminant).
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Returns the symbolic label, e.g. `"C3"`.
    pub fn label(self) -> &'static str {
        STATE_LABELS[self.as_index()]
    }

    /// Returns `true` for the conducting state.
    pub fn is_open(self) -> bool {
        self == Self::O
    }

    /// Looks up the state for a zero-based index.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::UnknownStateIndex`] for indices outside `0..5`.
    pub fn from_index(index: usize) -> Result<Self, KineticsError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(KineticsError::UnknownStateIndex {
                index,
                n_states: Self::COUNT,
            })
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChannelState {
    type Err = KineticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.label() == s)
            .ok_or_else(|| KineticsError::UnknownStateLabel {
                label: s.to_string(),
            })
    }
}

/// Maps a five-state index to its label.
///
/// # Errors
///
/// Returns [`KineticsError::UnknownStateIndex`] for indices outside `0..5`.
pub fn index_to_label(index: usize) -> Result<&'static str, KineticsError> {
    ChannelState::from_index(index).map(ChannelState::label)
}

/// States of the single-subunit (singlet) model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SingletState {
    /// Subunit at rest.
    Closed = 0,
    /// Subunit activated.
    Open = 1,
}

impl SingletState {
    /// Both states in index order.
    pub const ALL: [SingletState; 2] = [Self::Closed, Self::Open];

    /// Returns the zero-based index of this state.
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Returns `"closed"` or `"open"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }
}

impl FromStr for SingletState {
    type Err = KineticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.label() == s)
            .ok_or_else(|| KineticsError::UnknownStateLabel {
                label: s.to_string(),
            })
    }
}
