//! Error type shared by all tour, population, and search operations.
//!
//! Every variant describes a broken caller contract. Nothing here is
//! transient, so no operation retries.

use std::fmt;

/// Errors raised when an operation's contract is violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TspError {
    /// Malformed input: mismatched sizes, foreign graphs, out-of-range rates.
    InvalidArgument(String),

    /// A position or count outside `0..len`.
    IndexOutOfBounds {
        /// The offending index or count.
        index: usize,
        /// The exclusive upper bound that was expected.
        len: usize,
    },

    /// The receiver is not in a state that allows the query.
    InvalidState(String),
}

/// Result alias used across the crate.
pub type TspResult<T> = Result<T, TspError>;

impl TspError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        TspError::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_state(msg: impl Into<String>) -> Self {
        TspError::InvalidState(msg.into())
    }

    /// Returns `Ok(())` when `index < len`.
    pub(crate) fn check_index(index: usize, len: usize) -> TspResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(TspError::IndexOutOfBounds { index, len })
        }
    }
}

impl fmt::Display for TspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TspError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            TspError::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            TspError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
        }
    }
}

impl std::error::Error for TspError {}
