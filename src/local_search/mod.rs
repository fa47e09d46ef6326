//! Local search operators that improve a [`Tour`](crate::models::Tour) in place.
//!
//! - [`two_opt`]: best-of-scan segment reversal, capped at [`MAX_TWO_OPT_MOVES`]
//! - [`swap`]: first-improvement position exchange

mod swap;
mod two_opt;

pub use two_opt::MAX_TWO_OPT_MOVES;

/// Minimum length decrease that counts as an improvement.
pub(crate) const IMPROVEMENT_EPS: f64 = 1e-10;
