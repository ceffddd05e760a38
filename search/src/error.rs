//! Typed search failures.
//!
//! The engine's primary surface never errors: an empty path is the
//! no-path signal. [`SearchError`] exists for callers that opt into
//! [`SearchReport::into_result`](crate::report::SearchReport::into_result)
//! to tell "gave up" apart from "no route exists".

use crate::report::TerminationReason;

/// Why a search produced no path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The destination is not walkable, or every reachable cell was
    /// expanded without reaching it.
    NoPathFound { reason: TerminationReason },
    /// The expansion ceiling was hit before the destination was reached.
    SearchBudgetExhausted { expansions: u64 },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPathFound { reason } => {
                write!(f, "no path found: {}", reason.as_str())
            }
            Self::SearchBudgetExhausted { expansions } => {
                write!(f, "search budget exhausted after {expansions} expansions")
            }
        }
    }
}

impl std::error::Error for SearchError {}
