//! Route-subsystem error type.

use std::time::Duration;

use thiserror::Error;

use wp_core::CoreError;

/// Errors produced by `wp-route`.
///
/// The three variants are deliberately distinct: bad input, a search that
/// legitimately came up empty, and a result that violates the visiting
/// postcondition (an internal defect).
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("precondition failed: {0}")]
    Precondition(#[from] CoreError),

    #[error("no solution found within {budget:?}")]
    NoSolution { budget: Duration },

    #[error("solver integrity violation: {0}")]
    Integrity(String),
}

impl RouteError {
    /// `true` if retrying with a larger budget or fewer points may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RouteError::NoSolution { .. })
    }
}

pub type RouteResult<T> = Result<T, RouteError>;
