//! Grid-subsystem error type.

use thiserror::Error;

use wp_core::CoreError;

/// Errors produced by `wp-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("precondition failed: {0}")]
    Precondition(#[from] CoreError),

    #[error("unknown cost shape '{0}' (expected linear, quadratic or zero)")]
    UnknownCostShape(String),

    #[error("cost map configuration error: {0}")]
    Config(String),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;
