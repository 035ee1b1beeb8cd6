//! Precondition errors shared by every `wp-*` crate.
//!
//! Sub-crates wrap `CoreError` as one variant of their own error enum (see
//! `wp_route::RouteError::Precondition`) so that input validation failures
//! stay distinguishable from computation failures.

use thiserror::Error;

use crate::{PointId, Role};

/// Input validation failures, reported before any computation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("need at least {required} points, got {got}")]
    TooFewPoints { required: usize, got: usize },

    #[error("no point with role {0}")]
    MissingRole(Role),

    #[error("more than one point with role {0}")]
    DuplicateRole(Role),

    #[error("point id {0} appears more than once")]
    DuplicatePointId(PointId),

    #[error("point {0} has a non-finite coordinate")]
    NonFiniteCoordinate(PointId),

    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Shorthand result type for `wp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
