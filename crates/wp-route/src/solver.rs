//! Solver trait, configuration and result types.
//!
//! # Pluggability
//!
//! [`crate::route_with`] calls the search through the [`RouteSolver`] trait,
//! so callers can swap in an exact solver for tiny instances or a different
//! metaheuristic without touching validation or the postcondition check.
//! The default is [`GuidedLocalSearch`][crate::GuidedLocalSearch].

use std::fmt;
use std::time::Duration;

use wp_core::CoreError;

use crate::construct::cheapest_arc;
use crate::monitor::Deadline;
use crate::{DistanceMatrix, RouteError, RouteResult};

// ── SolverConfig ──────────────────────────────────────────────────────────────

/// Search parameters.
///
/// Typically built with struct-update syntax over `Default`, or loaded from
/// JSON by the application (feature `serde`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Wall-clock budget for construction plus improvement.  Must be > 0.
    pub time_budget: Duration,

    /// Stop after this many guided-local-search rounds even if budget
    /// remains.  `None` runs until the budget is spent.
    pub max_iterations: Option<u64>,

    /// GLS α: the penalty weight λ is `α · cost(first local optimum) / arcs`.
    pub penalty_factor: f64,

    /// Seed for the neighbourhood scan order.
    pub seed: u64,

    /// Clock is read every `clock_check_mask + 1` evaluated moves.
    pub clock_check_mask: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget:      Duration::from_secs(5),
            max_iterations:   None,
            penalty_factor:   0.3,
            seed:             0,
            clock_check_mask: Deadline::DEFAULT_CLOCK_CHECK_MASK,
        }
    }
}

impl SolverConfig {
    /// Default parameters with a different time budget.
    pub fn with_budget(time_budget: Duration) -> Self {
        Self { time_budget, ..Self::default() }
    }

    pub fn validate(&self) -> RouteResult<()> {
        if self.time_budget.is_zero() {
            return Err(CoreError::Invalid("time budget must be positive".into()).into());
        }
        if !self.penalty_factor.is_finite() || self.penalty_factor < 0.0 {
            return Err(CoreError::Invalid(format!(
                "penalty factor must be finite and non-negative, got {}",
                self.penalty_factor
            ))
            .into());
        }
        Ok(())
    }

    pub(crate) fn deadline(&self) -> Deadline {
        Deadline::with_mask(self.time_budget, self.clock_check_mask)
    }
}

// ── Result types ──────────────────────────────────────────────────────────────

/// Why the search stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SearchStatus {
    /// Start and goal coincide with nothing in between; no search ran.
    Trivial,
    /// Nothing left to improve: the path is fully determined, provably
    /// optimal (zero cost), or the solver has no improvement phase.
    Converged,
    /// `max_iterations` rounds completed.
    IterationLimit,
    /// The time budget ran out; the best path seen is returned.
    TimeLimit,
}

impl SearchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchStatus::Trivial        => "trivial",
            SearchStatus::Converged      => "converged",
            SearchStatus::IterationLimit => "iteration_limit",
            SearchStatus::TimeLimit      => "time_limit",
        }
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters collected during one solve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Completed guided-local-search rounds.
    pub iterations:     u64,
    /// Candidate moves evaluated.
    pub evaluations:    u64,
    /// Moves applied.
    pub moves:          u64,
    /// Times a strictly better path was recorded.
    pub improvements:   u64,
    /// Arc penalties raised.
    pub penalties:      u64,
    pub elapsed:        Duration,
}

/// A solver's answer in matrix-index space.
#[derive(Clone, Debug, PartialEq)]
pub struct SolvedPath {
    /// Matrix indices in visiting order.
    pub order:  Vec<usize>,
    /// Sum of matrix entries along `order`, as tracked by the solver.
    pub cost:   u64,
    pub status: SearchStatus,
    pub stats:  SearchStats,
}

// ── RouteSolver trait ─────────────────────────────────────────────────────────

/// Fixed-endpoint Hamiltonian path search.
///
/// # Contract
///
/// Return an order of length `matrix.len()` that starts at `start`, ends at
/// `goal` and visits every other index once, or
/// [`RouteError::NoSolution`] if none was found before the budget ran out.
/// The caller re-verifies the result, so an implementation bug surfaces as
/// [`RouteError::Integrity`] rather than as a wrong route.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; all per-solve state lives on the
/// stack of `solve`.
pub trait RouteSolver: Send + Sync {
    fn name(&self) -> &str;

    fn solve(
        &self,
        matrix: &DistanceMatrix,
        start:  usize,
        goal:   usize,
        config: &SolverConfig,
    ) -> RouteResult<SolvedPath>;
}

/// Check anchor indices against the matrix size.
pub(crate) fn check_anchors(matrix: &DistanceMatrix, start: usize, goal: usize) -> RouteResult<()> {
    let n = matrix.len();
    if start >= n || goal >= n {
        return Err(CoreError::Invalid(format!(
            "anchor index out of range: start {start}, goal {goal}, matrix size {n}"
        ))
        .into());
    }
    if start == goal && n > 1 {
        return Err(CoreError::Invalid("start and goal must be different points".into()).into());
    }
    Ok(())
}

// ── CheapestArc ───────────────────────────────────────────────────────────────

/// Construction only: the path-cheapest-arc heuristic with no improvement
/// phase.  Fast and deterministic; a baseline for [`GuidedLocalSearch`].
///
/// [`GuidedLocalSearch`]: crate::GuidedLocalSearch
pub struct CheapestArc;

impl RouteSolver for CheapestArc {
    fn name(&self) -> &str {
        "CheapestArc"
    }

    fn solve(
        &self,
        matrix: &DistanceMatrix,
        start:  usize,
        goal:   usize,
        config: &SolverConfig,
    ) -> RouteResult<SolvedPath> {
        check_anchors(matrix, start, goal)?;
        let mut deadline = config.deadline();
        let mut stats = SearchStats::default();

        let (order, cost) = cheapest_arc(matrix, start, goal, &mut deadline, &mut stats)
            .ok_or(RouteError::NoSolution { budget: config.time_budget })?;

        stats.elapsed = deadline.elapsed();
        Ok(SolvedPath { order, cost, status: SearchStatus::Converged, stats })
    }
}
