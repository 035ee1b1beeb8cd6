//! Request-level entry points: validate, build the matrix, solve, verify.

use std::time::Duration;

use log::{debug, info};

use wp_core::{Point, PointId, PointSet};

use crate::{
    DistanceMatrix, DistanceModel, GuidedLocalSearch, RouteError, RouteResult, RouteSolver,
    SearchStats, SearchStatus, SolverConfig,
};

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered visiting sequence over a `PointSet`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Point ids in visiting order: start first, goal last.
    pub path:       Vec<PointId>,
    /// Sum of matrix entries along consecutive path edges.
    pub total_cost: u64,
    pub status:     SearchStatus,
    pub stats:      SearchStats,
}

impl Route {
    /// `true` if start and goal coincide and no search ran.
    pub fn is_trivial(&self) -> bool {
        self.status == SearchStatus::Trivial
    }

    /// Resolve the id path back to full points, in visiting order.
    ///
    /// Ids missing from `points` are skipped, which only happens when the
    /// route is resolved against a different set than it was solved on.
    pub fn points<'a>(&self, points: &'a PointSet) -> Vec<&'a Point> {
        self.path.iter().filter_map(|&id| points.get(id)).collect()
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Route `points` with geodesic costs, guided local search and default
/// parameters under `time_budget`.
pub fn route(points: &PointSet, time_budget: Duration) -> RouteResult<Route> {
    route_with(
        points,
        DistanceModel::Geodesic,
        &GuidedLocalSearch,
        &SolverConfig::with_budget(time_budget),
    )
}

/// Route `points` with an explicit distance model, solver and configuration.
///
/// # Errors
///
/// - [`RouteError::Precondition`] for invalid points or configuration,
///   before any computation.
/// - [`RouteError::NoSolution`] if the solver found no feasible path in time.
/// - [`RouteError::Integrity`] if the solver's answer breaks the visiting
///   postcondition or misreports its cost.
pub fn route_with<S: RouteSolver + ?Sized>(
    points: &PointSet,
    model:  DistanceModel,
    solver: &S,
    config: &SolverConfig,
) -> RouteResult<Route> {
    let anchors = points.validate()?;
    config.validate()?;

    let slice = points.as_slice();
    let (start, goal) = (&slice[anchors.start], &slice[anchors.goal]);

    if slice.len() == 2 && start.coincides_with(goal) {
        debug!("start and goal coincide; returning single-node route");
        return Ok(Route {
            path:       vec![start.id],
            total_cost: 0,
            status:     SearchStatus::Trivial,
            stats:      SearchStats::default(),
        });
    }

    let matrix = DistanceMatrix::from_points(slice, model);
    let solved = solver.solve(&matrix, anchors.start, anchors.goal, config)?;
    let total_cost = verify_path(&matrix, &solved.order, anchors.start, anchors.goal)?;

    if total_cost != solved.cost {
        return Err(RouteError::Integrity(format!(
            "{} reported cost {} but the path sums to {total_cost}",
            solver.name(),
            solved.cost
        )));
    }

    info!(
        "{} routed {} points: cost {total_cost}, status {}, {:?}",
        solver.name(),
        slice.len(),
        solved.status,
        solved.stats.elapsed
    );

    Ok(Route {
        path: solved.order.iter().map(|&i| slice[i].id).collect(),
        total_cost,
        status: solved.status,
        stats: solved.stats,
    })
}

/// Check the full-visitation postcondition and recompute the path cost.
///
/// `order` must have one entry per matrix row, start at `start`, end at
/// `goal` and contain every index exactly once.
pub fn verify_path(
    matrix: &DistanceMatrix,
    order:  &[usize],
    start:  usize,
    goal:   usize,
) -> RouteResult<u64> {
    let n = matrix.len();
    if order.len() != n {
        return Err(RouteError::Integrity(format!(
            "path visits {} nodes, expected {n}",
            order.len()
        )));
    }
    if order.first() != Some(&start) || order.last() != Some(&goal) {
        return Err(RouteError::Integrity(format!(
            "path must run from {start} to {goal}, got {:?} to {:?}",
            order.first(),
            order.last()
        )));
    }

    let mut seen = vec![false; n];
    for &i in order {
        match seen.get_mut(i) {
            None => {
                return Err(RouteError::Integrity(format!("path index {i} out of range")));
            }
            Some(true) => {
                return Err(RouteError::Integrity(format!("path visits index {i} twice")));
            }
            Some(slot) => *slot = true,
        }
    }

    matrix.path_cost(order).ok_or_else(|| {
        RouteError::Integrity("path uses a forbidden arc or its cost overflows".into())
    })
}
