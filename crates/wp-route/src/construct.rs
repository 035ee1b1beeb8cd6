//! Path-cheapest-arc construction.
//!
//! Starting from the start node, repeatedly append the unvisited non-goal
//! node reachable by the cheapest arc from the current tail (ties go to the
//! lower index), then close the path at the goal.  O(N²).

use crate::monitor::Deadline;
use crate::{DistanceMatrix, SearchStats};

/// Build an initial feasible order.
///
/// Returns `None` when the heuristic gets stuck on forbidden arcs, the cost
/// overflows, or the deadline passes before the path is complete.
pub(crate) fn cheapest_arc(
    matrix:   &DistanceMatrix,
    start:    usize,
    goal:     usize,
    deadline: &mut Deadline,
    stats:    &mut SearchStats,
) -> Option<(Vec<usize>, u64)> {
    let n = matrix.len();
    if n == 1 {
        return Some((vec![start], 0));
    }

    let mut visited = vec![false; n];
    visited[start] = true;
    visited[goal] = true;

    let mut order = Vec::with_capacity(n);
    order.push(start);
    let mut tail = start;
    let mut cost = 0u64;

    for _ in 0..n - 2 {
        stats.evaluations += 1;
        if deadline.check(stats.evaluations) {
            return None;
        }

        let (next, arc) = matrix
            .row(tail)
            .iter()
            .enumerate()
            .filter(|&(j, &c)| !visited[j] && c != DistanceMatrix::FORBIDDEN)
            .min_by_key(|&(j, &c)| (c, j))
            .map(|(j, &c)| (j, c))?;

        visited[next] = true;
        order.push(next);
        cost = cost.checked_add(arc)?;
        tail = next;
    }

    let last = matrix.get(tail, goal);
    if last == DistanceMatrix::FORBIDDEN {
        return None;
    }
    order.push(goal);
    cost = cost.checked_add(last)?;

    Some((order, cost))
}
