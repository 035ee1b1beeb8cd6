//! Guided Local Search (GLS) over fixed-endpoint paths.
//!
//! GLS augments the true objective with adaptive arc penalties so that a
//! plain descent can leave the local optimum it just settled into:
//!
//! `augmented(a, b) = d(a, b) + λ · p(a, b)`
//!
//! Each round runs a first-improvement descent on the augmented cost using
//! two neighbourhoods over the interior positions `1 ..= n-2` (the anchors
//! never move):
//!
//! - **2-opt**: reverse the segment `order[i ..= j]`.
//! - **relocate**: move the node at `i` to just after the node at `j`.
//!
//! At the resulting local optimum the arcs with the highest utility
//! `d(a, b) / (1 + p(a, b))` are penalised by one.  λ is fixed after the
//! first (unpenalised) descent as `α · cost / arcs`.
//!
//! The true cost of the current path is recomputed after every applied move
//! and the best path by true cost is kept aside, so whatever stops the
//! search (budget, iteration cap) the caller gets the best feasible path
//! seen so far.
//!
//! Penalties are stored per unordered pair, so on a symmetric matrix the
//! augmented cost is symmetric too and a reversal only changes its two
//! boundary arcs.  On an asymmetric matrix the reversed interior is summed
//! explicitly.

use log::{debug, trace};

use wp_core::SolverRng;

use crate::construct::cheapest_arc;
use crate::monitor::Deadline;
use crate::solver::check_anchors;
use crate::{
    DistanceMatrix, RouteError, RouteResult, RouteSolver, SearchStats, SearchStatus, SolvedPath,
    SolverConfig,
};

/// Improvements smaller than this are treated as ties.
const EPSILON: f64 = 1e-6;

/// The deadline passed mid-descent.
struct Expired;

// ── Penalties ─────────────────────────────────────────────────────────────────

/// Dense per-arc penalty counts, row-major, kept symmetric.
struct PenaltyMatrix {
    data: Vec<u32>,
    n:    usize,
}

impl PenaltyMatrix {
    fn new(n: usize) -> Self {
        Self { data: vec![0; n * n], n }
    }

    #[inline(always)]
    fn get(&self, a: usize, b: usize) -> u32 {
        self.data[a * self.n + b]
    }

    /// Saturating increment of both directions of `{a, b}`.
    fn increment(&mut self, a: usize, b: usize) {
        let ab = a * self.n + b;
        let ba = b * self.n + a;
        self.data[ab] = self.data[ab].saturating_add(1);
        if ab != ba {
            self.data[ba] = self.data[ba].saturating_add(1);
        }
    }
}

// ── Moves ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
enum Move {
    /// Reverse `order[i ..= j]`, `i < j`.
    TwoOpt { i: usize, j: usize },
    /// Remove `order[i]` and re-insert it after the node now at `order[j]`.
    Relocate { i: usize, j: usize },
}

impl Move {
    fn apply(self, order: &mut Vec<usize>) {
        match self {
            Move::TwoOpt { i, j } => order[i..=j].reverse(),
            Move::Relocate { i, j } => {
                let node = order.remove(i);
                let at = if j < i { j + 1 } else { j };
                order.insert(at, node);
            }
        }
    }
}

// ── Search state ──────────────────────────────────────────────────────────────

/// Everything one solve mutates.  Lives on the stack of `solve`.
struct Search<'m> {
    matrix:    &'m DistanceMatrix,
    symmetric: bool,
    penalties: PenaltyMatrix,
    lambda:    f64,
    deadline:  Deadline,
    rng:       SolverRng,
    stats:     SearchStats,

    current:      Vec<usize>,
    current_cost: u64,
    best:         Vec<usize>,
    best_cost:    u64,
}

impl Search<'_> {
    /// Augmented arc cost; forbidden arcs are infinitely expensive.
    #[inline]
    fn arc(&self, a: usize, b: usize) -> f64 {
        match self.matrix.get(a, b) {
            DistanceMatrix::FORBIDDEN => f64::INFINITY,
            d => d as f64 + self.lambda * self.penalties.get(a, b) as f64,
        }
    }

    /// Change in augmented cost if `mv` were applied to `current`.
    /// `None` if the move would introduce a forbidden arc.
    fn delta(&self, mv: Move) -> Option<f64> {
        let o = &self.current;
        let (added, removed) = match mv {
            Move::TwoOpt { i, j } => {
                let mut added = self.arc(o[i - 1], o[j]) + self.arc(o[i], o[j + 1]);
                let mut removed = self.arc(o[i - 1], o[i]) + self.arc(o[j], o[j + 1]);
                if !self.symmetric {
                    for k in i..j {
                        added += self.arc(o[k + 1], o[k]);
                        removed += self.arc(o[k], o[k + 1]);
                    }
                }
                (added, removed)
            }
            Move::Relocate { i, j } => {
                let added = self.arc(o[i - 1], o[i + 1])
                    + self.arc(o[j], o[i])
                    + self.arc(o[i], o[j + 1]);
                let removed = self.arc(o[i - 1], o[i])
                    + self.arc(o[i], o[i + 1])
                    + self.arc(o[j], o[j + 1]);
                (added, removed)
            }
        };
        added.is_finite().then_some(added - removed)
    }

    /// Evaluate one move; apply it if it improves the augmented cost.
    fn try_move(&mut self, mv: Move) -> Result<bool, Expired> {
        self.stats.evaluations += 1;
        if self.deadline.check(self.stats.evaluations) {
            return Err(Expired);
        }
        match self.delta(mv) {
            Some(d) if d < -EPSILON => {
                mv.apply(&mut self.current);
                self.stats.moves += 1;
                self.record_current();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Recompute the true cost of `current` and keep it if it is the best.
    fn record_current(&mut self) {
        // A move with a finite augmented delta only uses allowed arcs, so the
        // path stays feasible; an overflowing sum is left out of the best.
        let Some(cost) = self.matrix.path_cost(&self.current) else {
            return;
        };
        self.current_cost = cost;
        if cost < self.best_cost {
            trace!("new best path cost {cost} (was {})", self.best_cost);
            self.best_cost = cost;
            self.best.clone_from(&self.current);
            self.stats.improvements += 1;
        }
    }

    /// First-improvement descent on the augmented cost until no move helps.
    fn descend(&mut self) -> Result<(), Expired> {
        let n = self.current.len();
        let last = n - 2; // last interior position
        'descent: loop {
            // Rotate the scan start so repeated descents explore different
            // parts of the neighbourhood first.
            let offset = self.rng.gen_range(0..last);

            for step in 0..last {
                let i = 1 + (offset + step) % last;
                for j in (i + 1)..=last {
                    if self.try_move(Move::TwoOpt { i, j })? {
                        continue 'descent;
                    }
                }
                for j in 0..=last {
                    if j == i || j + 1 == i {
                        continue;
                    }
                    if self.try_move(Move::Relocate { i, j })? {
                        continue 'descent;
                    }
                }
            }
            return Ok(());
        }
    }

    /// Penalise the maximum-utility arcs of `current`.
    fn penalise(&mut self) {
        let mut max_utility = f64::NEG_INFINITY;
        let mut chosen: Vec<(usize, usize)> = Vec::new();

        for w in self.current.windows(2) {
            let (a, b) = (w[0], w[1]);
            let utility = self.matrix.get(a, b) as f64 / (1.0 + self.penalties.get(a, b) as f64);
            if utility > max_utility + EPSILON {
                max_utility = utility;
                chosen.clear();
                chosen.push((a, b));
            } else if (utility - max_utility).abs() <= EPSILON {
                chosen.push((a, b));
            }
        }

        for (a, b) in chosen {
            self.penalties.increment(a, b);
            self.stats.penalties += 1;
        }
    }
}

// ── GuidedLocalSearch ─────────────────────────────────────────────────────────

/// Path-cheapest-arc construction followed by guided local search until the
/// time budget or iteration cap is reached.
pub struct GuidedLocalSearch;

impl RouteSolver for GuidedLocalSearch {
    fn name(&self) -> &str {
        "GuidedLocalSearch"
    }

    fn solve(
        &self,
        matrix: &DistanceMatrix,
        start:  usize,
        goal:   usize,
        config: &SolverConfig,
    ) -> RouteResult<SolvedPath> {
        check_anchors(matrix, start, goal)?;

        let n = matrix.len();
        let mut deadline = config.deadline();
        let mut stats = SearchStats::default();

        let (initial, initial_cost) = cheapest_arc(matrix, start, goal, &mut deadline, &mut stats)
            .ok_or(RouteError::NoSolution { budget: config.time_budget })?;
        debug!("cheapest-arc construction: {n} nodes, cost {initial_cost}");

        // Three or fewer nodes leave nothing to reorder; a zero-cost path
        // cannot be beaten.
        if n <= 3 || initial_cost == 0 {
            stats.elapsed = deadline.elapsed();
            return Ok(SolvedPath {
                order:  initial,
                cost:   initial_cost,
                status: SearchStatus::Converged,
                stats,
            });
        }

        let mut search = Search {
            matrix,
            symmetric: matrix.is_symmetric(),
            penalties: PenaltyMatrix::new(n),
            lambda: 0.0,
            deadline,
            rng: SolverRng::new(config.seed),
            stats,
            current: initial.clone(),
            current_cost: initial_cost,
            best: initial,
            best_cost: initial_cost,
        };

        let status = run(&mut search, config);

        search.stats.elapsed = search.deadline.elapsed();
        debug!(
            "guided local search stopped ({status}): cost {}, {} rounds, {} moves, {} evaluations",
            search.best_cost, search.stats.iterations, search.stats.moves, search.stats.evaluations
        );

        Ok(SolvedPath {
            order: search.best,
            cost: search.best_cost,
            status,
            stats: search.stats,
        })
    }
}

/// The GLS round loop.
fn run(search: &mut Search<'_>, config: &SolverConfig) -> SearchStatus {
    let arcs = (search.current.len() - 1) as f64;
    loop {
        if config.max_iterations.is_some_and(|max| search.stats.iterations >= max) {
            return SearchStatus::IterationLimit;
        }
        if search.descend().is_err() {
            return SearchStatus::TimeLimit;
        }
        search.stats.iterations += 1;

        if search.best_cost == 0 {
            return SearchStatus::Converged;
        }
        if search.stats.iterations == 1 {
            search.lambda = config.penalty_factor * search.current_cost as f64 / arcs;
            if search.lambda <= 0.0 {
                // Without penalties every further descent ends where this one did.
                return SearchStatus::Converged;
            }
        }

        search.penalise();
        if search.deadline.check_now() {
            return SearchStatus::TimeLimit;
        }
    }
}
