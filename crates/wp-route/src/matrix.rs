//! Pairwise cost matrices.
//!
//! # Rounding policy
//!
//! The solver works on integer transition costs.  A model-built matrix
//! computes each unordered pair `{i, j}` once, truncates it toward zero and
//! writes the same value to `D[i][j]` and `D[j][i]`, so it is exactly
//! symmetric.  Matrices supplied through [`DistanceMatrix::from_rows`] may be
//! asymmetric; the solver checks [`DistanceMatrix::is_symmetric`] and picks
//! the matching move evaluation.

use wp_core::{planar_distance, CoreError, Point};

use crate::RouteResult;

// ── DistanceModel ─────────────────────────────────────────────────────────────

/// How point coordinates turn into transition costs.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase", tag = "mode"))]
pub enum DistanceModel {
    /// Haversine distance in whole metres; `x` = latitude, `y` = longitude.
    #[default]
    Geodesic,
    /// Euclidean distance multiplied by `scale` and truncated.
    Planar { scale: f64 },
}

impl DistanceModel {
    /// Default planar scale: keeps three decimals of a unit-scale canvas.
    pub const PLANAR_SCALE: f64 = 1000.0;

    pub fn planar() -> Self {
        DistanceModel::Planar { scale: Self::PLANAR_SCALE }
    }

    /// Integer cost of travelling between `a` and `b`.
    ///
    /// Non-finite or negative intermediate values saturate to `0` via the
    /// float-to-int cast; `PointSet::validate` rejects non-finite
    /// coordinates before this is reached on the routing path.
    #[inline]
    pub fn cost(&self, a: &Point, b: &Point) -> u64 {
        match *self {
            DistanceModel::Geodesic => a.geo().distance_m(b.geo()) as u64,
            DistanceModel::Planar { scale } => {
                (planar_distance(a.planar(), b.planar()) * scale) as u64
            }
        }
    }
}

// ── DistanceMatrix ────────────────────────────────────────────────────────────

/// Dense N×N table of non-negative integer costs, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceMatrix {
    n:    usize,
    data: Vec<u64>,
}

impl DistanceMatrix {
    /// Marks an arc that may never be used.
    pub const FORBIDDEN: u64 = u64::MAX;

    /// Build the matrix for `points` in their given order.
    ///
    /// Accepts any length, including 0 and 1; routing enforces its own
    /// minimum.
    pub fn from_points(points: &[Point], model: DistanceModel) -> Self {
        let n = points.len();
        let mut data = vec![0u64; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let c = model.cost(&points[i], &points[j]);
                data[i * n + j] = c;
                data[j * n + i] = c;
            }
        }
        Self { n, data }
    }

    /// Wrap caller-supplied rows.  Rows must form a square matrix with a
    /// zero diagonal.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> RouteResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(CoreError::Invalid(format!(
                    "distance matrix row {i} has {} entries, expected {n}",
                    row.len()
                ))
                .into());
            }
            if row[i] != 0 {
                return Err(CoreError::Invalid(format!(
                    "distance matrix diagonal entry {i} is {}, expected 0",
                    row[i]
                ))
                .into());
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Cost of the arc `from → to`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline(always)]
    pub fn get(&self, from: usize, to: usize) -> u64 {
        self.data[from * self.n + to]
    }

    /// Outgoing costs of `from`.
    pub fn row(&self, from: usize) -> &[u64] {
        &self.data[from * self.n..(from + 1) * self.n]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| ((i + 1)..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Sum of the arcs along `order`.
    ///
    /// Returns `None` if the order uses a forbidden arc, an index is out of
    /// bounds, or the sum overflows.
    pub fn path_cost(&self, order: &[usize]) -> Option<u64> {
        order.windows(2).try_fold(0u64, |acc, w| {
            if w[0] >= self.n || w[1] >= self.n {
                return None;
            }
            match self.get(w[0], w[1]) {
                Self::FORBIDDEN => None,
                c => acc.checked_add(c),
            }
        })
    }
}
