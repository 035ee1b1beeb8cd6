//! Proximity-shaped traversal costs.
//!
//! A free cell's cost depends only on the distance `d` to the nearest
//! walkway sample.  Inside `max_path_dist` the distance is normalised to
//! `ratio = d / max_path_dist` and passed through the [`CostShape`];
//! beyond it the cell gets `off_path_cost`, a finite sentinel well above any
//! shaped value.  Obstacle cells cost [`OBSTACLE_COST`] whatever their
//! distance.

use std::fmt;
use std::str::FromStr;

use log::info;

use crate::{Grid, GridError, GridResult, NearestReference, ObstacleTest, ReferenceIndex, Way};

/// Cost of a cell inside an obstacle.
pub const OBSTACLE_COST: f64 = f64::INFINITY;

/// Default cost of a cell farther than `max_path_dist` from every walkway.
pub const OFF_PATH_COST: f64 = 1e6;

// ── CostShape ─────────────────────────────────────────────────────────────────

/// Transform from normalised distance ratio (`0 ..= 1`) to cost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CostShape {
    Linear,
    #[default]
    Quadratic,
    /// Every on-path cell is free.
    Zero,
}

impl CostShape {
    pub fn as_str(self) -> &'static str {
        match self {
            CostShape::Linear => "linear",
            CostShape::Quadratic => "quadratic",
            CostShape::Zero => "zero",
        }
    }

    #[inline]
    pub fn apply(self, ratio: f64) -> f64 {
        match self {
            CostShape::Linear => ratio,
            CostShape::Quadratic => ratio * ratio,
            CostShape::Zero => 0.0,
        }
    }
}

impl fmt::Display for CostShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostShape {
    type Err = GridError;

    fn from_str(s: &str) -> GridResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(CostShape::Linear),
            "quadratic" => Ok(CostShape::Quadratic),
            "zero" => Ok(CostShape::Zero),
            _ => Err(GridError::UnknownCostShape(s.to_owned())),
        }
    }
}

// ── CostMapConfig ─────────────────────────────────────────────────────────────

/// Parameters of the proximity pass.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostMapConfig {
    /// Distance at and beyond which a cell counts as off-path.
    pub max_path_dist: f64,
    /// Longest gap between consecutive resampled walkway points.
    pub max_way_step:  f64,
    pub cost_shape:    CostShape,
    /// Cost of off-path cells; finite and `>= 1`.
    pub off_path_cost: f64,
}

impl Default for CostMapConfig {
    fn default() -> Self {
        Self {
            max_path_dist: 1.0,
            max_way_step:  0.25,
            cost_shape:    CostShape::Quadratic,
            off_path_cost: OFF_PATH_COST,
        }
    }
}

impl CostMapConfig {
    pub fn with_shape(mut self, shape: CostShape) -> Self {
        self.cost_shape = shape;
        self
    }

    /// Check every parameter before any per-cell work starts.
    pub fn validate(&self) -> GridResult<()> {
        for (name, value) in [("max_path_dist", self.max_path_dist), ("max_way_step", self.max_way_step)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GridError::Config(format!("{name} must be positive and finite, got {value}")));
            }
        }
        if !self.off_path_cost.is_finite() || self.off_path_cost < 1.0 {
            return Err(GridError::Config(format!(
                "off_path_cost must be finite and at least 1, got {}",
                self.off_path_cost
            )));
        }
        Ok(())
    }

    /// Cost of a free cell at distance `d` from the nearest reference.
    #[inline]
    pub fn proximity_cost(&self, d: f64) -> f64 {
        if d < self.max_path_dist {
            self.cost_shape.apply(d / self.max_path_dist)
        } else {
            self.off_path_cost
        }
    }
}

// ── CostMapBuilder ────────────────────────────────────────────────────────────

/// Annotates a [`Grid`] with obstacle flags and proximity costs.
pub struct CostMapBuilder {
    config: CostMapConfig,
}

impl CostMapBuilder {
    /// Fails if `config` does not validate.
    pub fn new(config: CostMapConfig) -> GridResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CostMapConfig {
        &self.config
    }

    /// Resample `ways`, index them, and annotate every cell of `grid`.
    ///
    /// Fails before any cell is touched if a way cannot be resampled; see
    /// [`Way::resample`].
    pub fn build<B: ObstacleTest>(&self, grid: Grid, barriers: &[B], ways: &[Way]) -> GridResult<Grid> {
        let index = ReferenceIndex::from_ways(ways, self.config.max_way_step)?;
        Ok(self.build_with_index(grid, barriers, &index))
    }

    /// Annotate every cell of `grid` against `barriers` and a prepared index.
    pub fn build_with_index<B, N>(&self, mut grid: Grid, barriers: &[B], index: &N) -> Grid
    where
        B: ObstacleTest,
        N: NearestReference + ?Sized,
    {
        let config = &self.config;
        let annotate = |cell: &mut crate::Cell| {
            let p = [cell.x, cell.y];
            cell.obstacle |= barriers.iter().any(|b| b.contains(p));
            cell.cost = if cell.obstacle {
                OBSTACLE_COST
            } else {
                index
                    .nearest(p)
                    .map_or(config.off_path_cost, |(d, _)| config.proximity_cost(d))
            };
        };

        #[cfg(not(feature = "parallel"))]
        grid.cells_mut().iter_mut().for_each(annotate);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            grid.cells_mut().par_iter_mut().for_each(annotate);
        }

        let off_path = grid
            .cells()
            .iter()
            .filter(|c| !c.obstacle && c.cost >= config.off_path_cost)
            .count();
        info!(
            "cost map: {} cells, {} obstacles, {} off-path, {} references ({} shape)",
            grid.len(),
            grid.obstacle_count(),
            off_path,
            index.len(),
            config.cost_shape
        );
        grid
    }
}
