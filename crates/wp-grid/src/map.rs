//! Pre-loaded map snapshot and the one-call cost-grid entry points.

use wp_core::CoreError;

use crate::{BBox, Barrier, CostMapBuilder, CostMapConfig, Grid, GridBuilder, GridResult, Way};

/// Spatial dataset for one map snapshot: the region of interest, its
/// impassable barriers and its preferred walkways.
#[derive(Clone, Debug, PartialEq)]
pub struct MapData {
    pub bbox:     BBox,
    pub barriers: Vec<Barrier>,
    pub ways:     Vec<Way>,
}

impl MapData {
    pub fn new(bbox: BBox) -> Self {
        Self { bbox, barriers: Vec::new(), ways: Vec::new() }
    }

    pub fn with_barrier(mut self, barrier: Barrier) -> Self {
        self.barriers.push(barrier);
        self
    }

    pub fn with_way(mut self, way: Way) -> Self {
        self.ways.push(way);
        self
    }

    /// Every barrier and way coordinate must be finite.
    pub fn validate(&self) -> GridResult<()> {
        if let Some(i) = self.barriers.iter().position(|b| !b.is_finite()) {
            return Err(CoreError::Invalid(format!("barrier {i} has a non-finite coordinate")).into());
        }
        self.ways.iter().try_for_each(Way::validate)
    }
}

/// Build the lattice over `bbox` and annotate it from `map`.
///
/// `config` and `map` are validated before the grid is laid out.
pub fn build_cost_grid(
    bbox:      BBox,
    cell_size: f64,
    map:       &MapData,
    config:    &CostMapConfig,
) -> GridResult<Grid> {
    let builder = CostMapBuilder::new(*config)?;
    map.validate()?;
    let grid = GridBuilder::new(bbox, cell_size).build()?;
    builder.build(grid, &map.barriers, &map.ways)
}

/// [`build_cost_grid`] over the map's own bounding box.
pub fn build_cost_grid_for_map(map: &MapData, cell_size: f64, config: &CostMapConfig) -> GridResult<Grid> {
    build_cost_grid(map.bbox, cell_size, map, config)
}
