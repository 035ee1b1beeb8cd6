//! `wp-grid` — traversal-cost grids over obstacle and walkway map data.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`grid`]       | `BBox`, `Cell`, `Grid`, `GridBuilder`                     |
//! | [`obstacle`]   | `ObstacleTest` trait, `Barrier` (polygon / line string)   |
//! | [`way`]        | `Node`, `Way`, walkway resampling                         |
//! | [`index`]      | `NearestReference` trait, `ReferenceIndex` (R-tree)       |
//! | [`cost`]       | `CostShape`, `CostMapConfig`, `CostMapBuilder`            |
//! | [`map`]        | `MapData`, `build_cost_grid`, `build_cost_grid_for_map`   |
//! | [`csv`](self::csv) | `GridCsvWriter`                                           |
//! | [`error`]      | `GridError`, `GridResult<T>`                              |
//!
//! # Pipeline
//!
//! ```text
//! BBox ──GridBuilder──▶ Grid ─┐
//!                             ├──CostMapBuilder──▶ cost-annotated Grid
//! Barriers, Ways ──resample──▶ ReferenceIndex ─┘
//! ```
//!
//! Obstacle cells cost `+∞`; free cells cost the shaped distance ratio to the
//! nearest walkway sample, or the off-path sentinel beyond `max_path_dist`.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Rayon for the per-cell pass and per-way resampling.       |
//! | `serde`    | Derives `Serialize`/`Deserialize` on data and config types.|

pub mod cost;
pub mod csv;
pub mod error;
pub mod grid;
pub mod index;
pub mod map;
pub mod obstacle;
pub mod way;

#[cfg(test)]
mod tests;

pub use cost::{CostMapBuilder, CostMapConfig, CostShape, OBSTACLE_COST, OFF_PATH_COST};
pub use self::csv::GridCsvWriter;
pub use error::{GridError, GridResult};
pub use grid::{BBox, Cell, Grid, GridBuilder, DEFAULT_MAX_CELLS};
pub use index::{NearestReference, Reference, ReferenceIndex};
pub use map::{build_cost_grid, build_cost_grid_for_map, MapData};
pub use obstacle::{Barrier, ObstacleTest};
pub use way::{resample_ways, Node, Way, MAX_SEGMENT_SAMPLES, MIN_SEGMENT_LEN};
