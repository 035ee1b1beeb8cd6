//! `wp-core` — foundational types for the `waypath` route planner.
//!
//! This crate is a dependency of every other `wp-*` crate.  It has no `wp-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `PointId`, `NodeId`, `WayId`                              |
//! | [`geo`]     | `GeoPoint`, haversine distance, planar distance           |
//! | [`point`]   | `Point`, `Role`, request-scoped `PointSet`                |
//! | [`rng`]     | `SolverRng` (seeded, per solve)                           |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod point;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{planar_distance, GeoPoint, EARTH_RADIUS_M};
pub use ids::{NodeId, PointId, WayId};
pub use point::{Anchors, Point, PointSet, Role};
pub use rng::SolverRng;
