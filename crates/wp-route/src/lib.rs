//! `wp-route` — distance models and fixed-endpoint route search.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`matrix`]    | `DistanceModel`, `DistanceMatrix`                         |
//! | [`solver`]    | `RouteSolver` trait, `SolverConfig`, `CheapestArc`        |
//! | [`gls`]       | `GuidedLocalSearch`                                       |
//! | [`monitor`]   | `Deadline` (throttled wall-clock cutoff)                  |
//! | [`route`]     | `route`, `route_with`, `verify_path`, `Route`             |
//! | [`error`]     | `RouteError`, `RouteResult<T>`                            |
//!
//! # Pipeline
//!
//! ```text
//! PointSet ──validate──▶ DistanceMatrix ──RouteSolver──▶ order ──verify──▶ Route
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use wp_core::{PointSet, Role};
//!
//! let mut points = PointSet::new();
//! points.add_point(0.0, 0.0, Role::Start);
//! points.add_point(0.0, 1.0, Role::Goal);
//! let route = wp_route::route(&points, Duration::from_secs(1))?;
//! assert_eq!(route.total_cost, 111_194);
//! ```
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on config and result types.|

mod construct;
pub mod error;
pub mod gls;
pub mod matrix;
pub mod monitor;
pub mod route;
pub mod solver;


pub use error::{RouteError, RouteResult};
pub use gls::GuidedLocalSearch;
pub use matrix::{DistanceMatrix, DistanceModel};
pub use monitor::Deadline;
pub use route::{route, route_with, verify_path, Route};
pub use solver::{CheapestArc, RouteSolver, SearchStats, SearchStatus, SolvedPath, SolverConfig};
