//! planner — route a JSON point set and optionally build a cost grid.
//!
//! ```text
//! planner <request.json> [--csv <grid.csv>]
//! ```
//!
//! The request holds the points, an optional distance model and solver
//! configuration, and an optional `grid` section describing the map
//! snapshot.  The answer is printed to stdout as JSON.  Set `RUST_LOG=debug`
//! to follow the search.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

use wp_core::{PointSet, WayId};
use wp_grid::{build_cost_grid, BBox, Barrier, CostMapConfig, Grid, GridCsvWriter, MapData, Way};
use wp_route::{route_with, DistanceModel, GuidedLocalSearch, RouteError, SolverConfig};

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Request {
    points: PointSet,
    #[serde(default)]
    model:  DistanceModel,
    #[serde(default)]
    solver: SolverConfig,
    grid:   Option<GridRequest>,
}

/// Map snapshot in bare-coordinate form.
#[derive(Deserialize)]
struct GridRequest {
    bbox:      BBox,
    cell_size: f64,
    /// Polygon exterior rings.
    #[serde(default)]
    barriers:  Vec<Vec<[f64; 2]>>,
    /// Open line-string barriers.
    #[serde(default)]
    walls:     Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    ways:      Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    config:    CostMapConfig,
}

impl GridRequest {
    fn map_data(&self) -> MapData {
        let barriers = self.barriers.iter().cloned().map(Barrier::polygon);
        let walls = self.walls.iter().cloned().map(Barrier::line);
        let ways = self
            .ways
            .iter()
            .enumerate()
            .map(|(i, coords)| Way::from_coords(WayId(i as u64), coords));

        MapData {
            bbox:     self.bbox,
            barriers: barriers.chain(walls).collect(),
            ways:     ways.collect(),
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

struct Args {
    request: PathBuf,
    csv:     Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut request = None;
    let mut csv = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--csv" => csv = Some(PathBuf::from(args.next().context("--csv needs a path")?)),
            _ if request.is_none() => request = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{arg}'"),
        }
    }
    let request = request.context("usage: planner <request.json> [--csv <grid.csv>]")?;
    Ok(Args { request, csv })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let text = fs::read_to_string(&args.request)
        .with_context(|| format!("reading {}", args.request.display()))?;
    let request: Request = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.request.display()))?;

    let mut answer = route_answer(&request)?;

    if let Some(grid_req) = &request.grid {
        let grid = build_cost_grid(grid_req.bbox, grid_req.cell_size, &grid_req.map_data(), &grid_req.config)
            .context("building cost grid")?;
        answer["grid"] = grid_summary(&grid);

        if let Some(path) = &args.csv {
            GridCsvWriter::create(path)?.write_grid(&grid)?;
            info!("cost grid written to {}", path.display());
        }
    } else if args.csv.is_some() {
        warn!("--csv given but the request has no grid section");
    }

    println!("{}", serde_json::to_string_pretty(&answer)?);
    Ok(())
}

/// Route the request's points.  Search failures become an unsuccessful
/// answer; anything else aborts.
fn route_answer(request: &Request) -> Result<serde_json::Value> {
    match route_with(&request.points, request.model, &GuidedLocalSearch, &request.solver) {
        Ok(route) => {
            let path: Vec<_> = route
                .points(&request.points)
                .into_iter()
                .map(|p| json!({ "id": p.id, "x": p.x, "y": p.y, "role": p.role }))
                .collect();
            Ok(json!({
                "success":    true,
                "path":       path,
                "total_cost": route.total_cost,
                "status":     route.status,
                "message":    format!("{} points routed ({})", route.path.len(), route.status),
            }))
        }
        Err(err @ (RouteError::Precondition(_) | RouteError::NoSolution { .. })) => {
            warn!("routing failed: {err}");
            Ok(json!({ "success": false, "message": err.to_string() }))
        }
        Err(err) => Err(err).context("route failed its integrity check"),
    }
}

fn grid_summary(grid: &Grid) -> serde_json::Value {
    let free: Vec<f64> = grid
        .cells()
        .iter()
        .filter(|c| c.is_traversable())
        .map(|c| c.cost)
        .collect();
    json!({
        "rows":      grid.rows(),
        "cols":      grid.cols(),
        "cells":     grid.len(),
        "obstacles": grid.obstacle_count(),
        "min_cost":  free.iter().copied().reduce(f64::min),
        "max_cost":  free.iter().copied().reduce(f64::max),
    })
}
