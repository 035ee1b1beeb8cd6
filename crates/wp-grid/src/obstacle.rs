//! Barrier geometry and the obstacle-test capability.
//!
//! The cost-map pass only asks "is this sample inside an obstacle?", through
//! [`ObstacleTest`].  [`Barrier`] answers it with `geo` geometry; other
//! backends (raster masks, prepared geometry) can implement the trait
//! without changing [`CostMapBuilder`][crate::CostMapBuilder].

use geo::{Intersects, LineString, Point, Polygon};

/// Point-in-obstacle capability.
///
/// Implementations must be `Send + Sync`: the `parallel` feature shares one
/// slice of obstacles across Rayon workers.
pub trait ObstacleTest: Send + Sync {
    /// `true` if `p` is inside or on the boundary of the obstacle.
    fn contains(&self, p: [f64; 2]) -> bool;
}

/// An impassable region.
#[derive(Clone, Debug, PartialEq)]
pub enum Barrier {
    /// Closed region; interior and boundary are blocked.
    Polygon(Polygon<f64>),
    /// Open polyline (wall, fence); only points on the line are blocked.
    Line(LineString<f64>),
}

impl Barrier {
    /// Polygon from its exterior ring; the ring is closed automatically.
    pub fn polygon(exterior: Vec<[f64; 2]>) -> Self {
        Barrier::Polygon(Polygon::new(LineString::from(exterior), vec![]))
    }

    /// Axis-aligned rectangle.
    pub fn rect(min: [f64; 2], max: [f64; 2]) -> Self {
        Self::polygon(vec![min, [max[0], min[1]], max, [min[0], max[1]]])
    }

    pub fn line(points: Vec<[f64; 2]>) -> Self {
        Barrier::Line(LineString::from(points))
    }

    /// `true` if every vertex has finite coordinates.
    pub fn is_finite(&self) -> bool {
        let finite = |ring: &LineString<f64>| ring.coords().all(|c| c.x.is_finite() && c.y.is_finite());
        match self {
            Barrier::Polygon(poly) => finite(poly.exterior()) && poly.interiors().iter().all(finite),
            Barrier::Line(line) => finite(line),
        }
    }
}

impl ObstacleTest for Barrier {
    fn contains(&self, p: [f64; 2]) -> bool {
        let pt = Point::new(p[0], p[1]);
        match self {
            Barrier::Polygon(poly) => poly.intersects(&pt),
            Barrier::Line(line) => line.intersects(&pt),
        }
    }
}
