//! Routing points and the request-scoped point collection.
//!
//! A `PointSet` is owned by exactly one request.  Nothing in the workspace
//! keeps a point list in global state: callers build a set, hand a shared
//! reference to the distance model and solver, and drop it afterwards.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult, GeoPoint, PointId};

// ── Role ─────────────────────────────────────────────────────────────────────

/// What a point means to the route.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    /// First stop of every route.
    Start,
    /// Last stop of every route.
    Goal,
    /// Any stop in between, visited exactly once in an order of the solver's
    /// choosing.
    #[default]
    Intermediate,
}

impl Role {
    /// Lower-case label, as used by the collection surfaces.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Start        => "start",
            Role::Goal         => "goal",
            Role::Intermediate => "intermediate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start"        => Ok(Role::Start),
            "goal"         => Ok(Role::Goal),
            "intermediate" => Ok(Role::Intermediate),
            other          => Err(CoreError::Invalid(format!("unknown point role '{other}'"))),
        }
    }
}

// ── Point ────────────────────────────────────────────────────────────────────

/// One routing point.
///
/// `x`/`y` hold latitude/longitude for geodesic routing and plain planar
/// coordinates otherwise; the distance model decides how to read them.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub id:   PointId,
    pub x:    f64,
    pub y:    f64,
    pub role: Role,
}

impl Point {
    #[inline]
    pub fn new(id: PointId, x: f64, y: f64, role: Role) -> Self {
        Self { id, x, y, role }
    }

    /// Interpret the coordinates as `(lat, lon)`.
    #[inline]
    pub fn geo(&self) -> GeoPoint {
        GeoPoint::new(self.x, self.y)
    }

    #[inline]
    pub fn planar(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// `true` if both points sit on exactly the same coordinates.
    #[inline]
    pub fn coincides_with(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }
}

// ── PointSet ─────────────────────────────────────────────────────────────────

/// Positions of the two anchor points inside a validated `PointSet`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Anchors {
    pub start: usize,
    pub goal:  usize,
}

/// An ordered, request-scoped collection of routing points.
///
/// Insertion order defines the row/column order of the distance matrix.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { points: Vec::with_capacity(n) }
    }

    /// Append a point with the next sequential id and return that id.
    ///
    /// Sequential ids start at the current length, so mixing this with
    /// [`push`](Self::push) can produce duplicates; `validate` reports them.
    pub fn add_point(&mut self, x: f64, y: f64, role: Role) -> PointId {
        let id = PointId(self.points.len() as u32);
        self.points.push(Point::new(id, x, y, role));
        id
    }

    /// Append a point with a caller-chosen id.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    /// Look a point up by id (linear scan; sets are small).
    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Position of the point with `id` in insertion order.
    pub fn position(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    /// The first point with role `Start`, if any.
    pub fn start(&self) -> Option<&Point> {
        self.points.iter().find(|p| p.role == Role::Start)
    }

    /// The first point with role `Goal`, if any.
    pub fn goal(&self) -> Option<&Point> {
        self.points.iter().find(|p| p.role == Role::Goal)
    }

    /// Check everything routing requires and return the anchor positions.
    ///
    /// Requires at least two points, exactly one start, exactly one goal,
    /// unique ids and finite coordinates.
    pub fn validate(&self) -> CoreResult<Anchors> {
        if self.points.len() < 2 {
            return Err(CoreError::TooFewPoints { required: 2, got: self.points.len() });
        }

        let mut seen = HashSet::with_capacity(self.points.len());
        let mut start = None;
        let mut goal = None;

        for (i, p) in self.points.iter().enumerate() {
            if !seen.insert(p.id) {
                return Err(CoreError::DuplicatePointId(p.id));
            }
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(CoreError::NonFiniteCoordinate(p.id));
            }
            let slot = match p.role {
                Role::Start        => &mut start,
                Role::Goal         => &mut goal,
                Role::Intermediate => continue,
            };
            if slot.replace(i).is_some() {
                return Err(CoreError::DuplicateRole(p.role));
            }
        }

        Ok(Anchors {
            start: start.ok_or(CoreError::MissingRole(Role::Start))?,
            goal:  goal.ok_or(CoreError::MissingRole(Role::Goal))?,
        })
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
