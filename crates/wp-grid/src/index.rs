//! Nearest-reference lookup over resampled walkway points.
//!
//! The proximity pass asks one question per cell: how far is the nearest
//! walkway sample?  [`NearestReference`] is that capability;
//! [`ReferenceIndex`] answers it with an `rstar` R-tree bulk-loaded once per
//! map snapshot and then shared read-only.

use log::warn;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use wp_core::WayId;

use crate::GridResult;

// ── Reference ─────────────────────────────────────────────────────────────────

/// A resampled walkway point and the way it came from.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    pub point: [f64; 2],
    pub way:   WayId,
}

impl RTreeObject for Reference {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for Reference {
    /// Squared planar distance.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NearestReference ──────────────────────────────────────────────────────────

/// Nearest-neighbour query over reference points.
pub trait NearestReference: Send + Sync {
    /// Euclidean distance to, and identity of, the reference nearest to `p`.
    /// `None` when there are no references.
    fn nearest(&self, p: [f64; 2]) -> Option<(f64, Reference)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── ReferenceIndex ────────────────────────────────────────────────────────────

/// R-tree over [`Reference`] points.
pub struct ReferenceIndex {
    tree: RTree<Reference>,
}

impl ReferenceIndex {
    /// Bulk-load the tree from `references`.
    ///
    /// References with a non-finite coordinate cannot be ordered in the tree
    /// and are dropped.
    pub fn new(mut references: Vec<Reference>) -> Self {
        let before = references.len();
        references.retain(|r| r.point.iter().all(|c| c.is_finite()));
        if references.len() < before {
            warn!("dropped {} non-finite reference points", before - references.len());
        }
        Self { tree: RTree::bulk_load(references) }
    }

    /// Resample `ways` at `max_step` and index the result.
    pub fn from_ways(ways: &[crate::Way], max_step: f64) -> GridResult<Self> {
        Ok(Self::new(crate::resample_ways(ways, max_step)?))
    }
}

impl NearestReference for ReferenceIndex {
    fn nearest(&self, p: [f64; 2]) -> Option<(f64, Reference)> {
        self.tree
            .nearest_neighbor(&p)
            .map(|r| (r.distance_2(&p).sqrt(), *r))
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}
