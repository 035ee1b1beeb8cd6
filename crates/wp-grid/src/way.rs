//! Walkways and their resampling into reference points.
//!
//! Each way is walked segment by segment.  A segment of length `L` emits
//! `ceil(L / max_step)` evenly spaced points ending exactly on its end node;
//! the way's first node is emitted once, before its first segment.  Segments
//! of length `<= MIN_SEGMENT_LEN` emit only their end node.  A segment
//! that would need more than [`MAX_SEGMENT_SAMPLES`] points is rejected, as
//! is any node with a non-finite coordinate.

use wp_core::{CoreError, NodeId, WayId};

use crate::{GridError, GridResult, Reference};

/// Segments this short are not subdivided.
pub const MIN_SEGMENT_LEN: f64 = 1e-3;

/// Upper bound on the points one segment may expand into.
pub const MAX_SEGMENT_SAMPLES: usize = 1 << 20;

/// A walkway vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub x:  f64,
    pub y:  f64,
}

impl Node {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[inline]
    pub fn pos(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A preferred walkway polyline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    pub id:    WayId,
    pub nodes: Vec<Node>,
}

impl Way {
    pub fn new(id: WayId, nodes: Vec<Node>) -> Self {
        Self { id, nodes }
    }

    /// Build a way from bare coordinates, numbering nodes from 0.
    pub fn from_coords(id: WayId, coords: &[[f64; 2]]) -> Self {
        let nodes = coords
            .iter()
            .enumerate()
            .map(|(i, c)| Node::new(NodeId(i as u64), c[0], c[1]))
            .collect();
        Self { id, nodes }
    }

    /// Fails on the first node with a non-finite coordinate.
    pub fn validate(&self) -> GridResult<()> {
        match self.nodes.iter().find(|n| !n.is_finite()) {
            Some(n) => Err(CoreError::Invalid(format!(
                "way {} node {} has a non-finite coordinate ({}, {})",
                self.id, n.id, n.x, n.y
            ))
            .into()),
            None => Ok(()),
        }
    }

    /// Resampled points of this way, in walking order.
    ///
    /// A non-positive or non-finite `max_step` disables subdivision: only
    /// the nodes themselves are emitted.
    ///
    /// # Errors
    ///
    /// - [`GridError::Precondition`] if a node coordinate is not finite.
    /// - [`GridError::Config`] if a segment needs more than
    ///   [`MAX_SEGMENT_SAMPLES`] points at `max_step`.
    pub fn resample(&self, max_step: f64) -> GridResult<Vec<[f64; 2]>> {
        self.validate()?;

        let mut out = Vec::new();
        if let [only] = self.nodes.as_slice() {
            out.push(only.pos());
            return Ok(out);
        }

        let subdivide = max_step.is_finite() && max_step > 0.0;
        for (i, pair) in self.nodes.windows(2).enumerate() {
            let (a, b) = (pair[0].pos(), pair[1].pos());
            if i == 0 {
                out.push(a);
            }

            let len = (b[0] - a[0]).hypot(b[1] - a[1]);
            if len <= MIN_SEGMENT_LEN || !subdivide {
                out.push(b);
                continue;
            }

            // Bound the count in f64 before the cast so it cannot saturate.
            let count = (len / max_step).ceil();
            if !count.is_finite() || count > MAX_SEGMENT_SAMPLES as f64 {
                return Err(GridError::Config(format!(
                    "way {} segment {i} of length {len} needs {count} samples at step {max_step} \
                     (limit {MAX_SEGMENT_SAMPLES})",
                    self.id
                )));
            }
            let count = count as usize;
            for k in 1..count {
                let t = k as f64 / count as f64;
                out.push([a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]);
            }
            out.push(b);
        }
        Ok(out)
    }
}

/// Every way's resampled points tagged with their way id, in way order.
///
/// Fails with the first error of any way; see [`Way::resample`].
pub fn resample_ways(ways: &[Way], max_step: f64) -> GridResult<Vec<Reference>> {
    let tag = |way: &Way| -> GridResult<Vec<Reference>> {
        Ok(way
            .resample(max_step)?
            .into_iter()
            .map(|point| Reference { point, way: way.id })
            .collect())
    };

    #[cfg(not(feature = "parallel"))]
    {
        let per_way = ways.iter().map(tag).collect::<GridResult<Vec<_>>>()?;
        Ok(per_way.concat())
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        // Indexed collect keeps way order, so the output matches the
        // sequential build.
        let per_way = ways.par_iter().map(tag).collect::<GridResult<Vec<_>>>()?;
        Ok(per_way.concat())
    }
}
