//! Post-search path smoothing
//!
//! - String pulling: drop intermediate waypoints whenever a later waypoint is
//!   directly visible.
//! - Densification: insert evenly spaced points on long segments so
//!   renderers can place markers along the route. Geometry is unchanged.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::common::{Path2D, Point2D};
use crate::map::SpatialGrid;

/// Line-of-sight shortcutting against one spatial grid
pub struct PathSmoother<'a> {
    grid: &'a SpatialGrid,
}

impl<'a> PathSmoother<'a> {
    pub fn new(grid: &'a SpatialGrid) -> Self {
        Self { grid }
    }

    /// Greedy string pulling.
    ///
    /// From the current waypoint, jump to the farthest later waypoint with a
    /// clear segment. Consecutive waypoints of a searched path are always
    /// clear, so every step advances. Worst case O(n^2) clearance tests.
    pub fn string_pull(&self, path: &Path2D) -> Path2D {
        let points = &path.points;
        if points.len() <= 2 {
            return path.clone();
        }

        let mut smoothed = vec![points[0]];
        let mut i = 0;
        while i < points.len() - 1 {
            let furthest = (i + 2..points.len())
                .rev()
                .find(|&j| self.grid.segment_clear(points[i], points[j]))
                .unwrap_or(i + 1);
            smoothed.push(points[furthest]);
            i = furthest;
        }

        Path2D::from_points(smoothed)
    }
}

/// Upper bound on pieces a single segment is split into
pub const MAX_SEGMENT_PIECES: usize = 1024;

/// Densification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensifyConfig {
    /// Segments longer than this get intermediate points
    pub max_segment_length: f64,
    /// Target spacing between inserted points
    pub spacing: f64,
}

impl Default for DensifyConfig {
    fn default() -> Self {
        Self {
            max_segment_length: 400.0,
            spacing: 200.0,
        }
    }
}

/// Insert evenly spaced points on every segment longer than
/// `max_segment_length`. Original waypoints are all kept. A segment is split
/// into at most [`MAX_SEGMENT_PIECES`] pieces.
pub fn densify(path: &Path2D, config: &DensifyConfig) -> Path2D {
    let Some(first) = path.first() else {
        return path.clone();
    };
    if config.spacing <= 0.0 {
        return path.clone();
    }

    let mut points = vec![first];
    for (a, b) in path.points.iter().tuple_windows() {
        let length = a.distance(b);
        if length > config.max_segment_length {
            let pieces = ((length / config.spacing) as usize).min(MAX_SEGMENT_PIECES);
            let (va, vb) = (a.to_vector(), b.to_vector());
            for k in 1..pieces {
                let t = k as f64 / pieces as f64;
                points.push(Point2D::from(va + (vb - va) * t));
            }
        }
        points.push(*b);
    }

    Path2D::from_points(points)
}
