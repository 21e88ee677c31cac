//! Snaps query points that fall inside an obstacle to a nearby clear point
//!
//! Booth coordinates usually sit in the middle of the booth rectangle, which
//! is blocked. The resolver moves such a point just outside the containing
//! obstacle: it evaluates the four padded edge midpoints and the four padded
//! corners and keeps the closest one that is clear and inside the map.

use log::debug;

use crate::common::Point2D;
use crate::map::{ObstacleSet, Rect, SpatialGrid};

/// Resolves raw query points against one obstacle set
pub struct PointResolver<'a> {
    obstacles: &'a ObstacleSet,
    grid: &'a SpatialGrid,
    padding: f64,
}

impl<'a> PointResolver<'a> {
    pub fn new(obstacles: &'a ObstacleSet, grid: &'a SpatialGrid, padding: f64) -> Self {
        Self { obstacles, grid, padding }
    }

    /// Candidate projections for a point inside `rect`.
    ///
    /// Padded edge midpoints (bottom, right, top, left) come first, then the
    /// padded corners; on equal displacement the earlier candidate wins.
    pub fn candidates(&self, rect: &Rect) -> [Point2D; 8] {
        let padded = rect.padded(self.padding);
        let [m0, m1, m2, m3] = padded.edge_midpoints();
        let [c0, c1, c2, c3] = padded.corners();
        [m0, m1, m2, m3, c0, c1, c2, c3]
    }

    fn is_usable(&self, p: Point2D) -> bool {
        self.obstacles.in_bounds(p) && !self.grid.point_in_any_obstacle(p)
    }

    /// Return `p` if clear, else the nearest usable candidate around the
    /// obstacle containing it. Falls back to `p` itself when no candidate is
    /// usable (nested or packed obstacles).
    pub fn resolve(&self, p: Point2D) -> Point2D {
        let index = match self.grid.containing_obstacle(p) {
            Some(index) => index,
            None => return p,
        };
        let rect = match self.grid.rect(index) {
            Some(rect) => *rect,
            None => return p,
        };

        let mut best: Option<(f64, Point2D)> = None;
        for candidate in self.candidates(&rect) {
            if !self.is_usable(candidate) {
                continue;
            }
            let d = p.distance(&candidate);
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, candidate));
            }
        }

        match best {
            Some((d, resolved)) => {
                debug!(
                    "resolved ({:.1}, {:.1}) inside obstacle #{} to ({:.1}, {:.1}), moved {:.1}",
                    p.x, p.y, index, resolved.x, resolved.y, d
                );
                resolved
            }
            None => {
                debug!(
                    "no clear projection for ({:.1}, {:.1}) inside obstacle #{}",
                    p.x, p.y, index
                );
                p
            }
        }
    }
}
