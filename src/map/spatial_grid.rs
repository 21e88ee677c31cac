//! Uniform-grid spatial index over blocking obstacles
//!
//! Each blocking obstacle is registered in every cell its rectangle
//! overlaps. The grid only narrows candidates; every answer is confirmed
//! with an exact geometric test.

use std::collections::HashMap;

use crate::common::Point2D;
use crate::map::geometry::{segment_bounds, segment_intersects_rect, Rect};
use crate::map::obstacle::ObstacleSet;

/// Default cell size in map units
pub const DEFAULT_CELL_SIZE: f64 = 500.0;

type CellKey = (i64, i64);

/// Sparse uniform grid of obstacle indices
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    rects: Vec<Rect>,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    /// Index the blocking obstacles of `obstacles`.
    ///
    /// `cell_size` must be positive; callers validate it through the planner
    /// configuration.
    pub fn new(obstacles: &ObstacleSet, cell_size: f64) -> Self {
        let rects: Vec<Rect> = obstacles.obstacles().iter().map(|o| o.rect).collect();
        let mut grid = SpatialGrid {
            cell_size,
            rects,
            cells: HashMap::new(),
        };

        for &index in obstacles.blocking_indices() {
            let rect = grid.rects[index];
            let (min, max) = (grid.cell_of(rect.x1, rect.y1), grid.cell_of(rect.x2, rect.y2));
            for cx in min.0..=max.0 {
                for cy in min.1..=max.1 {
                    grid.cells.entry((cx, cy)).or_default().push(index);
                }
            }
        }

        grid
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn rect(&self, index: usize) -> Option<&Rect> {
        self.rects.get(index)
    }

    fn cell_of(&self, x: f64, y: f64) -> CellKey {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    /// Blocking obstacle indices whose rectangle overlaps `region`.
    ///
    /// Sorted ascending and free of duplicates.
    pub fn region_query(&self, region: &Rect) -> Vec<usize> {
        let min = self.cell_of(region.x1, region.y1);
        let max = self.cell_of(region.x2, region.y2);
        let span = max.0.saturating_sub(min.0).saturating_add(1)
            .saturating_mul(max.1.saturating_sub(min.1).saturating_add(1));

        let mut found: Vec<usize> = Vec::new();
        if span > self.cells.len() as i64 {
            // Region covers more cells than are occupied: scan the occupied ones
            for (key, indices) in &self.cells {
                if key.0 >= min.0 && key.0 <= max.0 && key.1 >= min.1 && key.1 <= max.1 {
                    found.extend(indices);
                }
            }
        } else {
            for cx in min.0..=max.0 {
                for cy in min.1..=max.1 {
                    if let Some(indices) = self.cells.get(&(cx, cy)) {
                        found.extend(indices);
                    }
                }
            }
        }

        found.sort_unstable();
        found.dedup();
        found.retain(|&i| self.rects[i].overlaps(region));
        found
    }

    /// Lowest-index blocking obstacle containing `p`, if any
    pub fn containing_obstacle(&self, p: Point2D) -> Option<usize> {
        self.cells
            .get(&self.cell_of(p.x, p.y))?
            .iter()
            .copied()
            .filter(|&i| self.rects[i].contains(p))
            .min()
    }

    /// Whether `p` lies inside (or on the boundary of) a blocking obstacle
    pub fn point_in_any_obstacle(&self, p: Point2D) -> bool {
        match self.cells.get(&self.cell_of(p.x, p.y)) {
            Some(indices) => indices.iter().any(|&i| self.rects[i].contains(p)),
            None => false,
        }
    }

    /// Whether the segment `p1`-`p2` avoids every blocking obstacle
    pub fn segment_clear(&self, p1: Point2D, p2: Point2D) -> bool {
        if self.cells.is_empty() {
            return true;
        }
        self.region_query(&segment_bounds(p1, p2))
            .into_iter()
            .all(|i| !segment_intersects_rect(p1, p2, &self.rects[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::obstacle::{BlockingPolicy, VenueLayout};

    fn grid_for(layout: VenueLayout) -> SpatialGrid {
        let set = ObstacleSet::load(&layout, &BlockingPolicy::default()).unwrap();
        SpatialGrid::new(&set, DEFAULT_CELL_SIZE)
    }

    fn two_booths() -> SpatialGrid {
        grid_for(
            VenueLayout::new(2000.0, 2000.0)
                .with_obstacle(400.0, 400.0, 600.0, 600.0, "A", "booth")
                .with_obstacle(1200.0, 100.0, 1300.0, 1900.0, "B", "wall")
                .with_obstacle(0.0, 900.0, 100.0, 1000.0, "door", "entrance"),
        )
    }

    #[test]
    fn test_registration_spans_cells() {
        let grid = two_booths();
        // A: cells (0,0),(1,0),(0,1),(1,1); B: x cell 2, y cells 0..=3
        assert_eq!(grid.occupied_cells(), 8);
    }

    #[test]
    fn test_region_query() {
        let grid = two_booths();
        assert_eq!(grid.region_query(&Rect::new(0.0, 0.0, 2000.0, 2000.0)), vec![0, 1]);
        assert_eq!(grid.region_query(&Rect::new(450.0, 450.0, 460.0, 460.0)), vec![0]);
        assert!(grid.region_query(&Rect::new(700.0, 700.0, 800.0, 800.0)).is_empty());
        // Passable obstacles are never indexed
        assert!(grid.region_query(&Rect::new(0.0, 900.0, 100.0, 1000.0)).is_empty());
    }

    #[test]
    fn test_region_query_far_outside_map() {
        let grid = two_booths();
        let huge = Rect::new(-1.0e9, -1.0e9, 1.0e9, 1.0e9);
        assert_eq!(grid.region_query(&huge), vec![0, 1]);
    }

    #[test]
    fn test_point_in_any_obstacle() {
        let grid = two_booths();
        assert!(grid.point_in_any_obstacle(Point2D::new(500.0, 500.0)));
        assert!(grid.point_in_any_obstacle(Point2D::new(1250.0, 1000.0)));
        assert!(!grid.point_in_any_obstacle(Point2D::new(700.0, 500.0)));
        assert!(!grid.point_in_any_obstacle(Point2D::new(50.0, 950.0)));
        assert_eq!(grid.containing_obstacle(Point2D::new(500.0, 500.0)), Some(0));
        assert_eq!(grid.containing_obstacle(Point2D::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_point_on_cell_boundary() {
        let grid = grid_for(
            VenueLayout::new(1000.0, 1000.0)
                .with_obstacle(400.0, 400.0, 500.0, 500.0, "edge", "booth"),
        );
        assert!(grid.point_in_any_obstacle(Point2D::new(500.0, 500.0)));
    }

    #[test]
    fn test_segment_clear() {
        let grid = two_booths();
        let a = Point2D::new(100.0, 100.0);
        let b = Point2D::new(900.0, 900.0);
        assert!(!grid.segment_clear(a, b));
        assert!(grid.segment_clear(a, Point2D::new(900.0, 100.0)));
        assert!(!grid.segment_clear(Point2D::new(1000.0, 1000.0), Point2D::new(1500.0, 1000.0)));
        // Through the passable entrance
        assert!(grid.segment_clear(Point2D::new(0.0, 950.0), Point2D::new(150.0, 950.0)));
    }

    #[test]
    fn test_segment_clear_is_symmetric() {
        let grid = two_booths();
        let pts = [
            Point2D::new(380.0, 380.0),
            Point2D::new(620.0, 620.0),
            Point2D::new(1180.0, 80.0),
            Point2D::new(1320.0, 1920.0),
            Point2D::new(0.0, 0.0),
        ];
        for &p in &pts {
            for &q in &pts {
                assert_eq!(grid.segment_clear(p, q), grid.segment_clear(q, p));
            }
        }
    }

    #[test]
    fn test_empty_grid_is_always_clear() {
        let grid = grid_for(VenueLayout::new(100.0, 100.0));
        assert!(grid.segment_clear(Point2D::new(0.0, 0.0), Point2D::new(100.0, 100.0)));
        assert!(!grid.point_in_any_obstacle(Point2D::new(50.0, 50.0)));
    }
}
