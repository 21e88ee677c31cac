//! Geometry primitives for axis-aligned rectangles
//!
//! Rectangles are closed sets: a segment that touches an edge or a corner
//! intersects the rectangle.

use crate::common::Point2D;

/// Axis-aligned rectangle with `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    /// Create a rectangle from two opposite corners in any order
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn from_points(a: Point2D, b: Point2D) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Point2D {
        Point2D::new((self.x1 + self.x2) * 0.5, (self.y1 + self.y2) * 0.5)
    }

    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// Strict interior test (boundary excluded)
    pub fn contains_strictly(&self, p: Point2D) -> bool {
        p.x > self.x1 && p.x < self.x2 && p.y > self.y1 && p.y < self.y2
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && other.x1 <= self.x2 && self.y1 <= other.y2 && other.y1 <= self.y2
    }

    /// Rectangle grown outward by `padding` on every side
    pub fn padded(&self, padding: f64) -> Rect {
        Rect {
            x1: self.x1 - padding,
            y1: self.y1 - padding,
            x2: self.x2 + padding,
            y2: self.y2 + padding,
        }
    }

    /// Corners in counter-clockwise order starting at `(x1, y1)`
    pub fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(self.x1, self.y1),
            Point2D::new(self.x2, self.y1),
            Point2D::new(self.x2, self.y2),
            Point2D::new(self.x1, self.y2),
        ]
    }

    /// Edge midpoints: bottom, right, top, left
    pub fn edge_midpoints(&self) -> [Point2D; 4] {
        let c = self.center();
        [
            Point2D::new(c.x, self.y1),
            Point2D::new(self.x2, c.y),
            Point2D::new(c.x, self.y2),
            Point2D::new(self.x1, c.y),
        ]
    }
}

/// Bounding box of the segment `p1`-`p2`
pub fn segment_bounds(p1: Point2D, p2: Point2D) -> Rect {
    Rect::from_points(p1, p2)
}

/// Exact segment/rectangle intersection test.
///
/// Bounding boxes are compared first, then endpoint containment, then the
/// segment is clipped against the x- and y-slabs (Liang-Barsky). Endpoints
/// are put in a canonical order first so `(p1, p2)` and `(p2, p1)` always
/// agree, even in floating-point edge cases.
pub fn segment_intersects_rect(p1: Point2D, p2: Point2D, rect: &Rect) -> bool {
    let (a, b) = if (p1.x, p1.y) <= (p2.x, p2.y) { (p1, p2) } else { (p2, p1) };

    if !segment_bounds(a, b).overlaps(rect) {
        return false;
    }
    if rect.contains(a) || rect.contains(b) {
        return true;
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let slabs = [
        (-dx, a.x - rect.x1),
        (dx, rect.x2 - a.x),
        (-dy, a.y - rect.y1),
        (dy, rect.y2 - a.y),
    ];

    for (p, q) in slabs {
        if p == 0.0 {
            // Parallel to this slab boundary and outside it
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }

    t0 <= t1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Rect {
        Rect::new(400.0, 400.0, 600.0, 600.0)
    }

    #[test]
    fn test_rect_normalizes_corners() {
        let r = Rect::new(600.0, 600.0, 400.0, 400.0);
        assert_eq!(r, block());
        assert_eq!(r.width(), 200.0);
        assert_eq!(r.center(), Point2D::new(500.0, 500.0));
    }

    #[test]
    fn test_contains_is_closed() {
        let r = block();
        assert!(r.contains(Point2D::new(400.0, 500.0)));
        assert!(!r.contains_strictly(Point2D::new(400.0, 500.0)));
        assert!(r.contains_strictly(Point2D::new(500.0, 500.0)));
        assert!(!r.contains(Point2D::new(399.9, 500.0)));
    }

    #[test]
    fn test_padded_corners_and_midpoints() {
        let r = block().padded(20.0);
        assert_eq!(r.corners()[0], Point2D::new(380.0, 380.0));
        assert_eq!(r.corners()[2], Point2D::new(620.0, 620.0));
        assert_eq!(r.edge_midpoints()[1], Point2D::new(620.0, 500.0));
    }

    #[test]
    fn test_segment_crossing_rect() {
        let r = block();
        assert!(segment_intersects_rect(
            Point2D::new(100.0, 100.0),
            Point2D::new(900.0, 900.0),
            &r
        ));
        assert!(segment_intersects_rect(
            Point2D::new(300.0, 500.0),
            Point2D::new(700.0, 500.0),
            &r
        ));
    }

    #[test]
    fn test_segment_missing_rect() {
        let r = block();
        // Overlapping bounding boxes, but the segment passes by the corner
        assert!(!segment_intersects_rect(
            Point2D::new(300.0, 600.0),
            Point2D::new(400.0, 700.0),
            &r
        ));
        // Disjoint bounding boxes
        assert!(!segment_intersects_rect(
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 50.0),
            &r
        ));
        // Parallel outside a slab
        assert!(!segment_intersects_rect(
            Point2D::new(380.0, 0.0),
            Point2D::new(380.0, 1000.0),
            &r
        ));
    }

    #[test]
    fn test_segment_touching_corner_is_blocked() {
        let r = block();
        assert!(segment_intersects_rect(
            Point2D::new(300.0, 500.0),
            Point2D::new(500.0, 700.0),
            &r
        ));
    }

    #[test]
    fn test_segment_with_endpoint_inside() {
        let r = block();
        assert!(segment_intersects_rect(
            Point2D::new(500.0, 500.0),
            Point2D::new(900.0, 900.0),
            &r
        ));
        // Degenerate segment (single point) inside
        let p = Point2D::new(450.0, 450.0);
        assert!(segment_intersects_rect(p, p, &r));
    }

    #[test]
    fn test_zero_area_rect_blocks_crossing() {
        let wall = Rect::new(500.0, 0.0, 500.0, 1000.0);
        assert!(segment_intersects_rect(
            Point2D::new(0.0, 500.0),
            Point2D::new(1000.0, 500.0),
            &wall
        ));
        assert!(!segment_intersects_rect(
            Point2D::new(0.0, 500.0),
            Point2D::new(499.0, 900.0),
            &wall
        ));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let r = block();
        let a = Point2D::new(123.4, 987.6);
        let b = Point2D::new(605.0, 399.0);
        assert_eq!(
            segment_intersects_rect(a, b, &r),
            segment_intersects_rect(b, a, &r)
        );
    }
}
