//! Common types used throughout venue_nav

use itertools::Itertools;
use nalgebra::Vector2;

/// Resolution of the quantized grid used to key points (map units).
pub const POINT_KEY_RESOLUTION: f64 = 1e-3;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn to_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Quantized key for hashing and equality
    pub fn key(&self) -> PointKey {
        PointKey::from_point(*self)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Point snapped to a fixed grid of `POINT_KEY_RESOLUTION`.
///
/// Raw `f64` equality is unreliable for corners computed through different
/// arithmetic, so graph nodes and cache entries are keyed by this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    pub x: i64,
    pub y: i64,
}

impl PointKey {
    pub fn from_point(p: Point2D) -> Self {
        Self {
            x: (p.x / POINT_KEY_RESOLUTION).round() as i64,
            y: (p.y / POINT_KEY_RESOLUTION).round() as i64,
        }
    }

    pub fn to_point(&self) -> Point2D {
        Point2D::new(
            self.x as f64 * POINT_KEY_RESOLUTION,
            self.y as f64 * POINT_KEY_RESOLUTION,
        )
    }
}

impl From<Point2D> for PointKey {
    fn from(p: Point2D) -> Self {
        Self::from_point(p)
    }
}

/// Path represented as a sequence of 2D points
#[derive(Debug, Clone, PartialEq)]
pub struct Path2D {
    pub points: Vec<Point2D>,
}

impl Path2D {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn from_xy(x: &[f64], y: &[f64]) -> Self {
        assert_eq!(x.len(), y.len());
        let points = x.iter().zip(y.iter())
            .map(|(&x, &y)| Point2D::new(x, y))
            .collect();
        Self { points }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point2D> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point2D> {
        self.points.last().copied()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn to_tuples(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(Point2D::to_tuple).collect()
    }

    pub fn total_length(&self) -> f64 {
        self.points.iter()
            .tuple_windows()
            .map(|(a, b)| a.distance(b))
            .sum()
    }

    /// Point reached after travelling `distance` along the polyline.
    ///
    /// Clamped to the first/last point; `None` for an empty path.
    /// Renderers use this to place direction arrows along a route.
    pub fn point_at_distance(&self, distance: f64) -> Option<Point2D> {
        let first = self.first()?;
        if distance <= 0.0 {
            return Some(first);
        }

        let mut travelled = 0.0;
        for (a, b) in self.points.iter().tuple_windows() {
            let seg = a.distance(b);
            if seg > 0.0 && travelled + seg >= distance {
                let t = (distance - travelled) / seg;
                let v = a.to_vector() + (b.to_vector() - a.to_vector()) * t;
                return Some(Point2D::from(v));
            }
            travelled += seg;
        }

        self.last()
    }
}

impl Default for Path2D {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Point2D>> for Path2D {
    fn from(points: Vec<Point2D>) -> Self {
        Self { points }
    }
}
