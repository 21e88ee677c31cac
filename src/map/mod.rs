//! Venue map: obstacle store, geometry primitives and spatial index

pub mod geometry;
pub mod obstacle;
pub mod spatial_grid;

pub use geometry::{segment_bounds, segment_intersects_rect, Rect};
pub use obstacle::{BlockingPolicy, Category, Obstacle, ObstacleRecord, ObstacleSet, VenueLayout};
pub use spatial_grid::{SpatialGrid, DEFAULT_CELL_SIZE};
