//! venue_nav - obstacle-avoiding route planning for venue floor plans
//!
//! This crate loads a venue layout of axis-aligned rectangular obstacles and
//! answers route queries between arbitrary points with a visibility graph,
//! A* search and string pulling.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod map;
pub mod path_planning;

// Re-export common types for convenience
pub use common::{NavError, NavResult, Path2D, PathPlanner, Point2D};
pub use map::{BlockingPolicy, Category, ObstacleRecord, ObstacleSet, Rect, SpatialGrid, VenueLayout};
pub use path_planning::{PlannerConfig, Route, RouteKind, VenueRoutePlanner};
