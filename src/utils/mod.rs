//! Utility modules for venue_nav

pub mod visualization;

pub use visualization::{colors, PathStyle, PointStyle, Visualizer};
