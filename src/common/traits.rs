//! Common traits defining interfaces for navigation algorithms

use crate::common::types::*;
use crate::common::error::NavError;

/// Trait for path planning algorithms
pub trait PathPlanner {
    /// Plan a path from start to goal
    fn plan(&self, start: Point2D, goal: Point2D) -> Result<Path2D, NavError>;
}

/// Weighted graph embedded in the plane, searchable by A*.
///
/// Node positions feed the straight-line heuristic, so edge weights must be
/// at least the Euclidean distance between their endpoints for the search to
/// stay optimal.
pub trait SearchGraph {
    /// Number of nodes; node ids are `0..node_count()`
    fn node_count(&self) -> usize;

    /// Position of a node in map coordinates
    fn position(&self, node: usize) -> Point2D;

    /// Append `(neighbor, edge_weight)` pairs of `node` to `out`
    fn neighbors(&self, node: usize, out: &mut Vec<(usize, f64)>);
}

/// Trait for visualizable structures
pub trait Visualizable {
    /// Draw current state to visualizer
    fn visualize(&self, vis: &mut crate::utils::Visualizer);
}
