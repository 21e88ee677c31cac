//! Visibility graph over padded obstacle corners
//!
//! Nodes are obstacle corners pushed outward by a fixed padding, kept only
//! when they lie inside the map and outside every blocking obstacle. Two
//! nodes are linked when the segment between them is clear; the weight is
//! the Euclidean distance, so the graph is undirected with symmetric weights.
//!
//! Edge generation is bounded: each node only looks at nodes within
//! `max_edge_length`, nearest first, and stops after `max_edges_per_node`
//! clear links.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::common::{Point2D, PointKey, SearchGraph};
use crate::map::{ObstacleSet, SpatialGrid};

/// Configuration for the visibility graph builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityGraphConfig {
    /// Outward offset applied to obstacle corners
    pub corner_padding: f64,
    /// Longest edge considered
    pub max_edge_length: f64,
    /// Clear edges kept per node (K)
    pub max_edges_per_node: usize,
    /// Also link corners that belong to the same obstacle
    pub link_same_obstacle_corners: bool,
    /// Stop building after this many clearance tests (None = unbounded)
    pub max_clearance_checks: Option<usize>,
}

impl Default for VisibilityGraphConfig {
    fn default() -> Self {
        Self {
            corner_padding: 20.0,
            max_edge_length: 3000.0,
            max_edges_per_node: 20,
            link_same_obstacle_corners: false,
            max_clearance_checks: None,
        }
    }
}

/// Undirected visibility graph, immutable once built
#[derive(Debug, Clone)]
pub struct VisibilityGraph {
    nodes: Vec<Point2D>,
    owners: Vec<usize>,
    index: HashMap<PointKey, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
    edge_count: usize,
    clearance_checks: usize,
    truncated: bool,
}

impl VisibilityGraph {
    /// Build the graph for the blocking obstacles of `obstacles`
    pub fn build(
        obstacles: &ObstacleSet,
        grid: &SpatialGrid,
        config: &VisibilityGraphConfig,
    ) -> Self {
        let mut graph = VisibilityGraph {
            nodes: Vec::new(),
            owners: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edge_count: 0,
            clearance_checks: 0,
            truncated: false,
        };

        graph.add_corner_nodes(obstacles, grid, config.corner_padding);
        graph.add_edges(grid, config);

        let components = graph.connected_components().len();
        debug!(
            "visibility graph built: {} nodes, {} edges, {} clearance checks, {} components",
            graph.node_count(),
            graph.edge_count,
            graph.clearance_checks,
            components
        );
        if components > 1 {
            warn!("visibility graph is not fully connected: {} components", components);
        }

        graph
    }

    fn add_corner_nodes(&mut self, obstacles: &ObstacleSet, grid: &SpatialGrid, padding: f64) {
        for (owner, obstacle) in obstacles.iter_blocking() {
            for corner in obstacle.rect.padded(padding).corners() {
                if !obstacles.in_bounds(corner) || grid.point_in_any_obstacle(corner) {
                    continue;
                }
                let key = corner.key();
                if self.index.contains_key(&key) {
                    continue;
                }
                self.index.insert(key, self.nodes.len());
                self.nodes.push(corner);
                self.owners.push(owner);
                self.adjacency.push(Vec::new());
            }
        }
    }

    fn add_edges(&mut self, grid: &SpatialGrid, config: &VisibilityGraphConfig) {
        let max_len = config.max_edge_length;
        let bucket_of = |p: &Point2D| ((p.x / max_len).floor() as i64, (p.y / max_len).floor() as i64);

        let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, p) in self.nodes.iter().enumerate() {
            buckets.entry(bucket_of(p)).or_default().push(i);
        }

        let mut linked: HashSet<(usize, usize)> = HashSet::new();
        let mut blocked: HashSet<(usize, usize)> = HashSet::new();
        let mut candidates: Vec<(usize, f64)> = Vec::new();

        'nodes: for i in 0..self.nodes.len() {
            let p = self.nodes[i];
            let (bx, by) = bucket_of(&p);

            candidates.clear();
            for cx in bx.saturating_sub(1)..=bx.saturating_add(1) {
                for cy in by.saturating_sub(1)..=by.saturating_add(1) {
                    let Some(members) = buckets.get(&(cx, cy)) else { continue };
                    for &j in members {
                        if j == i {
                            continue;
                        }
                        if !config.link_same_obstacle_corners && self.owners[i] == self.owners[j] {
                            continue;
                        }
                        let d = p.distance(&self.nodes[j]);
                        if d <= max_len {
                            candidates.push((j, d));
                        }
                    }
                }
            }
            candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

            let mut kept = 0;
            for &(j, d) in &candidates {
                if kept >= config.max_edges_per_node {
                    break;
                }
                let pair = (i.min(j), i.max(j));
                if linked.contains(&pair) {
                    kept += 1;
                    continue;
                }
                if blocked.contains(&pair) {
                    continue;
                }

                if let Some(budget) = config.max_clearance_checks {
                    if self.clearance_checks >= budget {
                        warn!(
                            "visibility graph build stopped after {} clearance checks",
                            self.clearance_checks
                        );
                        self.truncated = true;
                        break 'nodes;
                    }
                }
                self.clearance_checks += 1;

                if grid.segment_clear(p, self.nodes[j]) {
                    linked.insert(pair);
                    self.adjacency[i].push((j, d));
                    self.adjacency[j].push((i, d));
                    self.edge_count += 1;
                    kept += 1;
                } else {
                    blocked.insert(pair);
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Point2D] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<Point2D> {
        self.nodes.get(index).copied()
    }

    /// Obstacle index the corner node was generated from
    pub fn owner(&self, index: usize) -> Option<usize> {
        self.owners.get(index).copied()
    }

    /// Node located at `p` (after quantization), if any
    pub fn node_index(&self, p: Point2D) -> Option<usize> {
        self.index.get(&p.key()).copied()
    }

    pub fn edges_of(&self, index: usize) -> &[(usize, f64)] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every edge once, as `(a, b, weight)` with `a < b`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, links)| {
            links.iter().filter(move |(b, _)| a < *b).map(move |&(b, w)| (a, b, w))
        })
    }

    /// Number of segment clearance tests spent building the graph
    pub fn clearance_checks(&self) -> usize {
        self.clearance_checks
    }

    /// Whether the build stopped early on its clearance-check budget
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Connected components, each sorted, ordered by their smallest node
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.nodes.len()];
        let mut components = Vec::new();

        for root in 0..self.nodes.len() {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            let mut component = vec![root];
            let mut queue = VecDeque::from([root]);
            while let Some(u) = queue.pop_front() {
                for &(v, _) in &self.adjacency[u] {
                    if !seen[v] {
                        seen[v] = true;
                        component.push(v);
                        queue.push_back(v);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        components
    }
}

impl SearchGraph for VisibilityGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn position(&self, node: usize) -> Point2D {
        self.nodes[node]
    }

    fn neighbors(&self, node: usize, out: &mut Vec<(usize, f64)>) {
        out.extend_from_slice(&self.adjacency[node]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{BlockingPolicy, VenueLayout};

    fn build(layout: VenueLayout, config: &VisibilityGraphConfig) -> (SpatialGrid, VisibilityGraph) {
        let set = ObstacleSet::load(&layout, &BlockingPolicy::default()).unwrap();
        let grid = SpatialGrid::new(&set, 500.0);
        let graph = VisibilityGraph::build(&set, &grid, config);
        (grid, graph)
    }

    fn two_booths() -> VenueLayout {
        VenueLayout::new(1000.0, 1000.0)
            .with_obstacle(200.0, 200.0, 300.0, 300.0, "A", "booth")
            .with_obstacle(600.0, 600.0, 700.0, 700.0, "B", "booth")
    }

    #[test]
    fn test_corner_nodes() {
        let (_, graph) = build(two_booths(), &VisibilityGraphConfig::default());
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.node_index(Point2D::new(180.0, 180.0)), Some(0));
        assert_eq!(graph.node_index(Point2D::new(720.0, 720.0 + 1e-6)), Some(6));
        assert_eq!(graph.owner(6), Some(1));
    }

    #[test]
    fn test_out_of_bounds_and_covered_corners_are_dropped() {
        let layout = VenueLayout::new(1000.0, 1000.0)
            .with_obstacle(0.0, 0.0, 100.0, 100.0, "corner", "booth")
            .with_obstacle(400.0, 400.0, 600.0, 600.0, "hall", "stage")
            .with_obstacle(430.0, 430.0, 470.0, 470.0, "inner", "booth");
        let (_, graph) = build(layout, &VisibilityGraphConfig::default());
        // corner booth keeps only (120, 120); hall keeps all four; inner none
        assert_eq!(graph.node_count(), 5);
        assert!(graph.node_index(Point2D::new(120.0, 120.0)).is_some());
        assert!(graph.node_index(Point2D::new(410.0, 410.0)).is_none());
    }

    #[test]
    fn test_edges_are_symmetric_and_clear() {
        let (grid, graph) = build(two_booths(), &VisibilityGraphConfig::default());
        assert!(graph.edge_count() > 0);
        for (a, b, w) in graph.edges() {
            let pa = graph.node(a).unwrap();
            let pb = graph.node(b).unwrap();
            assert!(grid.segment_clear(pa, pb));
            assert!((w - pa.distance(&pb)).abs() < 1e-9);
            assert!(graph.edges_of(b).iter().any(|&(n, wb)| n == a && wb == w));
            assert_ne!(graph.owner(a), graph.owner(b));
        }
    }

    #[test]
    fn test_diagonal_through_obstacle_is_not_linked() {
        let (_, graph) = build(two_booths(), &VisibilityGraphConfig::default());
        // (180,180) of A and (720,720) of B: the segment crosses both booths
        let a = graph.node_index(Point2D::new(180.0, 180.0)).unwrap();
        let b = graph.node_index(Point2D::new(720.0, 720.0)).unwrap();
        assert!(!graph.edges_of(a).iter().any(|&(n, _)| n == b));
    }

    #[test]
    fn test_same_obstacle_corners_optional() {
        let layout = VenueLayout::new(1000.0, 1000.0)
            .with_obstacle(400.0, 400.0, 600.0, 600.0, "A", "booth");

        let (_, graph) = build(layout.clone(), &VisibilityGraphConfig::default());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.connected_components().len(), 4);

        let config = VisibilityGraphConfig {
            link_same_obstacle_corners: true,
            ..Default::default()
        };
        let (_, graph) = build(layout, &config);
        // Four sides; the diagonals cross the booth
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.connected_components().len(), 1);
    }

    #[test]
    fn test_max_edge_length_and_k() {
        let config = VisibilityGraphConfig {
            max_edge_length: 200.0,
            ..Default::default()
        };
        let (_, graph) = build(two_booths(), &config);
        // Closest cross-booth pair: (320,320)-(580,580), about 368 apart
        assert_eq!(graph.edge_count(), 0);

        let config = VisibilityGraphConfig {
            max_edges_per_node: 1,
            ..Default::default()
        };
        let (_, limited) = build(two_booths(), &config);
        let (_, full) = build(two_booths(), &VisibilityGraphConfig::default());
        assert!(limited.edge_count() < full.edge_count());
    }

    #[test]
    fn test_tiny_max_edge_length_does_not_overflow_buckets() {
        let config = VisibilityGraphConfig {
            max_edge_length: 1e-300,
            ..Default::default()
        };
        let (_, graph) = build(two_booths(), &config);
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_clearance_budget_truncates() {
        let config = VisibilityGraphConfig {
            max_clearance_checks: Some(3),
            ..Default::default()
        };
        let (_, graph) = build(two_booths(), &config);
        assert!(graph.is_truncated());
        assert_eq!(graph.clearance_checks(), 3);
        assert!(graph.edge_count() <= 3);

        let (_, full) = build(two_booths(), &VisibilityGraphConfig::default());
        assert!(!full.is_truncated());
    }

    #[test]
    fn test_build_is_deterministic() {
        let (_, g1) = build(two_booths(), &VisibilityGraphConfig::default());
        let (_, g2) = build(two_booths(), &VisibilityGraphConfig::default());
        assert_eq!(g1.nodes(), g2.nodes());
        assert_eq!(g1.edges().collect::<Vec<_>>(), g2.edges().collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_obstacle_set() {
        let (_, graph) = build(VenueLayout::new(100.0, 100.0), &VisibilityGraphConfig::default());
        assert!(graph.is_empty());
        assert!(graph.connected_components().is_empty());
    }
}
