//! A* search over planar graphs
//!
//! The heuristic is the straight-line distance to the goal. With Euclidean
//! edge weights it is admissible and consistent, so the first time the goal
//! is popped its cost is minimal over the graph.
//!
//! Equal f-scores are ordered by a strictly increasing insertion counter,
//! which makes the returned path independent of hash or iteration order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;
use ordered_float::OrderedFloat;

use crate::common::{Point2D, SearchGraph};
use crate::map::SpatialGrid;
use crate::path_planning::visibility_graph::VisibilityGraph;

/// Node with priority for the A* open set (min-heap)
#[derive(Debug)]
struct PriorityNode {
    priority: OrderedFloat<f64>,
    order: u64,
    index: usize,
}

impl Eq for PriorityNode {}

impl PartialEq for PriorityNode {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.order == other.order
    }
}

impl Ord for PriorityNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; earlier insertion wins ties
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for PriorityNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a successful search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Node ids from start to goal, inclusive
    pub nodes: Vec<usize>,
    /// Total edge weight along `nodes`
    pub cost: f64,
    /// Number of nodes expanded
    pub expanded: usize,
}

/// Run A* from `start` to `goal`; `None` when the goal is unreachable
pub fn search<G: SearchGraph>(graph: &G, start: usize, goal: usize) -> Option<SearchResult> {
    let n = graph.node_count();
    if start >= n || goal >= n {
        return None;
    }

    let goal_pos = graph.position(goal);
    let heuristic = |node: usize| graph.position(node).distance(&goal_pos);

    let mut g_values = vec![f64::INFINITY; n];
    let mut parents: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut open_set = BinaryHeap::new();
    let mut order = 0u64;
    let mut expanded = 0usize;
    let mut neighbors = Vec::new();

    g_values[start] = 0.0;
    open_set.push(PriorityNode {
        priority: OrderedFloat(heuristic(start)),
        order,
        index: start,
    });

    while let Some(current) = open_set.pop() {
        let u = current.index;
        if closed[u] {
            continue;
        }
        if u == goal {
            trace!("A* reached goal after {} expansions", expanded);
            return Some(SearchResult {
                nodes: build_path(&parents, goal),
                cost: g_values[goal],
                expanded,
            });
        }
        closed[u] = true;
        expanded += 1;

        neighbors.clear();
        graph.neighbors(u, &mut neighbors);
        for &(v, weight) in &neighbors {
            if closed[v] {
                continue;
            }
            let new_cost = g_values[u] + weight;
            if new_cost < g_values[v] {
                g_values[v] = new_cost;
                parents[v] = Some(u);
                order += 1;
                open_set.push(PriorityNode {
                    priority: OrderedFloat(new_cost + heuristic(v)),
                    order,
                    index: v,
                });
            }
        }
    }

    trace!("A* open set exhausted after {} expansions", expanded);
    None
}

fn build_path(parents: &[Option<usize>], goal: usize) -> Vec<usize> {
    let mut nodes = vec![goal];
    let mut current = goal;
    while let Some(parent) = parents[current] {
        nodes.push(parent);
        current = parent;
    }
    nodes.reverse();
    nodes
}

/// Visibility graph plus two ephemeral endpoint nodes for one query.
///
/// Node ids `0..n` are the corner nodes, `n` is the start and `n + 1` the
/// goal. Each endpoint links to every corner it can see, and to the other
/// endpoint when the direct segment is clear. The base graph is not touched.
pub struct QueryGraph<'a> {
    base: &'a VisibilityGraph,
    start: Point2D,
    goal: Point2D,
    start_links: Vec<Option<f64>>,
    goal_links: Vec<Option<f64>>,
    direct: Option<f64>,
}

impl<'a> QueryGraph<'a> {
    pub fn new(base: &'a VisibilityGraph, grid: &SpatialGrid, start: Point2D, goal: Point2D) -> Self {
        let sight = |from: Point2D| -> Vec<Option<f64>> {
            base.nodes()
                .iter()
                .map(|node| grid.segment_clear(from, *node).then(|| from.distance(node)))
                .collect()
        };
        let start_links = sight(start);
        let goal_links = sight(goal);
        let direct = grid.segment_clear(start, goal).then(|| start.distance(&goal));

        Self {
            base,
            start,
            goal,
            start_links,
            goal_links,
            direct,
        }
    }

    pub fn start_id(&self) -> usize {
        self.base.node_count()
    }

    pub fn goal_id(&self) -> usize {
        self.base.node_count() + 1
    }

    /// Corner nodes visible from the start point
    pub fn start_degree(&self) -> usize {
        self.start_links.iter().flatten().count()
    }

    /// Corner nodes visible from the goal point
    pub fn goal_degree(&self) -> usize {
        self.goal_links.iter().flatten().count()
    }

    fn endpoint_links(links: &[Option<f64>], out: &mut Vec<(usize, f64)>) {
        out.extend(
            links
                .iter()
                .enumerate()
                .filter_map(|(i, link)| link.map(|d| (i, d))),
        );
    }
}

impl SearchGraph for QueryGraph<'_> {
    fn node_count(&self) -> usize {
        self.base.node_count() + 2
    }

    fn position(&self, node: usize) -> Point2D {
        if node == self.start_id() {
            self.start
        } else if node == self.goal_id() {
            self.goal
        } else {
            self.base.position(node)
        }
    }

    fn neighbors(&self, node: usize, out: &mut Vec<(usize, f64)>) {
        if node == self.start_id() {
            Self::endpoint_links(&self.start_links, out);
            if let Some(d) = self.direct {
                out.push((self.goal_id(), d));
            }
        } else if node == self.goal_id() {
            Self::endpoint_links(&self.goal_links, out);
            if let Some(d) = self.direct {
                out.push((self.start_id(), d));
            }
        } else {
            self.base.neighbors(node, out);
            if let Some(d) = self.start_links[node] {
                out.push((self.start_id(), d));
            }
            if let Some(d) = self.goal_links[node] {
                out.push((self.goal_id(), d));
            }
        }
    }
}
