//! Venue route planner
//!
//! Computes obstacle-avoiding routes between two points on a venue floor
//! plan. One planner owns one loaded obstacle set together with its two
//! caches: the visibility graph (built lazily on the first routed request,
//! read-only afterwards) and a bounded route cache.
//!
//! Query flow:
//! 1. Resolve start/end points that fall inside obstacles
//! 2. Return the two-point route when the direct segment is clear
//! 3. Otherwise run A* over the visibility graph plus both endpoints
//! 4. Fall back to the direct segment when the graph has no path
//!
//! The planner is `Send + Sync`: the graph build runs under a
//! [`OnceLock`] so concurrent callers share one build, and the route cache
//! sits behind an [`RwLock`].

use std::sync::{OnceLock, PoisonError, RwLock};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::common::{NavError, NavResult, Path2D, PathPlanner, Point2D};
use crate::map::{BlockingPolicy, ObstacleSet, SpatialGrid, VenueLayout, DEFAULT_CELL_SIZE};
use crate::path_planning::a_star::{self, QueryGraph};
use crate::path_planning::path_cache::{PathCache, DEFAULT_CACHE_CAPACITY};
use crate::path_planning::point_resolver::PointResolver;
use crate::path_planning::smoothing::{densify, DensifyConfig, PathSmoother};
use crate::path_planning::visibility_graph::{VisibilityGraph, VisibilityGraphConfig};

/// Configuration for the venue route planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Spatial grid cell size in map units
    pub grid_cell_size: f64,
    /// Routes kept before the cache is cleared
    pub cache_capacity: usize,
    /// Apply string pulling to searched routes
    pub smooth_path: bool,
    /// Insert intermediate points on long segments
    pub densify: Option<DensifyConfig>,
    /// Which categories block movement
    pub blocking: BlockingPolicy,
    /// Visibility graph parameters
    pub graph: VisibilityGraphConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: DEFAULT_CELL_SIZE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            smooth_path: true,
            densify: None,
            blocking: BlockingPolicy::default(),
            graph: VisibilityGraphConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> NavResult<Self> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NavResult<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(NavError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )))
            }
        };

        positive("grid_cell_size", self.grid_cell_size)?;
        positive("graph.max_edge_length", self.graph.max_edge_length)?;
        if !(self.graph.corner_padding.is_finite() && self.graph.corner_padding >= 0.0) {
            return Err(NavError::InvalidParameter(format!(
                "graph.corner_padding must be non-negative, got {}",
                self.graph.corner_padding
            )));
        }
        if self.graph.max_edges_per_node == 0 {
            return Err(NavError::InvalidParameter(
                "graph.max_edges_per_node must be at least 1".to_string(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(NavError::InvalidParameter(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if let Some(densify) = &self.densify {
            positive("densify.spacing", densify.spacing)?;
            positive("densify.max_segment_length", densify.max_segment_length)?;
        }
        Ok(())
    }
}

/// How a route was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Start and end see each other; no search was needed
    Direct,
    /// Found by A* over the visibility graph; every segment is clear
    Routed,
    /// No graph path: best-effort direct segment that may cross obstacles
    Fallback,
}

/// Planned route from resolved start to resolved end
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Path2D,
    pub kind: RouteKind,
}

impl Route {
    fn straight(start: Point2D, end: Point2D, kind: RouteKind) -> Self {
        Self {
            path: Path2D::from_points(vec![start, end]),
            kind,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.kind == RouteKind::Fallback
    }

    pub fn length(&self) -> f64 {
        self.path.total_length()
    }

    pub fn points(&self) -> &[Point2D] {
        &self.path.points
    }

    pub fn into_path(self) -> Path2D {
        self.path
    }
}

/// Route planner for one loaded venue
pub struct VenueRoutePlanner {
    obstacles: ObstacleSet,
    grid: SpatialGrid,
    config: PlannerConfig,
    graph: OnceLock<VisibilityGraph>,
    cache: RwLock<PathCache<Route>>,
}

impl VenueRoutePlanner {
    /// Load `layout` and prepare its spatial index; the graph is built lazily
    pub fn new(layout: &VenueLayout, config: PlannerConfig) -> NavResult<Self> {
        config.validate()?;
        let obstacles = ObstacleSet::load(layout, &config.blocking)?;
        let grid = SpatialGrid::new(&obstacles, config.grid_cell_size);
        let cache = RwLock::new(PathCache::new(config.cache_capacity));

        Ok(Self {
            obstacles,
            grid,
            config,
            graph: OnceLock::new(),
            cache,
        })
    }

    pub fn with_defaults(layout: &VenueLayout) -> NavResult<Self> {
        Self::new(layout, PlannerConfig::default())
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The visibility graph, building it on first use
    pub fn visibility_graph(&self) -> &VisibilityGraph {
        self.graph.get_or_init(|| {
            VisibilityGraph::build(&self.obstacles, &self.grid, &self.config.graph)
        })
    }

    pub fn is_graph_built(&self) -> bool {
        self.graph.get().is_some()
    }

    /// Replace the obstacle set, invalidating the graph and the route cache
    pub fn rebuild(&mut self, layout: &VenueLayout) -> NavResult<()> {
        let obstacles = ObstacleSet::load(layout, &self.config.blocking)?;
        self.grid = SpatialGrid::new(&obstacles, self.config.grid_cell_size);
        self.obstacles = obstacles;
        self.graph.take();
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("planner rebuilt with {} obstacles", self.obstacles.len());
        Ok(())
    }

    pub fn clear_cache(&self) {
        self.cache.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Move `p` out of any blocking obstacle containing it
    pub fn resolve_point(&self, p: Point2D) -> Point2D {
        PointResolver::new(&self.obstacles, &self.grid, self.config.graph.corner_padding)
            .resolve(p)
    }

    /// Route from `start` to `end`. Never fails; see [`RouteKind`].
    pub fn find_path(&self, start: Point2D, end: Point2D) -> Route {
        if !start.is_finite() || !end.is_finite() {
            warn!("non-finite route endpoints {:?} -> {:?}", start, end);
            return Route::straight(start, end, RouteKind::Fallback);
        }

        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(start, end);
        if let Some(route) = cached {
            return route;
        }

        let route = self.plan_route(start, end);
        debug!(
            "{:?} route with {} points, length {:.1}",
            route.kind,
            route.path.len(),
            route.length()
        );

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(start, end, route.clone());
        route
    }

    /// Coordinate-tuple form of [`find_path`](Self::find_path)
    pub fn find_path_xy(&self, start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Vec<(f64, f64)> {
        self.find_path(Point2D::new(start_x, start_y), Point2D::new(end_x, end_y))
            .path
            .to_tuples()
    }

    /// Plans between the resolved endpoints in `PointKey` order and mirrors
    /// the result, so `(a, b)` and `(b, a)` yield the same route reversed.
    fn plan_route(&self, start: Point2D, end: Point2D) -> Route {
        let start = self.resolve_point(start);
        let end = self.resolve_point(end);

        if end.key() < start.key() {
            let mut route = self.plan_ordered(end, start);
            route.path.points.reverse();
            route
        } else {
            self.plan_ordered(start, end)
        }
    }

    fn plan_ordered(&self, start: Point2D, end: Point2D) -> Route {
        if self.grid.segment_clear(start, end) {
            return self.finish(Route::straight(start, end, RouteKind::Direct));
        }

        let graph = self.visibility_graph();
        let query = QueryGraph::new(graph, &self.grid, start, end);
        match a_star::search(&query, query.start_id(), query.goal_id()) {
            Some(result) => {
                let points = result
                    .nodes
                    .iter()
                    .map(|&n| {
                        if n == query.start_id() {
                            start
                        } else if n == query.goal_id() {
                            end
                        } else {
                            graph.nodes()[n]
                        }
                    })
                    .collect();
                let mut path = Path2D::from_points(points);
                if self.config.smooth_path {
                    path = PathSmoother::new(&self.grid).string_pull(&path);
                }
                self.finish(Route { path, kind: RouteKind::Routed })
            }
            None => {
                warn!(
                    "no route from ({:.1}, {:.1}) to ({:.1}, {:.1}): start sees {} corners, end sees {}; using direct segment",
                    start.x,
                    start.y,
                    end.x,
                    end.y,
                    query.start_degree(),
                    query.goal_degree()
                );
                self.finish(Route::straight(start, end, RouteKind::Fallback))
            }
        }
    }

    fn finish(&self, mut route: Route) -> Route {
        if let Some(config) = &self.config.densify {
            route.path = densify(&route.path, config);
        }
        route
    }
}

impl PathPlanner for VenueRoutePlanner {
    fn plan(&self, start: Point2D, goal: Point2D) -> Result<Path2D, NavError> {
        Ok(self.find_path(start, goal).into_path())
    }
}
