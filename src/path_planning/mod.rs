//! Route planning over the venue obstacle set

pub mod a_star;
pub mod path_cache;
pub mod point_resolver;
pub mod smoothing;
pub mod venue_planner;
pub mod visibility_graph;

pub use a_star::{search, QueryGraph, SearchResult};
pub use path_cache::{PathCache, DEFAULT_CACHE_CAPACITY};
pub use point_resolver::PointResolver;
pub use smoothing::{densify, DensifyConfig, PathSmoother};
pub use venue_planner::{PlannerConfig, Route, RouteKind, VenueRoutePlanner};
pub use visibility_graph::{VisibilityGraph, VisibilityGraphConfig};
