//! Plan a route across a small exhibition hall and plot it.
//!
//! Usage: cargo run --example venue_route [layout.json]
//!
//! Without an argument a built-in layout is used. Set RUST_LOG=debug to see
//! graph build statistics.

use std::env;
use std::fs;

use log::info;
use venue_nav::common::Visualizable;
use venue_nav::utils::Visualizer;
use venue_nav::{NavResult, PlannerConfig, Point2D, VenueLayout, VenueRoutePlanner};

const DEFAULT_LAYOUT: &str = r#"{
    "width": 4000,
    "height": 3000,
    "obstacles": [
        { "x1": 0,    "y1": 0,    "x2": 4000, "y2": 40,   "name": "south wall", "category": "wall" },
        { "x1": 0,    "y1": 2960, "x2": 4000, "y2": 3000, "name": "north wall", "category": "wall" },
        { "x1": 600,  "y1": 500,  "x2": 1000, "y2": 900,  "name": "B1", "category": "booth" },
        { "x1": 1400, "y1": 500,  "x2": 1800, "y2": 900,  "name": "B2", "category": "booth" },
        { "x1": 2200, "y1": 500,  "x2": 2600, "y2": 900,  "name": "B3", "category": "booth" },
        { "x1": 600,  "y1": 1300, "x2": 2600, "y2": 1700, "name": "Main stage", "category": "stage" },
        { "x1": 3000, "y1": 400,  "x2": 3400, "y2": 2400, "name": "Food court", "category": "food" },
        { "x1": 600,  "y1": 2100, "x2": 1000, "y2": 2500, "name": "Info", "category": "information" },
        { "x1": 3600, "y1": 40,   "x2": 3900, "y2": 200,  "name": "Exit A", "category": "exit" }
    ]
}"#;

fn main() -> NavResult<()> {
    env_logger::init();

    let layout = match env::args().nth(1) {
        Some(path) => VenueLayout::from_json(&fs::read_to_string(path)?)?,
        None => VenueLayout::from_json(DEFAULT_LAYOUT)?,
    };

    let planner = VenueRoutePlanner::new(&layout, PlannerConfig::default())?;
    let start = Point2D::new(200.0, 1500.0);
    let goal = Point2D::new(3750.0, 120.0);

    let route = planner.find_path(start, goal);
    let graph = planner.visibility_graph();
    info!(
        "graph: {} corners, {} edges, {} components",
        graph.node_count(),
        graph.edge_count(),
        graph.connected_components().len()
    );
    info!("{:?} route, {} waypoints, length {:.0}", route.kind, route.path.len(), route.length());
    for p in route.points() {
        println!("{:.1}, {:.1}", p.x, p.y);
    }
    if let Some(mid) = route.path.point_at_distance(route.length() / 2.0) {
        println!("midpoint: {:.1}, {:.1}", mid.x, mid.y);
    }

    let mut vis = Visualizer::new();
    vis.set_title("Venue route");
    planner.obstacles().visualize(&mut vis);
    graph.visualize(&mut vis);
    route.visualize(&mut vis);
    vis.save_svg("venue_route.svg", 800, 600)?;

    Ok(())
}
