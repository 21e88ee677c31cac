//! Visualization utilities for venue_nav
//!
//! Renders floor plans, visibility graphs and routes with gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{NavError, NavResult, Path2D, Point2D, Visualizable};
use crate::map::{ObstacleSet, Rect};
use crate::path_planning::{Route, RouteKind, VisibilityGraph};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const ORANGE: &str = "#FFA500";
    pub const GRAY: &str = "#808080";
    pub const LIGHT_GRAY: &str = "#C8C8C8";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const PASSABLE: &str = LIGHT_GRAY;
    pub const GRAPH_EDGE: &str = LIGHT_GRAY;
    pub const GRAPH_NODE: &str = GRAY;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
    pub const FALLBACK: &str = ORANGE;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Route")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

/// Closed outline of a rectangle, for `lines`
fn outline(rect: &Rect) -> ([f64; 5], [f64; 5]) {
    (
        [rect.x1, rect.x2, rect.x2, rect.x1, rect.x1],
        [rect.y1, rect.y1, rect.y2, rect.y2, rect.y1],
    )
}

/// Polyline segments joined by NaN breaks so one `lines` call draws them all
fn segment_series<I>(segments: I) -> (Vec<f64>, Vec<f64>)
where
    I: IntoIterator<Item = (Point2D, Point2D)>,
{
    let mut x = Vec::new();
    let mut y = Vec::new();
    for (a, b) in segments {
        x.extend_from_slice(&[a.x, b.x, f64::NAN]);
        y.extend_from_slice(&[a.y, b.y, f64::NAN]);
    }
    (x, y)
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Fit the axes to the venue bounds
    pub fn set_bounds(&mut self, bounds: &Rect) -> &mut Self {
        self.set_x_range(bounds.x1, bounds.x2).set_y_range(bounds.y1, bounds.y2)
    }

    pub fn figure_mut(&mut self) -> &mut Figure {
        &mut self.figure
    }

    pub fn plot_path(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        self.figure.axes2d().lines(
            &path.x_coords(),
            &path.y_coords(),
            &[
                Caption(&style.caption),
                Color(&style.color),
                LineWidth(style.line_width),
            ],
        );
        self
    }

    /// Plot a route, colored by how it was obtained
    pub fn plot_route(&mut self, route: &Route) -> &mut Self {
        let style = match route.kind {
            RouteKind::Fallback => PathStyle::new(colors::FALLBACK, "Fallback route"),
            RouteKind::Direct => PathStyle::new(colors::PATH, "Direct route"),
            RouteKind::Routed => PathStyle::default(),
        };
        self.plot_path(&route.path, &style);
        self.plot_points(
            &route.path.points,
            &PointStyle::new(&style.color, "").with_symbol('o').with_size(0.8),
        )
    }

    /// Plot obstacle outlines; passable areas in a lighter color
    pub fn plot_obstacles(&mut self, obstacles: &ObstacleSet) -> &mut Self {
        let (blocking, passable): (Vec<_>, Vec<_>) =
            obstacles.obstacles().iter().partition(|o| o.is_blocking());

        for (group, color, caption) in [
            (blocking, colors::OBSTACLE, "Obstacles"),
            (passable, colors::PASSABLE, "Passable areas"),
        ] {
            let mut x = Vec::new();
            let mut y = Vec::new();
            for obstacle in group {
                let (ox, oy) = outline(&obstacle.rect);
                x.extend_from_slice(&ox);
                x.push(f64::NAN);
                y.extend_from_slice(&oy);
                y.push(f64::NAN);
            }
            if !x.is_empty() {
                self.figure
                    .axes2d()
                    .lines(&x, &y, &[Caption(caption), Color(color), LineWidth(1.0)]);
            }
        }
        self
    }

    /// Plot visibility graph nodes and edges
    pub fn plot_visibility_graph(&mut self, graph: &VisibilityGraph) -> &mut Self {
        let nodes = graph.nodes();
        let (x, y) = segment_series(graph.edges().map(|(a, b, _)| (nodes[a], nodes[b])));
        if !x.is_empty() {
            self.figure.axes2d().lines(
                &x,
                &y,
                &[Caption("Visibility graph"), Color(colors::GRAPH_EDGE), LineWidth(0.5)],
            );
        }
        self.plot_points(
            nodes,
            &PointStyle::new(colors::GRAPH_NODE, "Corners").with_symbol('.').with_size(0.5),
        )
    }

    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.plot_points(&[point], style)
    }

    pub fn plot_points(&mut self, points: &[Point2D], style: &PointStyle) -> &mut Self {
        let x: Vec<f64> = points.iter().map(|p| p.x).collect();
        let y: Vec<f64> = points.iter().map(|p| p.y).collect();

        self.figure.axes2d().points(
            &x,
            &y,
            &[
                Caption(&style.caption),
                Color(&style.color),
                PointSymbol(style.symbol),
                PointSize(style.size),
            ],
        );
        self
    }

    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::START, "Start").with_size(1.5))
    }

    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> NavResult<()> {
        self.apply_settings();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| NavError::Visualization(e.to_string()))
    }

    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> NavResult<()> {
        self.apply_settings();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| NavError::Visualization(e.to_string()))
    }

    pub fn save_svg(&mut self, path: &str, width: u32, height: u32) -> NavResult<()> {
        self.apply_settings();
        self.figure
            .save_to_svg(path, width, height)
            .map_err(|e| NavError::Visualization(e.to_string()))
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualizable for ObstacleSet {
    fn visualize(&self, vis: &mut Visualizer) {
        vis.set_bounds(&self.bounds()).plot_obstacles(self);
    }
}

impl Visualizable for VisibilityGraph {
    fn visualize(&self, vis: &mut Visualizer) {
        vis.plot_visibility_graph(self);
    }
}

impl Visualizable for Route {
    fn visualize(&self, vis: &mut Visualizer) {
        vis.plot_route(self);
        if let (Some(start), Some(goal)) = (self.path.first(), self.path.last()) {
            vis.plot_start(start).plot_goal(goal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualizer_creation() {
        let vis = Visualizer::new();
        assert_eq!(vis.aspect_ratio, Some(1.0));
    }

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path").with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }

    #[test]
    fn test_outline_is_closed() {
        let (x, y) = outline(&Rect::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!((x[0], y[0]), (x[4], y[4]));
        assert_eq!((x[2], y[2]), (2.0, 1.0));
    }

    #[test]
    fn test_segment_series_breaks() {
        let (x, y) = segment_series(vec![
            (Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)),
            (Point2D::new(2.0, 2.0), Point2D::new(3.0, 3.0)),
        ]);
        assert_eq!(x.len(), 6);
        assert!(x[2].is_nan() && y[5].is_nan());
    }

    #[test]
    fn test_set_bounds() {
        let mut vis = Visualizer::new();
        vis.set_bounds(&Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(vis.x_range, Some((0.0, 100.0)));
        assert_eq!(vis.y_range, Some((0.0, 50.0)));
    }
}
