//! Obstacle store for venue floor plans
//!
//! A venue is a width x height map holding axis-aligned rectangles (booths,
//! walls, stages, ...). Each rectangle carries a [`Category`]; whether it
//! blocks movement is decided once, at load time, by a [`BlockingPolicy`].

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::common::{NavError, NavResult, Point2D};
use crate::map::geometry::Rect;

/// Kind of rectangle on a venue floor plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Booth,
    Wall,
    Stage,
    Restroom,
    Food,
    Information,
    Exit,
    Entrance,
    /// Generic obstacle
    Obstacle,
    Empty,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Booth,
        Category::Wall,
        Category::Stage,
        Category::Restroom,
        Category::Food,
        Category::Information,
        Category::Exit,
        Category::Entrance,
        Category::Obstacle,
        Category::Empty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Booth => "booth",
            Category::Wall => "wall",
            Category::Stage => "stage",
            Category::Restroom => "restroom",
            Category::Food => "food",
            Category::Information => "information",
            Category::Exit => "exit",
            Category::Entrance => "entrance",
            Category::Obstacle => "obstacle",
            Category::Empty => "empty",
        }
    }

    /// Whether this category blocks movement under the default policy
    pub fn is_blocking(&self) -> bool {
        BlockingPolicy::default().is_blocking(*self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = NavError;

    /// Case-insensitive; `-` and spaces are read as `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let category = match normalized.as_str() {
            "booth" => Category::Booth,
            "wall" => Category::Wall,
            "stage" => Category::Stage,
            "restroom" => Category::Restroom,
            "food" => Category::Food,
            "information" | "info" => Category::Information,
            "exit" => Category::Exit,
            "entrance" => Category::Entrance,
            "obstacle" | "generic" | "generic_obstacle" => Category::Obstacle,
            "empty" | "" => Category::Empty,
            _ => {
                return Err(NavError::InvalidParameter(format!(
                    "unknown obstacle category '{}'",
                    s
                )))
            }
        };
        Ok(category)
    }
}

/// Decides which categories are impassable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockingPolicy {
    /// Categories that can be walked through
    pub passable: Vec<Category>,
}

impl BlockingPolicy {
    /// Every category blocks
    pub fn all_blocking() -> Self {
        Self { passable: Vec::new() }
    }

    pub fn is_blocking(&self, category: Category) -> bool {
        !self.passable.contains(&category)
    }
}

impl Default for BlockingPolicy {
    fn default() -> Self {
        Self {
            passable: vec![Category::Entrance, Category::Exit, Category::Empty],
        }
    }
}

fn default_category() -> String {
    Category::Obstacle.as_str().to_string()
}

/// Raw rectangle record as supplied by a venue description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
}

impl ObstacleRecord {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, name: &str, category: &str) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

/// Venue description: map size plus obstacle records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueLayout {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub obstacles: Vec<ObstacleRecord>,
}

impl VenueLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            obstacles: Vec::new(),
        }
    }

    /// Parse a layout from JSON
    pub fn from_json(json: &str) -> NavResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style helper for adding a rectangle
    pub fn with_obstacle(
        mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        name: &str,
        category: &str,
    ) -> Self {
        self.obstacles.push(ObstacleRecord::new(x1, y1, x2, y2, name, category));
        self
    }
}

/// A normalized, classified obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub name: String,
    pub category: Category,
    blocking: bool,
}

impl Obstacle {
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }
}

/// Loaded set of obstacles for one venue
#[derive(Debug, Clone)]
pub struct ObstacleSet {
    width: f64,
    height: f64,
    obstacles: Vec<Obstacle>,
    blocking: Vec<usize>,
}

impl ObstacleSet {
    /// Normalize and classify every record of `layout`.
    ///
    /// Inverted extents are swapped. Non-finite coordinates or a
    /// non-positive map size are rejected.
    pub fn load(layout: &VenueLayout, policy: &BlockingPolicy) -> NavResult<Self> {
        if !(layout.width.is_finite() && layout.width > 0.0)
            || !(layout.height.is_finite() && layout.height > 0.0)
        {
            return Err(NavError::InvalidParameter(format!(
                "map size must be positive and finite, got {} x {}",
                layout.width, layout.height
            )));
        }

        let mut obstacles = Vec::with_capacity(layout.obstacles.len());
        let mut blocking = Vec::new();
        let mut normalized = 0usize;

        for record in &layout.obstacles {
            let coords = [
                ("x1", record.x1),
                ("y1", record.y1),
                ("x2", record.x2),
                ("y2", record.y2),
            ];
            if let Some((field, value)) = coords.iter().find(|(_, v)| !v.is_finite()) {
                return Err(NavError::InvalidObstacle {
                    name: record.name.clone(),
                    reason: format!("{} is {}", field, value),
                });
            }

            if record.x1 > record.x2 || record.y1 > record.y2 {
                normalized += 1;
                debug!("normalizing inverted rectangle '{}'", record.name);
            }

            let category = record.category.parse::<Category>().unwrap_or_else(|_| {
                debug!(
                    "unknown category '{}' for '{}', treating as obstacle",
                    record.category, record.name
                );
                Category::Obstacle
            });
            let is_blocking = policy.is_blocking(category);
            if is_blocking {
                blocking.push(obstacles.len());
            }

            obstacles.push(Obstacle {
                rect: Rect::new(record.x1, record.y1, record.x2, record.y2),
                name: record.name.clone(),
                category,
                blocking: is_blocking,
            });
        }

        info!(
            "loaded {} obstacles ({} blocking, {} normalized) on {} x {} map",
            obstacles.len(),
            blocking.len(),
            normalized,
            layout.width,
            layout.height
        );

        Ok(Self {
            width: layout.width,
            height: layout.height,
            obstacles,
            blocking,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn in_bounds(&self, p: Point2D) -> bool {
        self.bounds().contains(p)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Indices of blocking obstacles, ascending
    pub fn blocking_indices(&self) -> &[usize] {
        &self.blocking
    }

    pub fn iter_blocking(&self) -> impl Iterator<Item = (usize, &Obstacle)> + '_ {
        self.blocking.iter().map(move |&i| (i, &self.obstacles[i]))
    }
}
