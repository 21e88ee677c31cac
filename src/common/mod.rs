//! Common types, traits, and error definitions for venue_nav
//!
//! This module provides the foundational building blocks used across
//! the obstacle map and the route planner.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
