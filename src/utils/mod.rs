//! Utility modules for hybrid_astar

pub mod grid_map;

pub use grid_map::*;
