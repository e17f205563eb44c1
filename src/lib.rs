//! hybrid_astar - Hybrid A* path search for car-like vehicles
//!
//! This crate plans kinematically feasible paths for a vehicle with a
//! bicycle-model motion constraint on a 2D occupancy grid, optionally
//! using reverse gear for parking maneuvers.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Gear, Path, PathPoint, Pose};
pub use common::{MotionModel, PosePlanner};
pub use common::{RoboticsError, RoboticsResult, SearchFailure};
pub use path_planning::hybrid_a_star::{HybridAStarConfig, HybridAStarPlanner};
pub use utils::OccupancyGrid;
