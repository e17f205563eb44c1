//! Hybrid A* Planner Module
//!
//! Kinematically feasible path search for a car-like vehicle on an
//! occupancy grid. Nodes carry continuous poses produced by a bicycle
//! model; duplicates are suppressed on a discretized `(x, y, heading)`
//! lattice, with the gear as an extra dimension when reverse is enabled.
//!
//! # Components
//!
//! - `motion_model`: Bicycle model, vehicle parameters and the action set
//! - `collision`: Rectangular footprint and obstacle proximity checks
//! - `discretizer`: Continuous pose to lattice cell mapping
//! - `cost`: Transition cost terms and the goal heuristic
//! - `node`: Search nodes and open-set ordering
//! - `search`: Limits, cancellation, statistics and outcomes
//! - `planner`: The search loop itself
//!
//! # Example
//!
//! ```no_run
//! use hybrid_astar::common::Pose;
//! use hybrid_astar::path_planning::hybrid_a_star::{HybridAStarConfig, HybridAStarPlanner};
//! use hybrid_astar::utils::OccupancyGrid;
//!
//! let mut grid = OccupancyGrid::new(40, 40).unwrap();
//! grid.fill_rect(18, 0, 20, 25);
//!
//! let planner = HybridAStarPlanner::new(grid, HybridAStarConfig::parking()).unwrap();
//! let report = planner
//!     .search(Pose::new(8.0, 10.0, 0.0), Pose::new(30.0, 10.0, 0.0))
//!     .unwrap();
//!
//! if let Some(path) = report.path() {
//!     println!("{} poses, {} gear changes", path.len(), path.gear_changes());
//! }
//! ```

pub mod collision;
pub mod config;
pub mod cost;
pub mod discretizer;
pub mod motion_model;
pub mod node;
pub mod planner;
pub mod search;

pub use collision::{CollisionChecker, Footprint, ProximityConfig};
pub use config::HybridAStarConfig;
pub use cost::{CostBreakdown, CostModel, CostWeights};
pub use discretizer::{DiscreteKey, StateDiscretizer};
pub use motion_model::{action_set, Action, ActionLabel, BicycleModel, Turn, VehicleParams};
pub use node::{NodeId, SearchNode};
pub use planner::HybridAStarPlanner;
pub use search::{CancellationToken, SearchLimits, SearchOutcome, SearchReport, SearchStats};
