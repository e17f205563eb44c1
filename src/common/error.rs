//! Error types for hybrid_astar

use std::fmt;

use thiserror::Error;

/// Why a search ended without reaching the goal.
///
/// These are normal outcomes of a bounded search, not faults. Each variant
/// records how many main-loop iterations ran before termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// Iteration budget exhausted with nodes still open
    MaxIterations { iterations: usize },
    /// Open set emptied without reaching the goal
    NoPath { iterations: usize },
    /// External cancellation token was triggered
    Cancelled { iterations: usize },
    /// Wall-clock time budget elapsed
    DeadlineExceeded { iterations: usize },
}

impl SearchFailure {
    pub fn iterations(&self) -> usize {
        match *self {
            SearchFailure::MaxIterations { iterations }
            | SearchFailure::NoPath { iterations }
            | SearchFailure::Cancelled { iterations }
            | SearchFailure::DeadlineExceeded { iterations } => iterations,
        }
    }
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFailure::MaxIterations { iterations } => {
                write!(f, "iteration budget exhausted after {} iterations", iterations)
            }
            SearchFailure::NoPath { iterations } => {
                write!(f, "no path found, open set empty after {} iterations", iterations)
            }
            SearchFailure::Cancelled { iterations } => {
                write!(f, "search cancelled after {} iterations", iterations)
            }
            SearchFailure::DeadlineExceeded { iterations } => {
                write!(f, "time budget exceeded after {} iterations", iterations)
            }
        }
    }
}

/// Main error type for the planner
#[derive(Debug, Error)]
pub enum RoboticsError {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Start footprint overlaps an obstacle or leaves the map
    #[error("Start pose ({x:.2}, {y:.2}) is in collision")]
    StartInCollision { x: f64, y: f64 },
    /// Goal footprint overlaps an obstacle or leaves the map
    #[error("Goal pose ({x:.2}, {y:.2}) is in collision")]
    GoalInCollision { x: f64, y: f64 },
    /// Path planning failed
    #[error("Planning error: {0}")]
    PlanningError(SearchFailure),
    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<serde_yaml::Error> for RoboticsError {
    fn from(e: serde_yaml::Error) -> Self {
        RoboticsError::ConfigError(e.to_string())
    }
}

/// Result type alias for planner operations
pub type RoboticsResult<T> = Result<T, RoboticsError>;
