//! Common traits defining interfaces for planning components

use crate::common::error::RoboticsError;
use crate::common::types::*;

/// Trait for planners that search over full vehicle poses
pub trait PosePlanner {
    /// Plan a path from start to goal
    fn plan(&self, start: Pose, goal: Pose) -> Result<Path, RoboticsError>;
}

/// Trait for vehicle/robot motion models
pub trait MotionModel {
    /// State type
    type State;
    /// Control type
    type Control;

    /// Propagate state forward by a travelled distance
    fn propagate(&self, state: &Self::State, control: &Self::Control, distance: f64) -> Self::State;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that traits compile correctly
    struct DummyPlanner;

    impl PosePlanner for DummyPlanner {
        fn plan(&self, start: Pose, goal: Pose) -> Result<Path, RoboticsError> {
            Ok(Path::from_points(vec![
                PathPoint { pose: start, cost: 0.0 },
                PathPoint { pose: goal, cost: start.distance(&goal) },
            ]))
        }
    }

    #[test]
    fn test_pose_planner_trait() {
        let planner = DummyPlanner;
        let result = planner.plan(Pose::new(0.0, 0.0, 0.0), Pose::new(1.0, 1.0, 0.0));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 2);
    }
}
