//! Edge cost and heuristic for the Hybrid A* planner
//!
//! The heuristic is Euclidean distance plus a heading term. It is not
//! admissible once curvature, gear or obstacle terms dominate locally, so
//! the search behaves as a weighted, goal-biased A*: paths are collision
//! free and reach the goal but are not guaranteed optimal.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::common::{Gear, Pose, RoboticsError, RoboticsResult};

use super::collision::CollisionChecker;
use super::motion_model::Action;
use super::node::SearchNode;

/// Weights of the transition cost terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Per metre travelled
    pub distance: f64,
    /// Per radian of heading change
    pub curvature: f64,
    /// Flat charge for switching between Forward and Reverse
    pub gear_change: f64,
    /// Flat charge when the action label changes
    pub direction_change: f64,
    /// Multiplier of the obstacle-proximity penalty
    pub obstacle: f64,
    /// Extra per metre driven in Reverse
    pub reverse: f64,
    /// Heuristic weight of the remaining heading difference
    pub heading_heuristic: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            distance: 1.0,
            curvature: 2.0,
            gear_change: 5.0,
            direction_change: 3.0,
            obstacle: 10.0,
            reverse: 1.5,
            heading_heuristic: 0.5,
        }
    }
}

impl CostWeights {
    /// Weights for the reverse-enabled parking variant
    pub fn parking() -> Self {
        Self {
            gear_change: 10.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> RoboticsResult<()> {
        let weights = [
            ("distance", self.distance),
            ("curvature", self.curvature),
            ("gear_change", self.gear_change),
            ("direction_change", self.direction_change),
            ("obstacle", self.obstacle),
            ("reverse", self.reverse),
            ("heading_heuristic", self.heading_heuristic),
        ];
        for (name, value) in weights.iter() {
            if !(*value >= 0.0) || !value.is_finite() {
                return Err(RoboticsError::InvalidParameter(format!(
                    "cost weight {} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Weighted terms of a single transition
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostBreakdown {
    pub distance: f64,
    pub curvature: f64,
    pub gear_change: f64,
    pub direction_change: f64,
    pub obstacle: f64,
    pub reverse: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.distance
            + self.curvature
            + self.gear_change
            + self.direction_change
            + self.obstacle
            + self.reverse
    }
}

#[derive(Debug, Clone)]
pub struct CostModel {
    weights: CostWeights,
}

impl CostModel {
    pub fn new(weights: CostWeights) -> Self {
        Self { weights }
    }

    pub fn transition_breakdown(
        &self,
        from: &SearchNode,
        to: &Pose,
        action: &Action,
        checker: &CollisionChecker,
    ) -> CostBreakdown {
        let w = &self.weights;
        let distance = from.pose.distance(to);

        CostBreakdown {
            distance: w.distance * distance,
            curvature: w.curvature * to.heading_difference(&from.pose),
            gear_change: if from.pose.gear != to.gear {
                w.gear_change
            } else {
                0.0
            },
            direction_change: if from.action != Some(action.label()) {
                w.direction_change
            } else {
                0.0
            },
            obstacle: w.obstacle * checker.obstacle_penalty(to),
            reverse: if to.gear == Gear::Reverse {
                w.reverse * distance
            } else {
                0.0
            },
        }
    }

    /// Cost of moving from `from` to `to` with `action`; never negative
    pub fn transition_cost(
        &self,
        from: &SearchNode,
        to: &Pose,
        action: &Action,
        checker: &CollisionChecker,
    ) -> f64 {
        self.transition_breakdown(from, to, action, checker).total()
    }

    /// Euclidean distance plus weighted shortest heading difference
    pub fn heuristic(&self, pose: &Pose, goal: &Pose) -> f64 {
        let angle_diff = (pose.yaw - goal.yaw).abs();
        let angle_cost = angle_diff.min(2.0 * PI - angle_diff);
        pose.distance(goal) + self.weights.heading_heuristic * angle_cost
    }
}
