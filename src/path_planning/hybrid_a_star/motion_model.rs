//! Motion model for the Hybrid A* planner
//!
//! Bicycle kinematic model stepped by travelled distance, plus the
//! discrete action set (steering angle x gear) used to expand nodes.

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::common::{normalize_angle, Gear, MotionModel, Pose, RoboticsError, RoboticsResult};
use crate::utils::OccupancyGrid;

/// Steering magnitude below which an action counts as driving straight [rad]
const STRAIGHT_THRESHOLD: f64 = 0.1;

/// Vehicle geometry and motion limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    /// Wheelbase [m]
    pub wheelbase: f64,
    /// Maximum steering angle [rad], strictly below pi/2
    pub max_steer: f64,
    /// Distance travelled per expansion [m]
    pub step_size: f64,
    /// Vehicle width [m]
    pub width: f64,
    /// Vehicle length [m]
    pub length: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            wheelbase: 2.8,
            max_steer: 0.6,
            step_size: 0.5,
            width: 1.8,
            length: 4.5,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> RoboticsResult<()> {
        let positive = [
            ("wheelbase", self.wheelbase),
            ("step_size", self.step_size),
            ("width", self.width),
            ("length", self.length),
        ];
        for (name, value) in positive.iter() {
            if !(*value > 0.0) || !value.is_finite() {
                return Err(RoboticsError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        // tan(max_steer) must stay finite
        if !(self.max_steer > 0.0 && self.max_steer < std::f64::consts::FRAC_PI_2) {
            return Err(RoboticsError::InvalidParameter(format!(
                "max_steer must be in (0, pi/2), got {}",
                self.max_steer
            )));
        }
        Ok(())
    }
}

/// Steering direction of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Straight,
    Left,
    Right,
}

/// Tag identifying the kind of maneuver that produced a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionLabel {
    pub gear: Gear,
    pub turn: Turn,
}

/// One motion primitive: a fixed steering angle driven in one gear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    /// Steering angle [rad], positive turns left
    pub steer: f64,
    pub gear: Gear,
}

impl Action {
    pub fn new(steer: f64, gear: Gear) -> Self {
        Self { steer, gear }
    }

    pub fn label(&self) -> ActionLabel {
        let turn = if self.steer.abs() < STRAIGHT_THRESHOLD {
            Turn::Straight
        } else if self.steer > 0.0 {
            Turn::Left
        } else {
            Turn::Right
        };
        ActionLabel {
            gear: self.gear,
            turn,
        }
    }
}

/// Build the expansion action set.
///
/// Steering angles are `0, +a1, -a1, +a2, -a2, ...` up to `max_steer`;
/// `steering_samples` must be odd. Gear is the outer loop, forward first.
pub fn action_set(max_steer: f64, steering_samples: usize, enable_reverse: bool) -> Vec<Action> {
    let half = steering_samples.saturating_sub(1) / 2;
    let mut steers = vec![0.0];
    for k in 1..=half {
        let angle = max_steer * k as f64 / half as f64;
        steers.push(angle);
        steers.push(-angle);
    }

    let gears: &[Gear] = if enable_reverse {
        &[Gear::Forward, Gear::Reverse]
    } else {
        &[Gear::Forward]
    };

    iproduct!(gears.iter(), steers.iter())
        .map(|(&gear, &steer)| Action::new(steer, gear))
        .collect()
}

/// Bicycle kinematic model
#[derive(Debug, Clone)]
pub struct BicycleModel {
    wheelbase: f64,
}

impl BicycleModel {
    pub fn new(wheelbase: f64) -> Self {
        Self { wheelbase }
    }

    pub fn from_params(params: &VehicleParams) -> Self {
        Self::new(params.wheelbase)
    }

    /// Advance a pose and require the result to stay inside the map.
    ///
    /// Returns `None` when the new position leaves the grid's world extent,
    /// which is an ordinary outcome while expanding nodes near the border.
    pub fn step(
        &self,
        pose: &Pose,
        action: &Action,
        distance: f64,
        grid: &OccupancyGrid,
    ) -> Option<Pose> {
        let next = self.propagate(pose, action, distance);
        if grid.contains_world(next.x, next.y) {
            Some(next)
        } else {
            None
        }
    }

    /// Integrate one primitive in `substeps` equal steps.
    ///
    /// Returns every intermediate pose, the last one being the successor,
    /// or `None` if any of them leaves the map.
    pub fn sweep(
        &self,
        pose: &Pose,
        action: &Action,
        distance: f64,
        substeps: usize,
        grid: &OccupancyGrid,
    ) -> Option<Vec<Pose>> {
        let n = substeps.max(1);
        let ds = distance / n as f64;
        let mut poses = Vec::with_capacity(n);
        let mut current = *pose;
        for _ in 0..n {
            current = self.step(&current, action, ds, grid)?;
            poses.push(current);
        }
        Some(poses)
    }
}

impl MotionModel for BicycleModel {
    type State = Pose;
    type Control = Action;

    /// Advance a pose by `distance` along the action, ignoring the map.
    ///
    /// The steering angle is used as given; the action set already keeps it
    /// within `[-max_steer, max_steer]`.
    fn propagate(&self, state: &Pose, control: &Action, distance: f64) -> Pose {
        let d = distance * control.gear.sign();
        Pose {
            x: state.x + d * state.yaw.cos(),
            y: state.y + d * state.yaw.sin(),
            yaw: normalize_angle(state.yaw + d * control.steer.tan() / self.wheelbase),
            gear: control.gear,
        }
    }
}
