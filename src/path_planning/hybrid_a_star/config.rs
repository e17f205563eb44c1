//! Hybrid A* planner configuration

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::common::{RoboticsError, RoboticsResult};

use super::collision::ProximityConfig;
use super::cost::CostWeights;
use super::motion_model::VehicleParams;

/// Full planner configuration, loadable from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridAStarConfig {
    /// Vehicle geometry and motion limits
    pub vehicle: VehicleParams,
    /// Position bucket size for duplicate suppression [m]
    pub xy_resolution: f64,
    /// Heading bucket size for duplicate suppression [rad]
    pub heading_resolution: f64,
    /// Per-axis goal position tolerance [m]
    pub position_tolerance: f64,
    /// Goal heading tolerance [rad]
    pub heading_tolerance: f64,
    /// Main-loop iteration budget
    pub max_iterations: usize,
    /// Expand Reverse-gear actions as well as Forward
    pub enable_reverse: bool,
    /// Number of steering angles per gear (odd)
    pub steering_samples: usize,
    /// Integration steps per primitive checked for collision
    pub collision_substeps: usize,
    pub weights: CostWeights,
    pub proximity: ProximityConfig,
}

impl Default for HybridAStarConfig {
    fn default() -> Self {
        Self {
            vehicle: VehicleParams::default(),
            xy_resolution: 0.5,
            heading_resolution: PI / 36.0,
            position_tolerance: 2.0,
            heading_tolerance: 0.5,
            max_iterations: 50_000,
            enable_reverse: false,
            steering_samples: 3,
            collision_substeps: 1,
            weights: CostWeights::default(),
            proximity: ProximityConfig::default(),
        }
    }
}

impl HybridAStarConfig {
    /// Reverse-enabled preset for parking maneuvers
    pub fn parking() -> Self {
        Self {
            position_tolerance: 1.5,
            enable_reverse: true,
            weights: CostWeights::parking(),
            ..Default::default()
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> RoboticsResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> RoboticsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> RoboticsResult<()> {
        self.vehicle.validate()?;
        self.weights.validate()?;

        let positive = [
            ("xy_resolution", self.xy_resolution),
            ("heading_resolution", self.heading_resolution),
            ("position_tolerance", self.position_tolerance),
            ("heading_tolerance", self.heading_tolerance),
            ("proximity.epsilon", self.proximity.epsilon),
        ];
        for (name, value) in positive.iter() {
            if !(*value > 0.0) || !value.is_finite() {
                return Err(RoboticsError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(self.proximity.safety_distance >= 0.0) {
            return Err(RoboticsError::InvalidParameter(format!(
                "proximity.safety_distance must be non-negative, got {}",
                self.proximity.safety_distance
            )));
        }
        if self.max_iterations == 0 {
            return Err(RoboticsError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.steering_samples == 0 || self.steering_samples % 2 == 0 {
            return Err(RoboticsError::InvalidParameter(format!(
                "steering_samples must be odd, got {}",
                self.steering_samples
            )));
        }
        if self.collision_substeps == 0 {
            return Err(RoboticsError::InvalidParameter(
                "collision_substeps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
