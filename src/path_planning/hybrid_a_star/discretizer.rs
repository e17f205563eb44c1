//! Continuous pose to discrete cell mapping for duplicate suppression

use std::f64::consts::PI;

use crate::common::{Gear, Pose};

/// Discrete state index used as closed-set and best-cost key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscreteKey {
    pub x: i64,
    pub y: i64,
    pub heading: i64,
    /// Present only when gears are tracked separately
    pub gear: Option<Gear>,
}

/// Buckets poses by position and heading
#[derive(Debug, Clone)]
pub struct StateDiscretizer {
    xy_resolution: f64,
    heading_resolution: f64,
    heading_bins: i64,
    track_gear: bool,
}

impl StateDiscretizer {
    /// Resolutions are assumed positive (checked by the planner config).
    ///
    /// The heading resolution is snapped to `2pi / bins` so the bins tile
    /// the circle exactly.
    pub fn new(xy_resolution: f64, heading_resolution: f64, track_gear: bool) -> Self {
        let heading_bins = ((2.0 * PI / heading_resolution).round() as i64).max(1);
        Self {
            xy_resolution,
            heading_resolution: 2.0 * PI / heading_bins as f64,
            heading_bins,
            track_gear,
        }
    }

    pub fn heading_bins(&self) -> i64 {
        self.heading_bins
    }

    pub fn discretize(&self, pose: &Pose) -> DiscreteKey {
        DiscreteKey {
            x: (pose.x / self.xy_resolution).round() as i64,
            y: (pose.y / self.xy_resolution).round() as i64,
            // bin 0 is centred on +-pi, so the wrap never lands on a bin edge
            heading: (((pose.yaw - PI) / self.heading_resolution).round() as i64)
                .rem_euclid(self.heading_bins),
            gear: if self.track_gear { Some(pose.gear) } else { None },
        }
    }
}
