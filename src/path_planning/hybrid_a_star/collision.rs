//! Footprint collision checking against an occupancy grid

use itertools::iproduct;
use nalgebra::{Isometry2, Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::common::Pose;
use crate::utils::OccupancyGrid;

use super::motion_model::VehicleParams;

/// Obstacle-proximity penalty settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Half-size k of the (2k+1) x (2k+1) cell window scanned around each corner
    pub window_radius: usize,
    /// Cell distance below which the penalty applies
    pub safety_distance: f64,
    /// Keeps the penalty finite at zero distance
    pub epsilon: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            window_radius: 2,
            safety_distance: 1.0,
            epsilon: 0.1,
        }
    }
}

/// Rectangular vehicle footprint centered on the pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub length: f64,
    pub width: f64,
}

impl Footprint {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    pub fn from_params(params: &VehicleParams) -> Self {
        Self::new(params.length, params.width)
    }

    /// World coordinates of the four corners: rear-right, rear-left, front-left, front-right
    pub fn corners(&self, pose: &Pose) -> [Point2<f64>; 4] {
        let hl = self.length / 2.0;
        let hw = self.width / 2.0;
        let iso = Isometry2::new(Vector2::new(pose.x, pose.y), pose.yaw);
        [
            iso * Point2::new(-hl, -hw),
            iso * Point2::new(-hl, hw),
            iso * Point2::new(hl, hw),
            iso * Point2::new(hl, -hw),
        ]
    }
}

/// Collision and proximity queries for one grid and footprint
pub struct CollisionChecker<'a> {
    grid: &'a OccupancyGrid,
    footprint: Footprint,
    proximity: ProximityConfig,
}

impl<'a> CollisionChecker<'a> {
    pub fn new(grid: &'a OccupancyGrid, footprint: Footprint, proximity: ProximityConfig) -> Self {
        Self {
            grid,
            footprint,
            proximity,
        }
    }

    /// True if any footprint corner lies in an occupied cell or off the map
    pub fn is_colliding(&self, pose: &Pose) -> bool {
        self.footprint
            .corners(pose)
            .iter()
            .any(|c| self.grid.is_occupied_world(c.x, c.y).unwrap_or(true))
    }

    /// True if any pose of a swept primitive collides
    pub fn is_trajectory_colliding(&self, poses: &[Pose]) -> bool {
        poses.iter().any(|p| self.is_colliding(p))
    }

    /// Smallest cell distance from any corner to an occupied cell in its scan window.
    ///
    /// `None` when no occupied cell lies within any window.
    pub fn nearest_obstacle_distance(&self, pose: &Pose) -> Option<f64> {
        let k = self.proximity.window_radius as i64;
        let mut min_distance: Option<f64> = None;
        for corner in self.footprint.corners(pose).iter() {
            let (cx, cy) = self.grid.world_to_cell(corner.x, corner.y);
            for (dx, dy) in iproduct!(-k..=k, -k..=k) {
                if self.grid.is_occupied(cx + dx, cy + dy) == Some(true) {
                    let d = ((dx * dx + dy * dy) as f64).sqrt();
                    min_distance = Some(min_distance.map_or(d, |m| m.min(d)));
                }
            }
        }
        min_distance
    }

    /// Repulsive penalty `1 / (d + epsilon)` when the nearest obstacle is
    /// closer than the safety distance, 0 otherwise.
    ///
    /// Local measure only: obstacles outside the scan windows are ignored.
    pub fn obstacle_penalty(&self, pose: &Pose) -> f64 {
        match self.nearest_obstacle_distance(pose) {
            Some(d) if d < self.proximity.safety_distance => 1.0 / (d + self.proximity.epsilon),
            _ => 0.0,
        }
    }
}
