//! Common types used throughout hybrid_astar

use std::f64::consts::PI;
use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Normalize angle to (-pi, pi]
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let a = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if a <= -PI {
        PI
    } else {
        a
    }
}

/// Direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gear {
    Forward,
    Reverse,
}

impl Gear {
    /// +1 for forward, -1 for reverse
    pub fn sign(&self) -> f64 {
        match self {
            Gear::Forward => 1.0,
            Gear::Reverse => -1.0,
        }
    }
}

impl Default for Gear {
    fn default() -> Self {
        Gear::Forward
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gear::Forward => write!(f, "Forward"),
            Gear::Reverse => write!(f, "Reverse"),
        }
    }
}

/// Vehicle pose: position, heading and gear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in (-pi, pi]
    pub yaw: f64,
    pub gear: Gear,
}

impl Pose {
    /// Forward-gear pose with normalized heading
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self::with_gear(x, y, yaw, Gear::Forward)
    }

    pub fn with_gear(x: f64, y: f64, yaw: f64, gear: Gear) -> Self {
        Self {
            x,
            y,
            yaw: normalize_angle(yaw),
            gear,
        }
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance between positions, heading ignored
    pub fn distance(&self, other: &Pose) -> f64 {
        (self.position() - other.position()).norm()
    }

    /// Absolute wrapped heading difference in [0, pi]
    pub fn heading_difference(&self, other: &Pose) -> f64 {
        normalize_angle(self.yaw - other.yaw).abs()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.yaw.is_finite()
    }
}

impl From<(f64, f64, f64)> for Pose {
    fn from(tuple: (f64, f64, f64)) -> Self {
        Pose::new(tuple.0, tuple.1, tuple.2)
    }
}

/// A pose on a planned path together with the cost accumulated to reach it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub pose: Pose,
    pub cost: f64,
}

/// Path represented as an ordered sequence of poses, start first
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub points: Vec<PathPoint>,
}

impl Path {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<PathPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn poses(&self) -> impl Iterator<Item = &Pose> + '_ {
        self.points.iter().map(|p| &p.pose)
    }

    pub fn first(&self) -> Option<&PathPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PathPoint> {
        self.points.last()
    }

    /// Accumulated cost at the final pose
    pub fn final_cost(&self) -> f64 {
        self.points.last().map(|p| p.cost).unwrap_or(0.0)
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.pose.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.pose.y).collect()
    }

    pub fn yaws(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.pose.yaw).collect()
    }

    pub fn total_length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points
            .windows(2)
            .map(|w| w[0].pose.distance(&w[1].pose))
            .sum()
    }

    pub fn forward_steps(&self) -> usize {
        self.poses().filter(|p| p.gear == Gear::Forward).count()
    }

    pub fn reverse_steps(&self) -> usize {
        self.poses().filter(|p| p.gear == Gear::Reverse).count()
    }

    /// Number of Forward/Reverse switches along the path
    pub fn gear_changes(&self) -> usize {
        self.points
            .windows(2)
            .filter(|w| w[0].pose.gear != w[1].pose.gear)
            .count()
    }
}
