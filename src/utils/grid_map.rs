// Occupancy grid map definition
// Based on the nalgebra grid map by Salah Eddine Ghamri (s.ghamri)

use std::ops::Deref;
extern crate nalgebra as na;

use crate::common::{RoboticsError, RoboticsResult};

/// Fixed-size 2-D grid of free (0) / occupied (1) cells with a world transform.
///
/// Rows index `y`, columns index `x`. A world point maps to the cell
/// `floor((x - origin_x) / resolution), floor((y - origin_y) / resolution)`,
/// so with the default origin and unit resolution `grid_x = floor(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    grid: na::DMatrix<u8>,
    resolution: f64,
    origin_x: f64,
    origin_y: f64,
}

impl OccupancyGrid {
    /// All-free grid of `width` x `height` cells
    pub fn new(width: usize, height: usize) -> RoboticsResult<Self> {
        Self::from_matrix(na::DMatrix::<u8>::zeros(height, width))
    }

    /// Build from a matrix of 0/1 values; any non-zero value is occupied
    pub fn from_matrix(matrix: na::DMatrix<u8>) -> RoboticsResult<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(RoboticsError::InvalidParameter(
                "occupancy grid must not be empty".to_string(),
            ));
        }
        let grid = matrix.map(|v| if v != 0 { 1 } else { 0 });
        Ok(Self {
            grid,
            resolution: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
        })
    }

    /// Build from rows, `rows[y][x]`
    pub fn from_rows(rows: &[Vec<u8>]) -> RoboticsResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return Err(RoboticsError::InvalidParameter(
                "occupancy grid rows must have equal length".to_string(),
            ));
        }
        Self::from_matrix(na::DMatrix::from_fn(height, width, |y, x| rows[y][x]))
    }

    /// Set the cell edge length in world units
    pub fn with_resolution(mut self, resolution: f64) -> RoboticsResult<Self> {
        if !(resolution > 0.0) || !resolution.is_finite() {
            return Err(RoboticsError::InvalidParameter(format!(
                "grid resolution must be positive, got {}",
                resolution
            )));
        }
        self.resolution = resolution;
        Ok(self)
    }

    /// Set the world position of the grid's lower-left corner
    pub fn with_origin(mut self, origin_x: f64, origin_y: f64) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    /// Split every cell into `scale` x `scale` cells covering the same world extent
    pub fn upscale(&self, scale: usize) -> RoboticsResult<Self> {
        if scale < 1 {
            return Err(RoboticsError::InvalidParameter(
                "scale must be >= 1".to_string(),
            ));
        }
        let grid = self.grid.kronecker(&na::DMatrix::<u8>::repeat(scale, scale, 1));
        Ok(Self {
            grid,
            resolution: self.resolution / scale as f64,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.ncols()
    }

    pub fn height(&self) -> usize {
        self.grid.nrows()
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Mark a single cell; returns false if the cell is outside the grid
    pub fn set_occupied(&mut self, ix: usize, iy: usize, occupied: bool) -> bool {
        if ix >= self.width() || iy >= self.height() {
            return false;
        }
        self.grid[(iy, ix)] = if occupied { 1 } else { 0 };
        true
    }

    /// Occupy the inclusive cell rectangle, clamped to the grid
    pub fn fill_rect(&mut self, x_min: usize, y_min: usize, x_max: usize, y_max: usize) {
        if x_min >= self.width() || y_min >= self.height() {
            return;
        }
        let x_max = x_max.min(self.width() - 1);
        let y_max = y_max.min(self.height() - 1);
        for iy in y_min..=y_max {
            for ix in x_min..=x_max {
                self.grid[(iy, ix)] = 1;
            }
        }
    }

    /// Cell containing a world point (may lie outside the grid)
    pub fn world_to_cell(&self, x: f64, y: f64) -> (i64, i64) {
        (
            ((x - self.origin_x) / self.resolution).floor() as i64,
            ((y - self.origin_y) / self.resolution).floor() as i64,
        )
    }

    /// World coordinates of a cell's center
    pub fn cell_center(&self, ix: i64, iy: i64) -> (f64, f64) {
        (
            self.origin_x + (ix as f64 + 0.5) * self.resolution,
            self.origin_y + (iy as f64 + 0.5) * self.resolution,
        )
    }

    pub fn contains_cell(&self, ix: i64, iy: i64) -> bool {
        ix >= 0 && iy >= 0 && (ix as usize) < self.width() && (iy as usize) < self.height()
    }

    /// Whether a world point lies inside the grid's world extent
    pub fn contains_world(&self, x: f64, y: f64) -> bool {
        let (ix, iy) = self.world_to_cell(x, y);
        x.is_finite() && y.is_finite() && self.contains_cell(ix, iy)
    }

    /// Occupancy of a cell, `None` outside the grid
    pub fn is_occupied(&self, ix: i64, iy: i64) -> Option<bool> {
        if self.contains_cell(ix, iy) {
            Some(self.grid[(iy as usize, ix as usize)] != 0)
        } else {
            None
        }
    }

    /// Occupancy of the cell containing a world point, `None` outside the grid
    pub fn is_occupied_world(&self, x: f64, y: f64) -> Option<bool> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (ix, iy) = self.world_to_cell(x, y);
        self.is_occupied(ix, iy)
    }

    pub fn occupied_count(&self) -> usize {
        self.grid.iter().filter(|&&v| v != 0).count()
    }
}

impl Deref for OccupancyGrid {
    type Target = na::DMatrix<u8>;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_rejected() {
        assert!(OccupancyGrid::new(0, 10).is_err());
        assert!(OccupancyGrid::new(10, 0).is_err());
        assert!(OccupancyGrid::from_rows(&[]).is_err());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![0, 0, 0], vec![0, 0]];
        assert!(OccupancyGrid::from_rows(&rows).is_err());
    }

    #[test]
    fn test_from_rows_indexing() {
        let rows = vec![vec![0, 0, 1], vec![0, 0, 0]];
        let grid = OccupancyGrid::from_rows(&rows).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.is_occupied(2, 0), Some(true));
        assert_eq!(grid.is_occupied(0, 1), Some(false));
        assert_eq!(grid.is_occupied(3, 0), None);
        assert_eq!(grid.is_occupied(-1, 0), None);
    }

    #[test]
    fn test_world_to_cell_floors() {
        let grid = OccupancyGrid::new(10, 10).unwrap();
        assert_eq!(grid.world_to_cell(2.9, 0.1), (2, 0));
        assert_eq!(grid.world_to_cell(-0.1, 3.0), (-1, 3));
        assert!(grid.contains_world(9.99, 9.99));
        assert!(!grid.contains_world(10.0, 5.0));
        assert!(!grid.contains_world(-0.01, 5.0));
        assert!(!grid.contains_world(f64::NAN, 5.0));
    }

    #[test]
    fn test_resolution_and_origin() {
        let grid = OccupancyGrid::new(10, 10)
            .unwrap()
            .with_resolution(0.5)
            .unwrap()
            .with_origin(-2.0, 1.0);
        assert_eq!(grid.world_to_cell(-2.0, 1.0), (0, 0));
        assert_eq!(grid.world_to_cell(0.6, 2.2), (5, 2));
        assert!(!grid.contains_world(3.0, 2.0));
        let (cx, cy) = grid.cell_center(0, 0);
        assert!((cx + 1.75).abs() < 1e-10);
        assert!((cy - 1.25).abs() < 1e-10);
        assert!(OccupancyGrid::new(2, 2).unwrap().with_resolution(0.0).is_err());
    }

    #[test]
    fn test_fill_rect_clamps() {
        let mut grid = OccupancyGrid::new(5, 5).unwrap();
        grid.fill_rect(3, 3, 10, 10);
        assert_eq!(grid.occupied_count(), 4);
        assert_eq!(grid.is_occupied(4, 4), Some(true));
        assert_eq!(grid.is_occupied(2, 4), Some(false));
    }

    #[test]
    fn test_fill_rect_outside_grid_is_noop() {
        let mut grid = OccupancyGrid::new(5, 5).unwrap();
        grid.fill_rect(100, 100, 200, 200);
        grid.fill_rect(7, 0, 9, 4);
        grid.fill_rect(0, 5, 4, 8);
        assert_eq!(grid.occupied_count(), 0);
        // inverted bounds mark nothing either
        grid.fill_rect(3, 3, 1, 1);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_set_occupied() {
        let mut grid = OccupancyGrid::new(3, 3).unwrap();
        assert!(grid.set_occupied(1, 2, true));
        assert!(!grid.set_occupied(3, 0, true));
        assert_eq!(grid.is_occupied_world(1.5, 2.5), Some(true));
        assert!(grid.set_occupied(1, 2, false));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_upscale_keeps_world_extent() {
        let mut grid = OccupancyGrid::new(2, 2).unwrap();
        grid.set_occupied(1, 0, true);
        let fine = grid.upscale(3).unwrap();
        assert_eq!(fine.width(), 6);
        assert_eq!(fine.height(), 6);
        assert_eq!(fine.occupied_count(), 9);
        assert!((fine.resolution() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(fine.is_occupied_world(1.5, 0.5), Some(true));
        assert_eq!(fine.is_occupied_world(0.5, 1.5), Some(false));
        assert!(grid.upscale(0).is_err());
    }

    #[test]
    fn test_deref_to_matrix() {
        let grid = OccupancyGrid::new(4, 2).unwrap();
        assert_eq!(grid.nrows(), 2);
        assert_eq!(grid.ncols(), 4);
    }
}
