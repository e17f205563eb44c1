//! Hybrid A* parking demo
//!
//! Plans a parking maneuver in a small lot and prints path statistics.
//! An optional YAML config file can be given as the first argument.
//!
//! Run with `RUST_LOG=debug` to see planner progress.

use std::f64::consts::PI;
use std::fs;

use hybrid_astar::common::{Pose, PosePlanner, RoboticsResult};
use hybrid_astar::path_planning::hybrid_a_star::{HybridAStarConfig, HybridAStarPlanner};
use hybrid_astar::utils::OccupancyGrid;

fn parking_lot() -> RoboticsResult<OccupancyGrid> {
    let mut grid = OccupancyGrid::new(50, 40)?;

    // boundary walls
    grid.fill_rect(0, 0, 1, 39);
    grid.fill_rect(48, 0, 49, 39);
    grid.fill_rect(0, 0, 49, 1);
    grid.fill_rect(0, 38, 49, 39);

    // bay markings
    grid.fill_rect(6, 25, 11, 25);
    grid.fill_rect(6, 25, 6, 32);

    // parked cars
    grid.fill_rect(35, 8, 40, 13);
    grid.fill_rect(35, 20, 40, 25);

    Ok(grid)
}

fn load_config() -> RoboticsResult<HybridAStarConfig> {
    match std::env::args().nth(1) {
        Some(file) => {
            let yaml = fs::read_to_string(&file).map_err(|e| {
                hybrid_astar::RoboticsError::ConfigError(format!("{}: {}", file, e))
            })?;
            HybridAStarConfig::from_yaml(&yaml)
        }
        None => Ok(HybridAStarConfig::parking()),
    }
}

fn main() -> RoboticsResult<()> {
    env_logger::init();
    println!("Hybrid A* parking start!!");

    let grid = parking_lot()?;
    println!(
        "Map {}x{} cells, {} occupied",
        grid.width(),
        grid.height(),
        grid.occupied_count()
    );

    let config = load_config()?;
    let planner = HybridAStarPlanner::new(grid, config)?;

    let start = Pose::new(20.0, 10.0, PI / 2.0);
    let goal = Pose::new(9.0, 29.0, PI / 2.0);
    println!("Start: ({:.1}, {:.1}, {:.2})", start.x, start.y, start.yaw);
    println!("Goal:  ({:.1}, {:.1}, {:.2})", goal.x, goal.y, goal.yaw);

    match planner.plan(start, goal) {
        Ok(path) => {
            println!("Path found with {} poses", path.len());
            println!("Total cost: {:.2}", path.final_cost());
            println!("Length: {:.2} m", path.total_length());
            println!("Forward steps: {}", path.forward_steps());
            println!("Reverse steps: {}", path.reverse_steps());
            println!("Gear changes: {}", path.gear_changes());
            for point in &path.points {
                let p = point.pose;
                println!("{:8.3} {:8.3} {:7.3} {}", p.x, p.y, p.yaw, p.gear);
            }
        }
        Err(e) => println!("Planning failed: {}", e),
    }

    Ok(())
}
