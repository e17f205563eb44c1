//! Hybrid A* planner
//!
//! Searches over continuous vehicle poses `(x, y, yaw, gear)`, expanding
//! nodes with bicycle-model motion primitives and suppressing duplicates
//! on a discretized state lattice.

use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;

use log::{debug, info, trace};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::common::{
    normalize_angle, Gear, Path, PathPoint, Pose, PosePlanner, RoboticsError, RoboticsResult,
    SearchFailure,
};
use crate::utils::OccupancyGrid;

use super::collision::{CollisionChecker, Footprint};
use super::config::HybridAStarConfig;
use super::cost::CostModel;
use super::discretizer::{DiscreteKey, StateDiscretizer};
use super::motion_model::{action_set, Action, BicycleModel};
use super::node::{NodeId, OpenEntry, SearchNode};
use super::search::{SearchLimits, SearchOutcome, SearchReport, SearchStats};

/// Iterations between progress traces
const PROGRESS_INTERVAL: usize = 1000;

/// Private working set of one search invocation
struct SearchState {
    nodes: Vec<SearchNode>,
    open: BinaryHeap<OpenEntry>,
    closed: HashSet<DiscreteKey>,
    /// Best known cost per cell; absent means not reached yet
    best_cost: HashMap<DiscreteKey, f64>,
    sequence: u64,
    stats: SearchStats,
}

impl SearchState {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            open: BinaryHeap::new(),
            closed: HashSet::new(),
            best_cost: HashMap::new(),
            sequence: 0,
            stats: SearchStats::default(),
        }
    }

    fn push(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.open.push(OpenEntry {
            priority: OrderedFloat(node.priority()),
            sequence: self.sequence,
            node: id,
        });
        self.sequence += 1;
        self.nodes.push(node);
        id
    }
}

/// Hybrid A* path planner
pub struct HybridAStarPlanner {
    grid: OccupancyGrid,
    config: HybridAStarConfig,
    model: BicycleModel,
    footprint: Footprint,
    discretizer: StateDiscretizer,
    cost_model: CostModel,
    actions: Vec<Action>,
}

impl HybridAStarPlanner {
    /// Create a planner; rejects invalid configurations
    pub fn new(grid: OccupancyGrid, config: HybridAStarConfig) -> RoboticsResult<Self> {
        config.validate()?;

        let model = BicycleModel::from_params(&config.vehicle);
        let footprint = Footprint::from_params(&config.vehicle);
        // reverse motion is tracked as a separate lattice layer
        let discretizer = StateDiscretizer::new(
            config.xy_resolution,
            config.heading_resolution,
            config.enable_reverse,
        );
        let cost_model = CostModel::new(config.weights.clone());
        let actions = action_set(
            config.vehicle.max_steer,
            config.steering_samples,
            config.enable_reverse,
        );

        debug!(
            "[HybridAStar] grid {}x{} @ {:.2}m, {} heading bins, {} actions, reverse={}",
            grid.width(),
            grid.height(),
            grid.resolution(),
            discretizer.heading_bins(),
            actions.len(),
            config.enable_reverse
        );

        Ok(Self {
            grid,
            config,
            model,
            footprint,
            discretizer,
            cost_model,
            actions,
        })
    }

    /// Create with default configuration
    pub fn with_defaults(grid: OccupancyGrid) -> RoboticsResult<Self> {
        Self::new(grid, HybridAStarConfig::default())
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn config(&self) -> &HybridAStarConfig {
        &self.config
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn collision_checker(&self) -> CollisionChecker<'_> {
        CollisionChecker::new(&self.grid, self.footprint, self.config.proximity.clone())
    }

    /// Per-axis position and wrapped heading tolerance test
    pub fn is_goal_reached(&self, pose: &Pose, goal: &Pose) -> bool {
        (pose.x - goal.x).abs() < self.config.position_tolerance
            && (pose.y - goal.y).abs() < self.config.position_tolerance
            && normalize_angle(pose.yaw - goal.yaw).abs() < self.config.heading_tolerance
    }

    /// Search with the configured iteration budget
    pub fn search(&self, start: Pose, goal: Pose) -> RoboticsResult<SearchReport> {
        self.search_with_limits(start, goal, &SearchLimits::default())
    }

    /// Search from `start` to `goal`.
    ///
    /// Invalid endpoints are errors. Running out of iterations, time or open
    /// nodes, or being cancelled, is reported as `SearchOutcome::Failed`.
    pub fn search_with_limits(
        &self,
        start: Pose,
        goal: Pose,
        limits: &SearchLimits,
    ) -> RoboticsResult<SearchReport> {
        let start = Pose::with_gear(start.x, start.y, start.yaw, Gear::Forward);
        let goal = Pose::with_gear(goal.x, goal.y, goal.yaw, goal.gear);
        let checker = self.collision_checker();
        self.validate_endpoints(&start, &goal, &checker)?;

        let (result, state) = self.run(start, goal, limits, &checker);
        let stats = state.stats;
        let outcome = match result {
            Ok(goal_id) => {
                let path = self.build_path(goal_id, &state.nodes);
                info!(
                    "[HybridAStar] found path after {} iterations: {} poses, cost {:.2}",
                    stats.iterations,
                    path.len(),
                    path.final_cost()
                );
                SearchOutcome::Succeeded(path)
            }
            Err(failure) => {
                info!("[HybridAStar] FAILED: {}", failure);
                SearchOutcome::Failed(failure)
            }
        };

        Ok(SearchReport { outcome, stats })
    }

    /// Run one isolated search per goal in parallel, results in goal order
    pub fn search_many(
        &self,
        start: Pose,
        goals: &[Pose],
        limits: &SearchLimits,
    ) -> Vec<RoboticsResult<SearchReport>> {
        goals
            .par_iter()
            .map(|goal| self.search_with_limits(start, *goal, limits))
            .collect()
    }

    /// Plan a path returning (x, y, yaw) coordinate vectors, `None` on any failure
    pub fn planning(
        &self,
        start: (f64, f64, f64),
        goal: (f64, f64, f64),
    ) -> Option<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        match self.plan(start.into(), goal.into()) {
            Ok(path) => Some((path.x_coords(), path.y_coords(), path.yaws())),
            Err(_) => None,
        }
    }

    fn validate_endpoints(
        &self,
        start: &Pose,
        goal: &Pose,
        checker: &CollisionChecker,
    ) -> RoboticsResult<()> {
        if !start.is_finite() || !goal.is_finite() {
            return Err(RoboticsError::InvalidParameter(
                "start and goal poses must be finite".to_string(),
            ));
        }
        if !self.grid.contains_world(start.x, start.y) || checker.is_colliding(start) {
            debug!(
                "[HybridAStar] FAILED: StartInCollision at ({:.2},{:.2})",
                start.x, start.y
            );
            return Err(RoboticsError::StartInCollision {
                x: start.x,
                y: start.y,
            });
        }
        if !self.grid.contains_world(goal.x, goal.y) || checker.is_colliding(goal) {
            debug!(
                "[HybridAStar] FAILED: GoalInCollision at ({:.2},{:.2})",
                goal.x, goal.y
            );
            return Err(RoboticsError::GoalInCollision {
                x: goal.x,
                y: goal.y,
            });
        }
        Ok(())
    }

    fn run(
        &self,
        start: Pose,
        goal: Pose,
        limits: &SearchLimits,
        checker: &CollisionChecker,
    ) -> (Result<NodeId, SearchFailure>, SearchState) {
        let max_iterations = limits.max_iterations.unwrap_or(self.config.max_iterations);
        let deadline = limits.deadline(Instant::now());
        let mut state = SearchState::new();

        trace!(
            "[HybridAStar] search: start=({:.2},{:.2},{:.2}) goal=({:.2},{:.2},{:.2})",
            start.x, start.y, start.yaw, goal.x, goal.y, goal.yaw
        );

        let start_h = self.cost_model.heuristic(&start, &goal);
        state.push(SearchNode::new(start, 0.0, start_h, None, None));
        state.best_cost.insert(self.discretizer.discretize(&start), 0.0);

        loop {
            let iterations = state.stats.iterations;
            if state.open.is_empty() {
                return (Err(SearchFailure::NoPath { iterations }), state);
            }
            if iterations >= max_iterations {
                return (Err(SearchFailure::MaxIterations { iterations }), state);
            }
            if limits.is_cancelled() {
                return (Err(SearchFailure::Cancelled { iterations }), state);
            }
            if deadline.map_or(false, |d| Instant::now() >= d) {
                return (Err(SearchFailure::DeadlineExceeded { iterations }), state);
            }

            let entry = match state.open.pop() {
                Some(entry) => entry,
                None => continue,
            };
            state.stats.iterations += 1;
            let current_id = entry.node;
            let current = state.nodes[current_id.0].clone();

            if self.is_goal_reached(&current.pose, &goal) {
                return (Ok(current_id), state);
            }

            // popped at its best priority already, so no cost re-check
            if !state.closed.insert(self.discretizer.discretize(&current.pose)) {
                state.stats.duplicates_skipped += 1;
                continue;
            }
            state.stats.nodes_expanded += 1;

            if state.stats.iterations % PROGRESS_INTERVAL == 0 {
                trace!(
                    "[HybridAStar] iteration {}: at ({:.1},{:.1},{:.2}) {}, open={}, closed={}",
                    state.stats.iterations,
                    current.pose.x,
                    current.pose.y,
                    current.pose.yaw,
                    current.pose.gear,
                    state.open.len(),
                    state.closed.len()
                );
            }

            self.expand(current_id, &current, &goal, checker, &mut state);
        }
    }

    fn expand(
        &self,
        current_id: NodeId,
        current: &SearchNode,
        goal: &Pose,
        checker: &CollisionChecker,
        state: &mut SearchState,
    ) {
        for action in &self.actions {
            let swept = match self.model.sweep(
                &current.pose,
                action,
                self.config.vehicle.step_size,
                self.config.collision_substeps,
                &self.grid,
            ) {
                Some(poses) => poses,
                None => {
                    state.stats.rejected_out_of_bounds += 1;
                    continue;
                }
            };
            if checker.is_trajectory_colliding(&swept) {
                state.stats.rejected_collision += 1;
                continue;
            }
            let next = match swept.last() {
                Some(pose) => *pose,
                None => continue,
            };

            let key = self.discretizer.discretize(&next);
            if state.closed.contains(&key) {
                continue;
            }

            let tentative = current.cost()
                + self
                    .cost_model
                    .transition_cost(current, &next, action, checker);
            let improved = state
                .best_cost
                .get(&key)
                .map_or(true, |&best| tentative < best);
            if !improved {
                continue;
            }

            state.best_cost.insert(key, tentative);
            let h = self.cost_model.heuristic(&next, goal);
            state.push(SearchNode::new(
                next,
                tentative,
                h,
                Some(current_id),
                Some(action.label()),
            ));
            state.stats.nodes_generated += 1;
        }
    }

    fn build_path(&self, goal_id: NodeId, nodes: &[SearchNode]) -> Path {
        let mut points = Vec::new();
        let mut current = Some(goal_id);

        while let Some(id) = current {
            let node = &nodes[id.0];
            points.push(PathPoint {
                pose: node.pose,
                cost: node.cost(),
            });
            current = node.parent;
        }

        points.reverse();
        Path::from_points(points)
    }
}

impl PosePlanner for HybridAStarPlanner {
    fn plan(&self, start: Pose, goal: Pose) -> Result<Path, RoboticsError> {
        let report = self.search(start, goal)?;
        match report.outcome {
            SearchOutcome::Succeeded(path) => Ok(path),
            SearchOutcome::Failed(failure) => Err(RoboticsError::PlanningError(failure)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::hybrid_a_star::motion_model::VehicleParams;
    use crate::path_planning::hybrid_a_star::search::CancellationToken;
    use std::time::Duration;

    fn small_vehicle_config() -> HybridAStarConfig {
        HybridAStarConfig {
            vehicle: VehicleParams {
                wheelbase: 1.0,
                max_steer: 0.6,
                step_size: 0.5,
                width: 0.6,
                length: 1.0,
            },
            max_iterations: 1_000_000,
            ..Default::default()
        }
    }

    fn open_field() -> OccupancyGrid {
        OccupancyGrid::new(30, 15).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = HybridAStarConfig::default();
        config.vehicle.step_size = 0.0;
        assert!(matches!(
            HybridAStarPlanner::new(open_field(), config),
            Err(RoboticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_start_in_obstacle_rejected() {
        let mut grid = open_field();
        grid.fill_rect(2, 6, 7, 7);
        let planner = HybridAStarPlanner::with_defaults(grid).unwrap();
        let result = planner.search(Pose::new(5.0, 7.0, 0.0), Pose::new(20.0, 7.0, 0.0));
        assert!(matches!(result, Err(RoboticsError::StartInCollision { .. })));
    }

    #[test]
    fn test_goal_in_obstacle_rejected() {
        let mut grid = open_field();
        grid.fill_rect(17, 6, 22, 7);
        let planner = HybridAStarPlanner::with_defaults(grid).unwrap();
        let result = planner.search(Pose::new(5.0, 7.0, 0.0), Pose::new(20.0, 7.0, 0.0));
        assert!(matches!(result, Err(RoboticsError::GoalInCollision { .. })));
    }

    #[test]
    fn test_out_of_map_endpoints_rejected() {
        let planner = HybridAStarPlanner::with_defaults(open_field()).unwrap();
        let result = planner.search(Pose::new(-5.0, 7.0, 0.0), Pose::new(20.0, 7.0, 0.0));
        assert!(matches!(result, Err(RoboticsError::StartInCollision { .. })));
        let result = planner.search(Pose::new(5.0, 7.0, 0.0), Pose::new(40.0, 7.0, 0.0));
        assert!(matches!(result, Err(RoboticsError::GoalInCollision { .. })));
        let result = planner.search(Pose::new(f64::NAN, 7.0, 0.0), Pose::new(20.0, 7.0, 0.0));
        assert!(matches!(result, Err(RoboticsError::InvalidParameter(_))));
    }

    #[test]
    fn test_straight_run_reaches_goal() {
        let planner = HybridAStarPlanner::with_defaults(open_field()).unwrap();
        let goal = Pose::new(15.0, 7.0, 0.0);
        let report = planner.search(Pose::new(5.0, 7.0, 0.0), goal).unwrap();
        assert!(report.is_success());
        let path = report.path().unwrap();
        let last = path.last().unwrap().pose;
        assert!(planner.is_goal_reached(&last, &goal));
        assert_eq!(path.first().unwrap().pose, Pose::new(5.0, 7.0, 0.0));
        assert_eq!(path.first().unwrap().cost, 0.0);
        assert!(report.stats.iterations < 1000);
    }

    #[test]
    fn test_path_is_collision_free_and_cost_monotonic() {
        let mut grid = OccupancyGrid::new(30, 20).unwrap();
        grid.fill_rect(12, 0, 13, 6);
        let planner = HybridAStarPlanner::new(grid, small_vehicle_config()).unwrap();
        let report = planner
            .search(Pose::new(5.0, 3.0, 0.0), Pose::new(22.0, 3.0, 0.0))
            .unwrap();
        let path = report.path().expect("path around the wall");
        let checker = planner.collision_checker();
        for p in path.poses() {
            assert!(!checker.is_colliding(p));
        }
        for w in path.points.windows(2) {
            assert!(w[1].cost >= w[0].cost);
        }
    }

    #[test]
    fn test_search_tree_invariants() {
        let mut grid = OccupancyGrid::new(30, 20).unwrap();
        grid.fill_rect(12, 0, 13, 6);
        let planner = HybridAStarPlanner::new(grid, small_vehicle_config()).unwrap();
        let checker = planner.collision_checker();
        let (result, state) = planner.run(
            Pose::new(5.0, 3.0, 0.0),
            Pose::new(22.0, 3.0, 0.0),
            &SearchLimits::default(),
            &checker,
        );
        assert!(result.is_ok());
        assert_eq!(state.nodes.len(), state.stats.nodes_generated + 1);
        for node in &state.nodes {
            assert!((node.priority() - (node.cost() + node.heuristic())).abs() < 1e-9);
            if let Some(parent) = node.parent {
                assert!(node.cost() >= state.nodes[parent.0].cost());
                assert!(parent.0 < state.nodes.len());
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let mut grid = OccupancyGrid::new(30, 20).unwrap();
        grid.fill_rect(12, 0, 13, 6);
        let planner = HybridAStarPlanner::new(grid, small_vehicle_config()).unwrap();
        let start = Pose::new(5.0, 3.0, 0.0);
        let goal = Pose::new(22.0, 3.0, 0.0);
        let a = planner.search(start, goal).unwrap();
        let b = planner.search(start, goal).unwrap();
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.path().unwrap().points, b.path().unwrap().points);
    }

    #[test]
    fn test_cancelled_before_start() {
        let planner = HybridAStarPlanner::with_defaults(open_field()).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let limits = SearchLimits::default().with_cancellation(token);
        let report = planner
            .search_with_limits(Pose::new(5.0, 7.0, 0.0), Pose::new(20.0, 7.0, 0.0), &limits)
            .unwrap();
        assert_eq!(report.failure(), Some(SearchFailure::Cancelled { iterations: 0 }));
    }

    #[test]
    fn test_zero_time_budget() {
        let planner = HybridAStarPlanner::with_defaults(open_field()).unwrap();
        let limits = SearchLimits::default().with_time_budget(Duration::from_secs(0));
        let report = planner
            .search_with_limits(Pose::new(5.0, 7.0, 0.0), Pose::new(20.0, 7.0, 0.0), &limits)
            .unwrap();
        assert!(matches!(
            report.failure(),
            Some(SearchFailure::DeadlineExceeded { .. })
        ));
    }

    #[test]
    fn test_iteration_override() {
        let planner = HybridAStarPlanner::with_defaults(open_field()).unwrap();
        let limits = SearchLimits::default().with_max_iterations(2);
        let report = planner
            .search_with_limits(Pose::new(5.0, 7.0, 0.0), Pose::new(20.0, 7.0, 0.0), &limits)
            .unwrap();
        assert_eq!(
            report.failure(),
            Some(SearchFailure::MaxIterations { iterations: 2 })
        );
        assert_eq!(report.stats.iterations, 2);
    }

    #[test]
    fn test_search_many_isolated() {
        let planner = HybridAStarPlanner::with_defaults(open_field()).unwrap();
        let start = Pose::new(5.0, 7.0, 0.0);
        let goals = [Pose::new(15.0, 7.0, 0.0), Pose::new(40.0, 7.0, 0.0), Pose::new(12.0, 7.0, 0.0)];
        let results = planner.search_many(start, &goals, &SearchLimits::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap().is_success());
        assert!(matches!(results[1], Err(RoboticsError::GoalInCollision { .. })));
        assert!(results[2].as_ref().unwrap().is_success());

        let single = planner.search(start, goals[0]).unwrap();
        assert_eq!(
            results[0].as_ref().unwrap().path().unwrap().points,
            single.path().unwrap().points
        );
    }

    #[test]
    fn test_pose_planner_trait_maps_failure() {
        let mut grid = OccupancyGrid::new(20, 10).unwrap();
        grid.fill_rect(10, 0, 10, 9);
        let planner = HybridAStarPlanner::new(grid, small_vehicle_config()).unwrap();
        let result = planner.plan(Pose::new(3.0, 5.0, 0.0), Pose::new(16.0, 5.0, 0.0));
        assert!(matches!(
            result,
            Err(RoboticsError::PlanningError(SearchFailure::NoPath { .. }))
        ));
    }

    #[test]
    fn test_legacy_interface() {
        let planner = HybridAStarPlanner::with_defaults(open_field()).unwrap();
        let (rx, ry, ryaw) = planner.planning((5.0, 7.0, 0.0), (15.0, 7.0, 0.0)).unwrap();
        assert!(!rx.is_empty());
        assert_eq!(rx.len(), ry.len());
        assert_eq!(rx.len(), ryaw.len());
    }

    #[test]
    fn test_substeps_reject_swept_collisions() {
        // one-lane corridor with a single-cell pillar that a 2.5 m step jumps over
        let mut grid = OccupancyGrid::new(30, 3).unwrap();
        grid.fill_rect(0, 0, 29, 0);
        grid.fill_rect(0, 2, 29, 2);
        grid.set_occupied(9, 1, true);
        let start = Pose::new(5.9, 1.5, 0.0);
        let goal = Pose::new(20.9, 1.5, 0.0);

        let mut config = small_vehicle_config();
        config.vehicle.step_size = 2.5;
        config.collision_substeps = 1;
        let coarse = HybridAStarPlanner::new(grid.clone(), config.clone()).unwrap();
        let report = coarse.search(start, goal).unwrap();
        let path = report.path().expect("straight run past the pillar");
        assert!(path.poses().all(|p| (p.y - 1.5).abs() < 1e-9));

        config.collision_substeps = 5;
        let fine = HybridAStarPlanner::new(grid, config).unwrap();
        let report = fine.search(start, goal).unwrap();
        assert!(report.stats.rejected_collision > 0);
        assert!(matches!(report.failure(), Some(SearchFailure::NoPath { .. })));
    }

    #[test]
    fn test_huge_start_heading_terminates() {
        let planner = HybridAStarPlanner::with_defaults(open_field()).unwrap();
        let start = Pose {
            x: 5.0,
            y: 7.0,
            yaw: 1e20,
            gear: Gear::Forward,
        };
        let limits = SearchLimits::default().with_max_iterations(100);
        let report = planner
            .search_with_limits(start, Pose::new(20.0, 7.0, 0.0), &limits)
            .unwrap();
        assert!(report.stats.iterations <= 100);
    }
}
