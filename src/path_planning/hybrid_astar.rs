//! Hybrid A* kinodynamic path planner
//!
//! Forward search over a discretized (x, y, yaw) pose lattice with exactly
//! three actions per expansion: steer left by max_steer, go straight, steer
//! right by max_steer. Each action updates the heading first and then
//! advances step_size along the new heading, so every returned path is
//! drivable by an agent with that turning limit.
//!
//! The planner also accepts a set of space-time constraints and refuses to
//! expand into a forbidden (position, timestep) neighborhood, which is what
//! lets the conflict-based coordinators replan an agent around another
//! agent's reserved cells instead of failing outright.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::common::{
    AgentId, Obstacles, PlanningError, PlanningResult, Point2D, Pose2D, PosePath, PosePlanner,
};
use crate::coordination::ConstraintSet;
use crate::world::Arena;

/// Inflation added to the robot radius when testing obstacle points [m]
pub const OBSTACLE_MARGIN: f64 = 0.1;

/// Configuration for the hybrid A* planner
#[derive(Debug, Clone)]
pub struct HybridAStarConfig {
    /// Lattice resolution in x and y; also the goal tolerance [m]
    pub xy_resolution: f64,
    /// Lattice resolution in heading [rad]
    pub theta_resolution: f64,
    /// Maximum steering change per step [rad]
    pub max_steer: f64,
    /// Distance travelled per step [m]
    pub step_size: f64,
    /// Robot radius for obstacle inflation [m]
    pub robot_radius: f64,
    /// Expansion cap; exhausting it reports the normal no-path failure
    pub max_expansions: usize,
}

impl Default for HybridAStarConfig {
    fn default() -> Self {
        Self {
            xy_resolution: 0.1,
            theta_resolution: 15.0_f64.to_radians(),
            max_steer: 30.0_f64.to_radians(),
            step_size: 0.5,
            robot_radius: 0.3,
            max_expansions: 100_000,
        }
    }
}

/// Search node stored in the arena-style node vector
#[derive(Debug, Clone)]
struct SearchNode {
    pose: Pose2D,
    timestep: usize,
    cost: f64,
    parent: Option<usize>,
}

/// Open-set entry; min-heap on (priority, insertion sequence)
#[derive(Debug)]
struct OpenEntry {
    priority: OrderedFloat<f64>,
    seq: u64,
    index: usize,
}

impl Eq for OpenEntry {}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; the sequence number makes
        // equal-priority pops deterministic
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Hybrid A* planner over a bounded arena with static point obstacles
pub struct HybridAStarPlanner {
    arena: Arena,
    obstacles: Obstacles,
    config: HybridAStarConfig,
    steer_set: [f64; 3],
}

impl HybridAStarPlanner {
    pub fn new(arena: Arena, obstacles: Obstacles, config: HybridAStarConfig) -> Self {
        let steer_set = [-config.max_steer, 0.0, config.max_steer];
        HybridAStarPlanner { arena, obstacles, config, steer_set }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn obstacles(&self) -> &Obstacles {
        &self.obstacles
    }

    pub fn config(&self) -> &HybridAStarConfig {
        &self.config
    }

    /// Plan for one agent under a set of space-time constraints
    ///
    /// Constrained cells are rejected during the search itself, so the
    /// search routes around forbidden regions rather than failing whenever
    /// the unconstrained optimum happens to cross one.
    pub fn plan_constrained(
        &self,
        start: Pose2D,
        goal: Point2D,
        agent: AgentId,
        constraints: &ConstraintSet,
    ) -> PlanningResult<PosePath> {
        if !self.arena.contains(&start.position()) {
            return Err(PlanningError::OutOfBounds(format!(
                "start ({:.2}, {:.2})",
                start.x, start.y
            )));
        }
        if !self.arena.contains(&goal) {
            return Err(PlanningError::OutOfBounds(format!(
                "goal ({:.2}, {:.2})",
                goal.x, goal.y
            )));
        }
        if constraints.is_blocked(agent, &start.position(), 0) {
            debug!(agent, "start pose itself is constrained, no path");
            return Err(PlanningError::NoPathFound);
        }

        let mut open_set = BinaryHeap::new();
        let mut closed_set: HashSet<(i64, i64, i64, i64)> = HashSet::new();
        let mut nodes: Vec<SearchNode> = Vec::new();
        let mut seq: u64 = 0;

        let mut start_node = start;
        start_node.normalize_yaw();
        nodes.push(SearchNode { pose: start_node, timestep: 0, cost: 0.0, parent: None });
        open_set.push(OpenEntry {
            priority: OrderedFloat(self.heuristic(&start_node.position(), &goal)),
            seq,
            index: 0,
        });

        let constrained = !constraints.is_empty();
        let mut expansions = 0usize;

        while let Some(entry) = open_set.pop() {
            let (pose, timestep, cost) = {
                let node = &nodes[entry.index];
                (node.pose, node.timestep, node.cost)
            };

            let key = self.closed_key(&pose, timestep, constrained);
            if closed_set.contains(&key) {
                continue;
            }
            closed_set.insert(key);

            // a node may only terminate the search if the agent can also
            // stay parked there without violating a later constraint
            if pose.position().distance(&goal) < self.config.xy_resolution
                && !constraints.blocks_parking(agent, &pose.position(), timestep)
            {
                trace!(expansions, timestep, "goal reached");
                return Ok(self.build_path(entry.index, &nodes));
            }

            expansions += 1;
            if expansions >= self.config.max_expansions {
                debug!(expansions, "expansion cap reached before goal");
                return Err(PlanningError::NoPathFound);
            }

            for &steer in &self.steer_set {
                let mut next = Pose2D::new(0.0, 0.0, pose.yaw + steer);
                next.normalize_yaw();
                next.x = pose.x + self.config.step_size * next.yaw.cos();
                next.y = pose.y + self.config.step_size * next.yaw.sin();

                let position = next.position();
                if !self.arena.contains(&position) {
                    continue;
                }
                if self.collides(&position) {
                    continue;
                }
                if constraints.is_blocked(agent, &position, timestep + 1) {
                    continue;
                }
                if closed_set.contains(&self.closed_key(&next, timestep + 1, constrained)) {
                    continue;
                }

                let next_cost = cost + self.config.step_size;
                nodes.push(SearchNode {
                    pose: next,
                    timestep: timestep + 1,
                    cost: next_cost,
                    parent: Some(entry.index),
                });
                seq += 1;
                open_set.push(OpenEntry {
                    priority: OrderedFloat(next_cost + self.heuristic(&position, &goal)),
                    seq,
                    index: nodes.len() - 1,
                });
            }
        }

        debug!(expansions, "open set exhausted without reaching the goal");
        Err(PlanningError::NoPathFound)
    }

    /// Admissible straight-line heuristic (assumes unlimited turning)
    fn heuristic(&self, position: &Point2D, goal: &Point2D) -> f64 {
        position.distance(goal)
    }

    fn collides(&self, position: &Point2D) -> bool {
        let inflation = self.config.robot_radius + OBSTACLE_MARGIN;
        self.obstacles
            .points
            .iter()
            .any(|o| o.distance(position) <= inflation)
    }

    /// Lattice key for visited-set membership
    ///
    /// Feasibility is time-dependent under constraints, so the key then also
    /// carries the timestep; the unconstrained search deduplicates by cell
    /// alone.
    fn closed_key(&self, pose: &Pose2D, timestep: usize, constrained: bool) -> (i64, i64, i64, i64) {
        let xi = (pose.x / self.config.xy_resolution).round() as i64;
        let yi = (pose.y / self.config.xy_resolution).round() as i64;
        let ti = (pose.yaw / self.config.theta_resolution).round() as i64;
        let time = if constrained { timestep as i64 } else { 0 };
        (xi, yi, ti, time)
    }

    fn build_path(&self, goal_index: usize, nodes: &[SearchNode]) -> PosePath {
        let mut poses = Vec::new();
        let mut current = Some(goal_index);
        while let Some(index) = current {
            poses.push(nodes[index].pose);
            current = nodes[index].parent;
        }
        poses.reverse();
        PosePath::from_poses(poses)
    }
}

impl PosePlanner for HybridAStarPlanner {
    fn plan(&self, start: Pose2D, goal: Point2D) -> PlanningResult<PosePath> {
        self.plan_constrained(start, goal, 0, &ConstraintSet::unconstrained())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::Constraint;

    fn planner_with(obstacles: Obstacles, config: HybridAStarConfig) -> HybridAStarPlanner {
        HybridAStarPlanner::new(Arena::centered(30.0, 30.0), obstacles, config)
    }

    fn open_field_planner() -> HybridAStarPlanner {
        planner_with(Obstacles::new(), HybridAStarConfig::default())
    }

    /// Smallest absolute difference between two angles
    fn angle_diff(a: f64, b: f64) -> f64 {
        let mut d = a - b;
        while d > std::f64::consts::PI {
            d -= 2.0 * std::f64::consts::PI;
        }
        while d < -std::f64::consts::PI {
            d += 2.0 * std::f64::consts::PI;
        }
        d
    }

    #[test]
    fn test_straight_line_path() {
        let planner = open_field_planner();
        let path = planner
            .plan(Pose2D::new(0.0, 0.0, 0.0), Point2D::new(2.0, 0.0))
            .unwrap();

        // 4 steps of 0.5 m, so 5 poses including the start
        assert_eq!(path.len(), 5);
        for pose in &path.poses {
            assert!(pose.yaw.abs() < 1e-10);
        }
        let end = path.last().unwrap().position();
        assert!(end.distance(&Point2D::new(2.0, 0.0)) < planner.config().xy_resolution);
    }

    #[test]
    fn test_start_within_tolerance_yields_single_pose() {
        let planner = open_field_planner();
        let start = Pose2D::new(0.05, 0.0, 1.0);
        let path = planner.plan(start, Point2D::new(0.0, 0.0)).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(*path.first().unwrap(), start);
    }

    #[test]
    fn test_kinematic_feasibility() {
        let mut ox = Vec::new();
        let mut oy = Vec::new();
        for i in -4..=4 {
            ox.push(5.0);
            oy.push(i as f64 * 0.5);
        }
        let config = HybridAStarConfig { xy_resolution: 0.5, ..Default::default() };
        let max_steer = config.max_steer;
        let step_size = config.step_size;
        let planner = planner_with(Obstacles::from_xy(&ox, &oy), config);

        let path = planner
            .plan(Pose2D::new(0.0, 0.0, 0.0), Point2D::new(10.0, 0.0))
            .unwrap();
        assert!(path.len() >= 2);

        for window in path.poses.windows(2) {
            let (prev, next) = (&window[0], &window[1]);
            // heading changes by exactly one element of the steer set
            let dyaw = angle_diff(next.yaw, prev.yaw);
            let matches_steer = [-max_steer, 0.0, max_steer]
                .iter()
                .any(|s| (dyaw - s).abs() < 1e-9);
            assert!(matches_steer, "heading change {} not in steer set", dyaw);
            // translation is step_size along the new heading
            assert!((next.x - prev.x - step_size * next.yaw.cos()).abs() < 1e-9);
            assert!((next.y - prev.y - step_size * next.yaw.sin()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_paths_clear_obstacles() {
        let mut ox = Vec::new();
        let mut oy = Vec::new();
        for i in -4..=4 {
            ox.push(5.0);
            oy.push(i as f64 * 0.5);
        }
        let config = HybridAStarConfig { xy_resolution: 0.5, ..Default::default() };
        let planner = planner_with(Obstacles::from_xy(&ox, &oy), config);

        let path = planner
            .plan(Pose2D::new(0.0, 0.0, 0.0), Point2D::new(10.0, 0.0))
            .unwrap();

        let inflation = planner.config().robot_radius + OBSTACLE_MARGIN;
        for pose in &path.poses {
            assert!(planner.obstacles().clearance(&pose.position()) > inflation);
        }
    }

    #[test]
    fn test_boxed_in_goal_reports_no_path() {
        // dense ring around the goal; gaps are narrower than the inflation
        let mut obstacles = Obstacles::new();
        let goal = Point2D::new(5.0, 0.0);
        let ring_radius = 1.5;
        let n = 40;
        for i in 0..n {
            let angle = i as f64 / n as f64 * 2.0 * std::f64::consts::PI;
            obstacles.push(Point2D::new(
                goal.x + ring_radius * angle.cos(),
                goal.y + ring_radius * angle.sin(),
            ));
        }
        let config = HybridAStarConfig { xy_resolution: 0.5, ..Default::default() };
        let planner = planner_with(obstacles, config);

        let result = planner.plan(Pose2D::new(-5.0, 0.0, 0.0), goal);
        assert_eq!(result.unwrap_err(), PlanningError::NoPathFound);
    }

    #[test]
    fn test_out_of_bounds_start_and_goal() {
        let planner = open_field_planner();
        let outside = Pose2D::new(100.0, 0.0, 0.0);
        match planner.plan(outside, Point2D::origin()) {
            Err(PlanningError::OutOfBounds(_)) => {}
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
        match planner.plan(Pose2D::origin(), Point2D::new(0.0, 99.0)) {
            Err(PlanningError::OutOfBounds(_)) => {}
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_constraint_steers_search_away() {
        let config = HybridAStarConfig { xy_resolution: 0.25, ..Default::default() };
        let planner = planner_with(Obstacles::new(), config);
        let start = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Point2D::new(3.0, 0.0);
        let blocked = Point2D::new(1.0, 0.0);

        // the unconstrained optimum drives straight through the blocked point
        let free = planner.plan(start, goal).unwrap();
        assert!(free.position_at(2).distance(&blocked) < 0.1);

        let mut constraints = ConstraintSet::new(0.6);
        constraints.push(Constraint::new(1, blocked, 2));
        let path = planner.plan_constrained(start, goal, 1, &constraints).unwrap();

        assert!(path.position_at(2).distance(&blocked) >= 0.6);
        let end = path.last().unwrap().position();
        assert!(end.distance(&goal) < planner.config().xy_resolution);
        // detours cost steps; the constrained path cannot be shorter
        assert!(path.len() >= free.len());
    }

    #[test]
    fn test_later_constraint_blocks_parking_at_goal() {
        let config = HybridAStarConfig { xy_resolution: 0.25, ..Default::default() };
        let planner = planner_with(Obstacles::new(), config);
        let start = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Point2D::new(2.0, 0.0);

        let free = planner.plan(start, goal).unwrap();
        assert_eq!(free.len(), 5);

        // the goal cell is forbidden at t=6, after the unconstrained
        // arrival; an agent parked there from t=4 would violate it
        let mut constraints = ConstraintSet::new(0.6);
        constraints.push(Constraint::new(1, goal, 6));
        let path = planner.plan_constrained(start, goal, 1, &constraints).unwrap();

        assert!(path.len() > free.len());
        assert!(path.position_at(6).distance(&goal) >= 0.6);
        let end = path.last().unwrap().position();
        assert!(end.distance(&goal) < planner.config().xy_resolution);
    }

    #[test]
    fn test_constraint_for_other_agent_is_ignored() {
        let config = HybridAStarConfig { xy_resolution: 0.25, ..Default::default() };
        let planner = planner_with(Obstacles::new(), config);
        let start = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Point2D::new(3.0, 0.0);

        let mut constraints = ConstraintSet::new(0.6);
        constraints.push(Constraint::new(7, Point2D::new(1.0, 0.0), 2));

        let free = planner.plan(start, goal).unwrap();
        let planned = planner.plan_constrained(start, goal, 1, &constraints).unwrap();
        assert_eq!(free, planned);
    }

    #[test]
    fn test_determinism() {
        let mut ox = Vec::new();
        let mut oy = Vec::new();
        for i in -3..=3 {
            ox.push(4.0);
            oy.push(i as f64 * 0.5);
        }
        let config = HybridAStarConfig { xy_resolution: 0.5, ..Default::default() };
        let planner = planner_with(Obstacles::from_xy(&ox, &oy), config);

        let a = planner
            .plan(Pose2D::new(0.0, 0.0, 0.0), Point2D::new(8.0, 1.0))
            .unwrap();
        let b = planner
            .plan(Pose2D::new(0.0, 0.0, 0.0), Point2D::new(8.0, 1.0))
            .unwrap();
        assert_eq!(a, b);
    }
}
