//! Enhanced (bounded-suboptimal) Conflict-Based Search coordinator
//!
//! Same constraint tree as CBS, but nodes are picked through a focal list:
//! among the live nodes whose cost is within epsilon of the best known
//! cost, expand the one with the fewest conflicts first. Convergence toward
//! zero conflicts is usually much faster than strict best-first on cost,
//! and the returned cost is guaranteed within the epsilon factor of
//! optimal. A node is only ever returned once the full conflict scan
//! confirms it is conflict-free.
//!
//! Reference: Barer, M., Sharon, G., Stern, R., & Felner, A. (2014).
//! "Suboptimal variants of the conflict-based search algorithm for the
//! multi-agent pathfinding problem"

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::common::{AgentId, PlanningError, PlanningResult, Point2D, PosePath, PoseSource};
use crate::coordination::conflict::{count_conflicts, first_conflict, Conflict};
use crate::coordination::constraint::{Constraint, ConstraintSet};
use crate::coordination::solution::{total_cost, Solution};
use crate::path_planning::HybridAStarPlanner;

/// Configuration for the ECBS coordinator
#[derive(Debug, Clone)]
pub struct EcbsConfig {
    /// Minimum allowed distance between any two agents [m]
    pub safe_distance: f64,
    /// Suboptimality bound; the returned cost is at most epsilon times the
    /// optimal cost. Must be >= 1.
    pub epsilon: f64,
    /// Constraint-tree expansion cap; exhausting it reports `NoSolution`
    pub max_nodes: usize,
}

impl Default for EcbsConfig {
    fn default() -> Self {
        Self { safe_distance: 0.6, epsilon: 1.5, max_nodes: 10_000 }
    }
}

/// Constraint-tree node carrying its conflict count for focal ordering
#[derive(Debug, Clone)]
struct EcbsNode {
    paths: HashMap<AgentId, PosePath>,
    constraints: ConstraintSet,
    cost: usize,
    conflicts: usize,
    seq: u64,
}

/// ECBS coordinator over a shared low-level planner
pub struct EcbsPlanner<'a> {
    planner: &'a HybridAStarPlanner,
    config: EcbsConfig,
}

impl<'a> EcbsPlanner<'a> {
    pub fn new(planner: &'a HybridAStarPlanner, config: EcbsConfig) -> PlanningResult<Self> {
        if config.epsilon < 1.0 {
            return Err(PlanningError::InvalidParameter(format!(
                "epsilon must be >= 1, got {}",
                config.epsilon
            )));
        }
        Ok(Self { planner, config })
    }

    pub fn config(&self) -> &EcbsConfig {
        &self.config
    }

    /// Find a conflict-free joint plan with cost within epsilon of optimal
    ///
    /// The focal subset and the best known cost are recomputed from the
    /// live node set on every iteration, since an expansion can lower the
    /// best cost and shrink the focal bound.
    pub fn find_solution<S: PoseSource>(
        &self,
        agents: &[AgentId],
        poses: &S,
        goal: Point2D,
    ) -> PlanningResult<Solution> {
        let paths = self.plan_root_paths(agents, poses, goal)?;
        let root = EcbsNode {
            cost: total_cost(&paths),
            conflicts: count_conflicts(agents, &paths, self.config.safe_distance),
            paths,
            constraints: ConstraintSet::new(self.config.safe_distance),
            seq: 0,
        };
        debug!(
            agents = agents.len(),
            cost = root.cost,
            conflicts = root.conflicts,
            "root node built"
        );

        let mut live = vec![root];
        let mut seq: u64 = 0;
        let mut expanded = 0usize;

        loop {
            let best_cost = match live.iter().map(|n| n.cost).min() {
                Some(cost) => cost,
                None => break,
            };
            let bound = self.config.epsilon * best_cost as f64;
            let index = match live
                .iter()
                .enumerate()
                .filter(|(_, n)| (n.cost as f64) <= bound)
                .min_by_key(|(_, n)| (n.conflicts, n.cost, n.seq))
                .map(|(i, _)| i)
            {
                Some(index) => index,
                None => break,
            };
            let node = live.swap_remove(index);

            expanded += 1;
            if expanded > self.config.max_nodes {
                debug!(expanded, "constraint-tree node cap reached");
                return Err(PlanningError::NoSolution);
            }

            match first_conflict(agents, &node.paths, self.config.safe_distance) {
                None => {
                    debug!(expanded, cost = node.cost, "conflict-free node confirmed");
                    return Ok(Solution::new(node.paths));
                }
                Some(conflict) => {
                    trace!(
                        first = conflict.first,
                        second = conflict.second,
                        timestep = conflict.timestep,
                        node_conflicts = node.conflicts,
                        "branching on conflict"
                    );
                    let children =
                        self.branch(agents, &node, &conflict, poses, goal, &mut seq)?;
                    live.extend(children);
                }
            }
        }

        debug!(expanded, "constraint tree exhausted");
        Err(PlanningError::NoSolution)
    }

    fn plan_root_paths<S: PoseSource>(
        &self,
        agents: &[AgentId],
        poses: &S,
        goal: Point2D,
    ) -> PlanningResult<HashMap<AgentId, PosePath>> {
        let mut paths = HashMap::new();
        for &agent in agents {
            let start = poses
                .pose(agent)
                .ok_or(PlanningError::UnknownAgent(agent))?;
            let path = self.planner.plan_constrained(
                start,
                goal,
                agent,
                &ConstraintSet::new(self.config.safe_distance),
            )?;
            paths.insert(agent, path);
        }
        Ok(paths)
    }

    /// Branching is identical to CBS; children additionally carry their
    /// conflict count for focal ordering
    fn branch<S: PoseSource>(
        &self,
        agents: &[AgentId],
        node: &EcbsNode,
        conflict: &Conflict,
        poses: &S,
        goal: Point2D,
        seq: &mut u64,
    ) -> PlanningResult<Vec<EcbsNode>> {
        let mut children = Vec::with_capacity(2);
        for &agent in &[conflict.first, conflict.second] {
            let constraints = node
                .constraints
                .with(Constraint::new(agent, conflict.position, conflict.timestep));
            let start = poses
                .pose(agent)
                .ok_or(PlanningError::UnknownAgent(agent))?;
            match self.planner.plan_constrained(start, goal, agent, &constraints) {
                Ok(path) => {
                    let mut paths = node.paths.clone();
                    paths.insert(agent, path);
                    *seq += 1;
                    children.push(EcbsNode {
                        cost: total_cost(&paths),
                        conflicts: count_conflicts(agents, &paths, self.config.safe_distance),
                        paths,
                        constraints,
                        seq: *seq,
                    });
                }
                Err(PlanningError::NoPathFound) => {
                    debug!(agent, "no path under grown constraint set, branch pruned");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(children)
    }
}
