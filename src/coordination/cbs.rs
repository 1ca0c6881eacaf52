//! Conflict-Based Search coordinator
//!
//! Two-level search: a constraint tree over joint plans on top, the
//! kinodynamic hybrid A* below. Each tree node holds a complete joint plan
//! and the constraints that produced it; the earliest conflict in a popped
//! node is branched into two children, one per conflicting agent, each
//! replanned under one additional constraint. Nodes are expanded in
//! ascending cost order, so the first conflict-free node popped is a
//! minimum-total-cost solution under the sum-of-path-lengths metric.
//!
//! Reference: Sharon, G., Stern, R., Felner, A., & Sturtevant, N. (2015).
//! "Conflict-based search for optimal multi-agent pathfinding"

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use crate::common::{AgentId, PlanningError, PlanningResult, Point2D, PosePath, PoseSource};
use crate::coordination::conflict::{first_conflict, Conflict};
use crate::coordination::constraint::{Constraint, ConstraintSet};
use crate::coordination::solution::{total_cost, Solution};
use crate::path_planning::HybridAStarPlanner;

/// Configuration for the CBS coordinator
#[derive(Debug, Clone)]
pub struct CbsConfig {
    /// Minimum allowed distance between any two agents [m]
    pub safe_distance: f64,
    /// Constraint-tree expansion cap; exhausting it reports `NoSolution`
    pub max_nodes: usize,
}

impl Default for CbsConfig {
    fn default() -> Self {
        Self { safe_distance: 0.6, max_nodes: 10_000 }
    }
}

/// One constraint-tree node: a complete joint plan plus the constraints
/// that produced it
#[derive(Debug, Clone)]
struct CtNode {
    paths: HashMap<AgentId, PosePath>,
    constraints: ConstraintSet,
    cost: usize,
    seq: u64,
}

impl Eq for CtNode {}

impl PartialEq for CtNode {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Ord for CtNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; insertion sequence breaks
        // cost ties deterministically
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for CtNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// CBS coordinator over a shared low-level planner
pub struct CbsPlanner<'a> {
    planner: &'a HybridAStarPlanner,
    config: CbsConfig,
}

impl<'a> CbsPlanner<'a> {
    pub fn new(planner: &'a HybridAStarPlanner, config: CbsConfig) -> Self {
        Self { planner, config }
    }

    pub fn config(&self) -> &CbsConfig {
        &self.config
    }

    /// Find a conflict-free joint plan bringing every agent to the shared
    /// goal point
    ///
    /// The order of `agents` fixes every tie-break in the search, so a
    /// stable ordering gives byte-identical results across runs.
    pub fn find_solution<S: PoseSource>(
        &self,
        agents: &[AgentId],
        poses: &S,
        goal: Point2D,
    ) -> PlanningResult<Solution> {
        let paths = self.plan_root_paths(agents, poses, goal)?;
        debug!(agents = agents.len(), cost = total_cost(&paths), "root node built");

        let mut seq: u64 = 0;
        let mut open = BinaryHeap::new();
        open.push(CtNode {
            cost: total_cost(&paths),
            paths,
            constraints: ConstraintSet::new(self.config.safe_distance),
            seq,
        });

        let mut expanded = 0usize;
        while let Some(node) = open.pop() {
            expanded += 1;
            if expanded > self.config.max_nodes {
                debug!(expanded, "constraint-tree node cap reached");
                return Err(PlanningError::NoSolution);
            }

            match first_conflict(agents, &node.paths, self.config.safe_distance) {
                None => {
                    debug!(expanded, cost = node.cost, "conflict-free node popped");
                    return Ok(Solution::new(node.paths));
                }
                Some(conflict) => {
                    trace!(
                        first = conflict.first,
                        second = conflict.second,
                        timestep = conflict.timestep,
                        "branching on conflict"
                    );
                    for child in self.branch(&node, &conflict, poses, goal, &mut seq)? {
                        open.push(child);
                    }
                }
            }
        }

        debug!(expanded, "constraint tree exhausted");
        Err(PlanningError::NoSolution)
    }

    /// Unconstrained per-agent plans; any failure here fails the whole run,
    /// since no tree node could ever fix an agent with no path at all
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

    /// Branch a conflict into two children, one per conflicting agent
    ///
    /// Each child inherits the parent constraints plus one new constraint
    /// and replans only the constrained agent. A child whose agent has no
    /// path under the grown set is dropped; that branch dies silently.
    fn branch<S: PoseSource>(
        &self,
        node: &CtNode,
        conflict: &Conflict,
        poses: &S,
        goal: Point2D,
        seq: &mut u64,
    ) -> PlanningResult<Vec<CtNode>> {
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
                    children.push(CtNode {
                        cost: total_cost(&paths),
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
