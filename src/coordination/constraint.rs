//! Space-time constraints threaded through the constraint tree
//!
//! A constraint forbids one agent from a neighborhood of a position at one
//! timestep. Constraints accumulate along a branch of the tree and are never
//! removed; each branch owns an independent copy of its set.

use crate::common::{AgentId, Point2D};

/// Forbids `agent` from coming within the set's clearance of `position` at
/// `timestep`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub agent: AgentId,
    pub position: Point2D,
    pub timestep: usize,
}

impl Constraint {
    pub fn new(agent: AgentId, position: Point2D, timestep: usize) -> Self {
        Self { agent, position, timestep }
    }
}

/// The accumulated constraints of one branch, plus the clearance radius
/// shared by the whole coordination run
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    clearance: f64,
}

impl ConstraintSet {
    pub fn new(clearance: f64) -> Self {
        Self { constraints: Vec::new(), clearance }
    }

    /// An empty set that blocks nothing; used by unconstrained planning
    pub fn unconstrained() -> Self {
        Self::default()
    }

    pub fn clearance(&self) -> f64 {
        self.clearance
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Copy of this set with one more constraint; branch children are built
    /// this way so siblings never share storage
    pub fn with(&self, constraint: Constraint) -> Self {
        let mut child = self.clone();
        child.push(constraint);
        child
    }

    /// Whether `agent` standing at `position` at `timestep` violates any
    /// constraint in the set
    pub fn is_blocked(&self, agent: AgentId, position: &Point2D, timestep: usize) -> bool {
        self.constraints.iter().any(|c| {
            c.agent == agent
                && c.timestep == timestep
                && c.position.distance(position) < self.clearance
        })
    }

    /// Whether `agent` may end its path at `position` at `timestep`
    ///
    /// A finished agent is parked at its final pose for every later
    /// timestep, so a constraint after the arrival time still forbids the
    /// spot.
    pub fn blocks_parking(&self, agent: AgentId, position: &Point2D, timestep: usize) -> bool {
        self.constraints.iter().any(|c| {
            c.agent == agent
                && c.timestep > timestep
                && c.position.distance(position) < self.clearance
        })
    }
}
