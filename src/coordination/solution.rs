//! Joint solution returned by the coordinators

use std::collections::HashMap;

use crate::common::{AgentId, PosePath};

/// Conflict-free mapping from every requested agent to its path
///
/// Distinguishable from "no solution" by construction: coordinators return
/// this only for a node that passed the full conflict scan. An agent that
/// started at the goal maps to a one-element path, not an empty one.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    paths: HashMap<AgentId, PosePath>,
}

impl Solution {
    pub(crate) fn new(paths: HashMap<AgentId, PosePath>) -> Self {
        Self { paths }
    }

    pub fn path(&self, agent: AgentId) -> Option<&PosePath> {
        self.paths.get(&agent)
    }

    pub fn paths(&self) -> &HashMap<AgentId, PosePath> {
        &self.paths
    }

    pub fn into_paths(self) -> HashMap<AgentId, PosePath> {
        self.paths
    }

    /// Sum of path lengths, the cost metric both coordinators minimize
    pub fn total_cost(&self) -> usize {
        total_cost(&self.paths)
    }
}

/// Cost of a joint plan: sum of its path lengths
pub(crate) fn total_cost(paths: &HashMap<AgentId, PosePath>) -> usize {
    paths.values().map(|p| p.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Pose2D;

    #[test]
    fn test_total_cost_sums_path_lengths() {
        let mut paths = HashMap::new();
        paths.insert(1, PosePath::from_poses(vec![Pose2D::origin(); 3]));
        paths.insert(2, PosePath::from_poses(vec![Pose2D::origin(); 5]));
        let solution = Solution::new(paths);
        assert_eq!(solution.total_cost(), 8);
        assert_eq!(solution.path(1).unwrap().len(), 3);
        assert!(solution.path(3).is_none());
    }
}
