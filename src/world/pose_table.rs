//! Explicit agent pose table
//!
//! Hosts keep agent poses here and pass the table by reference into the
//! coordinators; there is no global registry.

use std::collections::HashMap;

use crate::common::{AgentId, Pose2D, PoseSource};

/// Mapping from agent identifier to its current pose
#[derive(Debug, Clone, Default)]
pub struct PoseTable {
    poses: HashMap<AgentId, Pose2D>,
}

impl PoseTable {
    pub fn new() -> Self {
        Self { poses: HashMap::new() }
    }

    pub fn set(&mut self, agent: AgentId, pose: Pose2D) {
        self.poses.insert(agent, pose);
    }

    pub fn remove(&mut self, agent: AgentId) -> Option<Pose2D> {
        self.poses.remove(&agent)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

impl PoseSource for PoseTable {
    fn pose(&self, agent: AgentId) -> Option<Pose2D> {
        self.poses.get(&agent).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_lookup() {
        let mut table = PoseTable::new();
        table.set(1, Pose2D::new(1.0, 2.0, 0.0));
        table.set(2, Pose2D::new(-1.0, 0.0, 1.5));

        assert_eq!(table.pose(1).unwrap().y, 2.0);
        assert_eq!(table.pose(2).unwrap().yaw, 1.5);
        assert!(table.pose(3).is_none());
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let mut table = PoseTable::new();
        table.set(7, Pose2D::origin());
        table.set(7, Pose2D::new(3.0, 3.0, 0.1));
        assert_eq!(table.pose(7).unwrap().x, 3.0);
        assert_eq!(table.len(), 1);
    }
}
