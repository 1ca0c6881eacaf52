//! Common traits defining interfaces between the planning core and its hosts

use crate::common::error::PlanningResult;
use crate::common::types::*;

/// Trait for kinodynamic single-agent planners
///
/// Plans from a full start pose to a 2D goal point; the heading at the goal
/// is unconstrained.
pub trait PosePlanner {
    fn plan(&self, start: Pose2D, goal: Point2D) -> PlanningResult<PosePath>;
}

/// Source of current agent poses, queried once per agent per coordination
/// run and per replan
///
/// Hosts pass an implementation (typically `world::PoseTable`) by reference
/// into the coordinator entry points.
pub trait PoseSource {
    fn pose(&self, agent: AgentId) -> Option<Pose2D>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that traits compile correctly
    struct DummyPlanner;

    impl PosePlanner for DummyPlanner {
        fn plan(&self, start: Pose2D, _goal: Point2D) -> PlanningResult<PosePath> {
            Ok(PosePath::from_poses(vec![start]))
        }
    }

    struct FixedPose(Pose2D);

    impl PoseSource for FixedPose {
        fn pose(&self, _agent: AgentId) -> Option<Pose2D> {
            Some(self.0)
        }
    }

    #[test]
    fn test_pose_planner_trait() {
        let planner = DummyPlanner;
        let result = planner.plan(Pose2D::origin(), Point2D::new(1.0, 1.0));
        assert_eq!(result.unwrap().len(), 1);
    }

    #[test]
    fn test_pose_source_trait() {
        let source = FixedPose(Pose2D::new(1.0, 2.0, 0.5));
        assert_eq!(source.pose(0).unwrap().x, 1.0);
    }
}
