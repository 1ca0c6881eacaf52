//! Conflict detection shared by the CBS and ECBS coordinators
//!
//! A conflict is a pair of agents closer than the safe distance at a shared
//! timestep. Agents that have finished their paths count as parked at their
//! final pose, so a short path can still conflict with a long one late in
//! the horizon.

use std::collections::HashMap;

use itertools::Itertools;

use crate::common::{AgentId, Point2D, PosePath};

/// Two agents within the safe distance of each other at one timestep
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub first: AgentId,
    pub second: AgentId,
    pub timestep: usize,
    /// Midpoint between the two conflicting positions
    pub position: Point2D,
}

/// The earliest conflict in a joint plan, or `None` if it is conflict-free
///
/// Timesteps are scanned from zero upward and, within a timestep, agent
/// pairs in the order of the `agents` slice. This fixed scan order is what
/// makes branching deterministic for a stable input ordering.
pub fn first_conflict(
    agents: &[AgentId],
    paths: &HashMap<AgentId, PosePath>,
    safe_distance: f64,
) -> Option<Conflict> {
    let horizon = agents.iter().map(|a| paths[a].len()).max().unwrap_or(0);
    for timestep in 0..horizon {
        for (&first, &second) in agents.iter().tuple_combinations() {
            let pa = paths[&first].position_at(timestep);
            let pb = paths[&second].position_at(timestep);
            if pa.distance(&pb) < safe_distance {
                return Some(Conflict {
                    first,
                    second,
                    timestep,
                    position: pa.midpoint(&pb),
                });
            }
        }
    }
    None
}

/// Total number of (pair, timestep) violations; ECBS ranks its focal list
/// by this count
pub fn count_conflicts(
    agents: &[AgentId],
    paths: &HashMap<AgentId, PosePath>,
    safe_distance: f64,
) -> usize {
    let horizon = agents.iter().map(|a| paths[a].len()).max().unwrap_or(0);
    let mut count = 0;
    for timestep in 0..horizon {
        for (&first, &second) in agents.iter().tuple_combinations() {
            let pa = paths[&first].position_at(timestep);
            let pb = paths[&second].position_at(timestep);
            if pa.distance(&pb) < safe_distance {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Pose2D;

    fn straight_path(x0: f64, y: f64, dx: f64, steps: usize) -> PosePath {
        let poses = (0..=steps)
            .map(|i| Pose2D::new(x0 + dx * i as f64, y, 0.0))
            .collect();
        PosePath::from_poses(poses)
    }

    #[test]
    fn test_no_conflict_when_far_apart() {
        let mut paths = HashMap::new();
        paths.insert(1, straight_path(0.0, 0.0, 0.5, 4));
        paths.insert(2, straight_path(0.0, 5.0, 0.5, 4));
        assert!(first_conflict(&[1, 2], &paths, 0.6).is_none());
        assert_eq!(count_conflicts(&[1, 2], &paths, 0.6), 0);
    }

    #[test]
    fn test_earliest_conflict_wins() {
        let mut paths = HashMap::new();
        // meet head-on: distance at t=2 is 0.0
        paths.insert(1, straight_path(0.0, 0.0, 0.5, 2));
        paths.insert(2, straight_path(2.0, 0.0, -0.5, 2));

        let conflict = first_conflict(&[1, 2], &paths, 0.6).unwrap();
        // t=1 they are 1.0 apart, so the first violation is t=2
        assert_eq!(conflict.timestep, 2);
        assert_eq!(conflict.first, 1);
        assert_eq!(conflict.second, 2);
        assert_eq!(conflict.position, Point2D::new(1.0, 0.0));
    }

    #[test]
    fn test_pair_order_follows_agent_slice() {
        let mut paths = HashMap::new();
        // all three sit on top of each other the whole time
        paths.insert(5, straight_path(0.0, 0.0, 0.0, 1));
        paths.insert(9, straight_path(0.0, 0.0, 0.0, 1));
        paths.insert(7, straight_path(0.0, 0.0, 0.0, 1));

        let conflict = first_conflict(&[9, 5, 7], &paths, 0.6).unwrap();
        assert_eq!((conflict.first, conflict.second), (9, 5));
        assert_eq!(conflict.timestep, 0);
    }

    #[test]
    fn test_parked_agent_still_conflicts() {
        let mut paths = HashMap::new();
        // agent 1 parks at (1, 0) after t=2; agent 2 drives through it at t=4
        paths.insert(1, straight_path(0.0, 0.0, 0.5, 2));
        paths.insert(2, straight_path(3.0, 0.0, -0.5, 6));

        let conflict = first_conflict(&[1, 2], &paths, 0.6).unwrap();
        assert_eq!(conflict.timestep, 4);
        let parked = paths[&1].position_at(4);
        assert_eq!(parked, Point2D::new(1.0, 0.0));
    }

    #[test]
    fn test_count_accumulates_over_pairs_and_timesteps() {
        let mut paths = HashMap::new();
        paths.insert(1, straight_path(0.0, 0.0, 0.0, 3));
        paths.insert(2, straight_path(0.2, 0.0, 0.0, 3));
        paths.insert(3, straight_path(9.0, 0.0, 0.0, 3));

        // agents 1 and 2 overlap at every one of the 4 timesteps
        assert_eq!(count_conflicts(&[1, 2, 3], &paths, 0.6), 4);
    }
}
