//! RustMAPF - multi-agent kinodynamic path planning
//!
//! This crate provides a hierarchical planning stack for multiple mobile
//! agents sharing a bounded 2D arena with static obstacles: a kinodynamic
//! hybrid A* search for single agents, and two conflict-based coordinators
//! (CBS and bounded-suboptimal ECBS) layered on top of it.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;
pub mod coordination;
pub mod world;

// Re-export common types for convenience
pub use common::{AgentId, Point2D, Pose2D, PosePath, Obstacles};
pub use common::{PosePlanner, PoseSource};
pub use common::{PlanningError, PlanningResult};
pub use coordination::{CbsConfig, CbsPlanner, EcbsConfig, EcbsPlanner, Solution};
pub use path_planning::{HybridAStarConfig, HybridAStarPlanner};
pub use world::{Arena, PoseTable, Zone};
