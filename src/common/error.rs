//! Error types for rust_mapf

use std::fmt;

use crate::common::types::AgentId;

/// Main error type for planning operations
///
/// Every variant is an expected, recoverable outcome. The low-level search
/// reporting `NoPathFound` and a coordinator reporting `NoSolution` are
/// normal results of exhausting a bounded search, not process failures.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanningError {
    /// Low-level search space exhausted before reaching the goal
    NoPathFound,
    /// Constraint tree exhausted with no conflict-free node
    NoSolution,
    /// Start or goal lies outside the arena
    OutOfBounds(String),
    /// Pose lookup had no entry for this agent
    UnknownAgent(AgentId),
    /// Invalid configuration parameter
    InvalidParameter(String),
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::NoPathFound => write!(f, "No feasible path to the goal"),
            PlanningError::NoSolution => write!(f, "No conflict-free joint solution"),
            PlanningError::OutOfBounds(msg) => write!(f, "Out of bounds: {}", msg),
            PlanningError::UnknownAgent(id) => write!(f, "Unknown agent: {}", id),
            PlanningError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for PlanningError {}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;
