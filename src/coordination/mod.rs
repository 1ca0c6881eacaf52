// Multi-agent coordination: conflict-based search over the low-level planner

pub mod cbs;
pub mod conflict;
pub mod constraint;
pub mod ecbs;
pub mod solution;

pub use cbs::*;
pub use conflict::*;
pub use constraint::*;
pub use ecbs::*;
pub use solution::*;
