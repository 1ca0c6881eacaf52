//! Utility modules for rust_mapf

pub mod visualization;

pub use visualization::{agent_color, colors, PathStyle, PointStyle, Visualizer};
