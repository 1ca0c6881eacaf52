// Path Planning algorithms module

pub mod hybrid_astar;

pub use hybrid_astar::*;
