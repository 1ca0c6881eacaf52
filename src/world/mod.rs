// World model shared between the planners and their hosts

pub mod arena;
pub mod pose_table;
pub mod zone;

pub use arena::*;
pub use pose_table::*;
pub use zone::*;
