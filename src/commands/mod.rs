//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod build;
pub mod collapse;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use build::execute_build;
pub use collapse::execute_collapse;
pub use models::{BuildArgs, CollapseArgs, InputSource, StatsOrder, TreeFormat};
pub use utils::{display_attributes, display_version, prepare_tree, read_input};
