//! Tree passes: statistics, range filtering and stack collapsing.
//!
//! This module transforms a built package tree into:
//! - Per-container mean/median/deviation aggregates
//! - A filtered tree without out-of-range leaves
//! - Collapsed stack format (for flamegraph generation)

pub mod filter;
pub mod stack_builder;
pub mod statistics;

// Re-export main types and functions
pub use filter::{filter_leaves, RangeFilter};
pub use stack_builder::{
    build_collapsed_stacks, render_collapsed_stacks, CollapseConfig, CollapsedStack,
};
pub use statistics::{aggregate, compute_statistics, compute_tree_statistics};
