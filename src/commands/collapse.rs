//! Collapse command implementation.
//!
//! Turns the (optionally filtered) package tree into collapsed stacks, one
//! line per function per selected attribute, ready for a flamegraph renderer.

use super::models::{CollapseArgs, StatsOrder};
use super::utils::{prepare_tree, read_input, validate_input};
use crate::aggregator::{build_collapsed_stacks, render_collapsed_stacks};
use crate::output::write_output;
use crate::utils::error::ConfigError;
use anyhow::{Context, Result};
use log::info;

/// Execute the collapse command
///
/// **Public** - main entry point called from main.rs
pub fn execute_collapse(args: CollapseArgs) -> Result<()> {
    let report = read_input(&args.input)?;
    let tree = prepare_tree(&report, &args.filter, StatsOrder::None)?;

    let stacks =
        build_collapsed_stacks(&tree, &args.collapse).context("Failed to build collapsed stacks")?;
    info!(
        "Collapsed {} functions into {} stacks",
        tree.leaf_count(),
        stacks.len()
    );

    let rendered = render_collapsed_stacks(&stacks, args.collapse.is_tagged());
    write_output(&rendered, args.output.as_deref()).context("Failed to write collapsed stacks")?;

    if let Some(path) = &args.output {
        info!("✓ Collapsed stacks written to: {}", path.display());
    }

    Ok(())
}

/// Validate collapse arguments
///
/// **Public** - rejects an empty attribute selection before any input is read
pub fn validate_args(args: &CollapseArgs) -> Result<()> {
    if args.collapse.metrics.is_empty() {
        return Err(ConfigError::NoAttributes.into());
    }
    validate_input(&args.input)
}
