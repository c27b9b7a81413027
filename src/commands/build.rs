//! Build command implementation.
//!
//! The build command:
//! 1. Reads the pmccabe report (stdin, file or a fresh scan)
//! 2. Builds the package tree
//! 3. Runs statistics and range filtering in the requested order
//! 4. Renders the tree as markup or JSON
//! 5. Writes the output

use super::models::{BuildArgs, TreeFormat};
use super::utils::{prepare_tree, read_input, validate_input};
use crate::output::{tree_to_json, tree_to_markup, write_output};
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the build command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input read or pmccabe failures
/// * Malformed report records
/// * File write errors
pub fn execute_build(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Reading pmccabe report...");
    let report = read_input(&args.input)?;

    info!("Step 2/3: Building package tree (statistics: {:?})...", args.stats);
    let tree = prepare_tree(&report, &args.filter, args.stats)?;

    info!("Step 3/3: Rendering tree as {:?}...", args.format);
    let rendered = match args.format {
        TreeFormat::Xml => tree_to_markup(&tree, args.markup),
        TreeFormat::Json => tree_to_json(&tree).context("Failed to render tree as JSON")?,
    };

    write_output(&rendered, args.output.as_deref()).context("Failed to write tree")?;

    if let Some(path) = &args.output {
        info!("✓ Tree written to: {}", path.display());
    }

    let elapsed = start_time.elapsed();
    info!("Build completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate build arguments
///
/// **Public** - can be called before execute_build for early validation
pub fn validate_args(args: &BuildArgs) -> Result<()> {
    validate_input(&args.input)?;

    if args.format == TreeFormat::Json && args.markup.pretty {
        anyhow::bail!("--pretty applies to the xml format only (json is always indented)");
    }

    Ok(())
}
