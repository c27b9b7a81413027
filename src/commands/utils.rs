use super::models::{InputSource, StatsOrder};
use crate::aggregator::{compute_tree_statistics, filter_leaves, RangeFilter};
use crate::scanner::PmccabeRunner;
use crate::tree::Tree;
use crate::utils::config::{attributes_help, DEFAULT_RANGE_HINT};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Read;

/// Read the raw pmccabe report from its source
pub fn read_input(input: &InputSource) -> Result<String> {
    match input {
        InputSource::Stdin => {
            debug!("Reading pmccabe report from stdin");
            let mut report = String::new();
            std::io::stdin()
                .read_to_string(&mut report)
                .context("Failed to read report from stdin")?;
            Ok(report)
        }
        InputSource::File(path) => {
            debug!("Reading pmccabe report from {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read report {}", path.display()))
        }
        InputSource::Scan {
            root,
            filter,
            program,
        } => PmccabeRunner::new(program.as_str())
            .scan(root, filter)
            .with_context(|| format!("Failed to scan sources under {}", root.display())),
    }
}

/// Validate the input source before any work starts
pub fn validate_input(input: &InputSource) -> Result<()> {
    match input {
        InputSource::Stdin => {}
        InputSource::File(path) => {
            if !path.is_file() {
                anyhow::bail!("Input report does not exist: {}", path.display());
            }
        }
        InputSource::Scan { root, filter, .. } => {
            if !root.exists() {
                anyhow::bail!("Source path does not exist: {}", root.display());
            }
            if filter.extensions.is_empty() {
                anyhow::bail!("At least one source extension is required");
            }
        }
    }
    Ok(())
}

/// Parse the report into a tree and run the optional passes in the requested order
pub fn prepare_tree(report: &str, filter: &RangeFilter, stats: StatsOrder) -> Result<Tree> {
    let mut tree = Tree::from_report(report).context("Failed to parse pmccabe report")?;
    info!(
        "Built tree: {} nodes, {} functions",
        tree.node_count(),
        tree.leaf_count()
    );

    if stats == StatsOrder::BeforeFilter {
        compute_tree_statistics(&mut tree);
    }

    let removed = filter_leaves(&mut tree, filter).context("Failed to filter functions")?;
    if !filter.is_empty() {
        for (metric, range) in filter.ranges() {
            debug!("Range {}: {}", metric, range);
        }
        info!(
            "Filtered out {} functions, {} remain",
            removed.len(),
            tree.leaf_count()
        );
    }

    if stats == StatsOrder::AfterFilter {
        compute_tree_statistics(&mut tree);
    }

    Ok(tree)
}

/// Display the tracked attributes
pub fn display_attributes() {
    println!("{}", attributes_help());
    println!();
    println!(
        "Ranges are given as MIN[,MAX], e.g. \"4,15\" or \"{}\" (no upper bound).",
        DEFAULT_RANGE_HINT
    );
}

/// Display version information
pub fn display_version() {
    println!("pmccabe-tree v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Package trees and flamegraph-ready collapsed stacks from pmccabe reports.");
}
