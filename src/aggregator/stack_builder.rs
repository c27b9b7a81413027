//! Build collapsed stack format from the package tree.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "src;net;socket.cpp;Socket::connect 12"
//! This means: function Socket::connect in src/net/socket.cpp scores 12 on
//! the selected attribute.

use crate::parser::Metric;
use crate::tree::{NodeType, Tree};
use crate::utils::config::STACK_FRAME_SEPARATOR;
use crate::utils::error::ConfigError;
use log::debug;

/// A single collapsed stack entry
///
/// **Public** - used by the collapse command and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Value of `metric` for the leaf
    pub weight: u64,

    /// Attribute the weight was taken from
    pub metric: Metric,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    ///
    /// **Public** - constructor
    pub fn new(stack: String, weight: u64, metric: Metric) -> Self {
        Self {
            stack,
            weight,
            metric,
        }
    }

    /// Render as one line, optionally tagging the weight with its attribute
    pub fn to_line(&self, tagged: bool) -> String {
        if tagged {
            format!("{} {} {}", self.stack, self.metric.tag(), self.weight)
        } else {
            format!("{} {}", self.stack, self.weight)
        }
    }
}

/// What to collapse and how to name the frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseConfig {
    /// Attributes to emit, in output order
    pub metrics: Vec<Metric>,

    /// Drop the extension of the file frame (`file.cpp` -> `file`)
    pub strip_extension: bool,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            metrics: vec![Metric::Mmcc],
            strip_extension: false,
        }
    }
}

impl CollapseConfig {
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    pub fn with_strip_extension(mut self, strip: bool) -> Self {
        self.strip_extension = strip;
        self
    }

    /// Weights carry an attribute tag once several attributes share the output
    pub fn is_tagged(&self) -> bool {
        self.metrics.len() > 1
    }
}

/// Build collapsed stacks from the tree
///
/// **Public** - main entry point for stack building
///
/// # Returns
/// One stack per leaf per requested attribute, attribute-major, leaves in
/// tree order. An empty tree yields no stacks.
///
/// # Errors
/// * `ConfigError::NoAttributes` - `config.metrics` is empty
pub fn build_collapsed_stacks(
    tree: &Tree,
    config: &CollapseConfig,
) -> Result<Vec<CollapsedStack>, ConfigError> {
    if config.metrics.is_empty() {
        return Err(ConfigError::NoAttributes);
    }

    let leaves = tree.leaves();
    let separator = STACK_FRAME_SEPARATOR.to_string();

    // Frame strings do not depend on the attribute, build them once
    let frames: Vec<String> = leaves
        .iter()
        .map(|leaf| {
            leaf.ancestors
                .iter()
                .map(|node| match node.node_type() {
                    NodeType::File if config.strip_extension => strip_extension(&node.name),
                    _ => node.name.as_str(),
                })
                .chain(std::iter::once(leaf.node.name.as_str()))
                .collect::<Vec<_>>()
                .join(&separator)
        })
        .collect();

    let mut stacks = Vec::with_capacity(leaves.len() * config.metrics.len());
    for metric in &config.metrics {
        for (leaf, stack) in leaves.iter().zip(&frames) {
            stacks.push(CollapsedStack::new(
                stack.clone(),
                leaf.item.metrics().get(*metric),
                *metric,
            ));
        }
    }

    debug!(
        "Built {} collapsed stacks for {} leaves",
        stacks.len(),
        leaves.len()
    );
    Ok(stacks)
}

/// Render stacks as newline-terminated lines
pub fn render_collapsed_stacks(stacks: &[CollapsedStack], tagged: bool) -> String {
    let mut out = String::new();
    for stack in stacks {
        out.push_str(&stack.to_line(tagged));
        out.push('\n');
    }
    out
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Record;

    fn tree_of(lines: &[&str]) -> Tree {
        let mut tree = Tree::with_separator('/');
        for line in lines {
            tree.insert(&line.parse::<Record>().unwrap());
        }
        tree
    }

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("main;execute;storage_read".to_string(), 1000, Metric::Mmcc);
        assert_eq!(stack.to_line(false), "main;execute;storage_read 1000");
        assert_eq!(stack.to_line(true), "main;execute;storage_read <<MMCC>> 1000");
    }

    #[test]
    fn test_single_leaf_stack() {
        let tree = tree_of(&["7 3 10 42 20 pkg/file.cpp(42): foo"]);
        let stacks = build_collapsed_stacks(&tree, &CollapseConfig::default()).unwrap();
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].to_line(false), "pkg;file.cpp;foo 7");
    }

    #[test]
    fn test_strip_extension() {
        let tree = tree_of(&["7 3 10 42 20 pkg/file.cpp(42): foo"]);
        let config = CollapseConfig::default().with_strip_extension(true);
        let stacks = build_collapsed_stacks(&tree, &config).unwrap();
        assert_eq!(stacks[0].to_line(false), "pkg;file;foo 7");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("Makefile"), "Makefile");
    }

    #[test]
    fn test_multiple_metrics_are_attribute_major() {
        let tree = tree_of(&["7 3 10 42 20 a/x.cpp(1): f", "1 2 3 4 5 a/x.cpp(9): g"]);
        let config = CollapseConfig::new(vec![Metric::Sif, Metric::Lif]);
        let stacks = build_collapsed_stacks(&tree, &config).unwrap();
        let rendered = render_collapsed_stacks(&stacks, config.is_tagged());
        assert_eq!(
            rendered,
            "a;x.cpp;f <<SIF>> 10\na;x.cpp;g <<SIF>> 3\na;x.cpp;f <<LIF>> 20\na;x.cpp;g <<LIF>> 5\n"
        );
    }

    #[test]
    fn test_empty_tree_and_empty_selection() {
        let tree = Tree::with_separator('/');
        assert!(build_collapsed_stacks(&tree, &CollapseConfig::default())
            .unwrap()
            .is_empty());
        assert_eq!(
            build_collapsed_stacks(&tree, &CollapseConfig::new(Vec::new())),
            Err(ConfigError::NoAttributes)
        );
        assert_eq!(render_collapsed_stacks(&[], false), "");
    }
}
