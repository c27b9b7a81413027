//! pmccabe-tree
//!
//! Turns per-function complexity reports produced by `pmccabe` into a
//! package → file → function tree annotated with aggregate statistics, and
//! into the collapsed-stack text format consumed by flamegraph renderers.
//!
//! This crate provides the core implementation for the
//! `pmccabe-tree` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! pmccabe src/*.cpp | pmccabe-tree build --stats after-filter --mmcc 4,15
//! pmccabe-tree collapse --source src --attr mmcc | flamegraph.pl > complexity.svg
//! ```
//!
//! ## Library use
//!
//! ```
//! use pmccabe_tree::aggregator::{build_collapsed_stacks, CollapseConfig};
//! use pmccabe_tree::tree::Tree;
//!
//! let tree = Tree::from_report("7 3 10 42 20 pkg/file.cpp(42): foo\n").unwrap();
//! let stacks = build_collapsed_stacks(&tree, &CollapseConfig::default()).unwrap();
//! assert_eq!(stacks[0].to_line(false), "pkg;file.cpp;foo 7");
//!
//! let stripped = CollapseConfig::default().with_strip_extension(true);
//! let stacks = build_collapsed_stacks(&tree, &stripped).unwrap();
//! assert_eq!(stacks[0].to_line(false), "pkg;file;foo 7");
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod scanner;
pub mod tree;
pub mod utils;
