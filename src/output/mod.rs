//! Renderers and writers for the package tree.
//!
//! This module handles:
//! - Tree markup documents
//! - JSON tree dumps
//! - Writing rendered text to stdout or disk

pub mod json;
pub mod markup;
pub mod writer;

// Re-export main functions
pub use json::tree_to_json;
pub use markup::{tree_to_markup, MarkupConfig};
pub use writer::{write_file, write_output};
