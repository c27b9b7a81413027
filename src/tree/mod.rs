//! Package → file → function hierarchy built from pmccabe records.
//!
//! This module handles:
//! - The node model (packages, files, items)
//! - Record insertion with tree-wide id assignment
//! - Leaf lookup and removal

pub mod builder;
pub mod node;

// Re-export main types
pub use builder::{IdSequence, LeafRef, Tree};
pub use node::{Aggregate, Container, FileNode, Item, Node, NodeId, NodeKind, NodeType};
