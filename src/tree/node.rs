//! Node model of the package tree.
//!
//! Packages and files are containers; items are the function leaves.

use crate::parser::{MetricTuple, Record};
use serde::Serialize;
use std::collections::BTreeMap;

/// Tree-wide unique node identifier, never reused
pub type NodeId = u64;

/// Discriminant of a node, also the name of its markup attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Package,
    File,
    Item,
}

impl NodeType {
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Package => "package",
            NodeType::File => "file",
            NodeType::Item => "item",
        }
    }
}

/// Mean, median and population deviation over a container's child stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub mean: MetricTuple,
    pub median: MetricTuple,
    pub deviation: MetricTuple,
}

/// Shared state of package and file nodes
#[derive(Debug, Clone, Default, Serialize)]
pub struct Container {
    /// Child nodes keyed by package/file name or function identity
    pub children: BTreeMap<String, Node>,

    /// Metrics of every leaf tracked by this container, keyed by leaf id
    pub child_stats: BTreeMap<NodeId, MetricTuple>,

    /// Populated by the statistics pass only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Aggregate>,
}

/// A source file: a container of items that remembers where it came from
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileNode {
    #[serde(flatten)]
    pub container: Container,
    pub source_path: String,
}

/// A function occurrence; metrics accumulate when the identity recurs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    pub mmcc: u64,
    pub tmcc: u64,
    pub sif: u64,
    pub flf: u64,
    pub lif: u64,
    pub full_path: String,
}

impl Item {
    /// Add a recurring record's values; totals saturate at `u64::MAX`
    pub fn accumulate(&mut self, record: &Record) {
        self.mmcc = self.mmcc.saturating_add(record.mmcc);
        self.tmcc = self.tmcc.saturating_add(record.tmcc);
        self.sif = self.sif.saturating_add(record.sif);
        self.flf = self.flf.saturating_add(record.flf);
        self.lif = self.lif.saturating_add(record.lif);
        self.full_path = record.path.clone();
    }

    pub fn metrics(&self) -> MetricTuple {
        MetricTuple::new(self.mmcc, self.tmcc, self.sif, self.lif)
    }
}

impl From<&Record> for Item {
    fn from(record: &Record) -> Self {
        let mut item = Item::default();
        item.accumulate(record);
        item
    }
}

/// Variant-specific node payload
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Package(Container),
    File(FileNode),
    Item(Item),
}

/// A tree node
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Package/file name, or the function signature for items
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Package(_) => NodeType::Package,
            NodeKind::File(_) => NodeType::File,
            NodeKind::Item(_) => NodeType::Item,
        }
    }

    pub fn container(&self) -> Option<&Container> {
        match &self.kind {
            NodeKind::Package(container) => Some(container),
            NodeKind::File(file) => Some(&file.container),
            NodeKind::Item(_) => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            NodeKind::Package(container) => Some(container),
            NodeKind::File(file) => Some(&mut file.container),
            NodeKind::Item(_) => None,
        }
    }

    pub fn item(&self) -> Option<&Item> {
        match &self.kind {
            NodeKind::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn item_mut(&mut self) -> Option<&mut Item> {
        match &mut self.kind {
            NodeKind::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Direct children in key order; items have none
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.container()
            .into_iter()
            .flat_map(|container| container.children.values())
    }

    /// Number of nodes in this subtree, this node included
    pub fn subtree_size(&self) -> usize {
        1 + self.children().map(Node::subtree_size).sum::<usize>()
    }
}
