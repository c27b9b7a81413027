//! Package tree construction.
//!
//! Records are inserted one at a time. Each insertion descends the record
//! path, creating packages and the file on demand, and ends in the item for
//! the function. While the recursion unwinds every container on the way
//! records the leaf's metrics in its `child_stats`, and containers created
//! by this insertion draw their id only after their child did: the leaf gets
//! the first new id, its file the next, the outermost package the last.

use super::node::{Container, FileNode, Item, Node, NodeId, NodeKind, NodeType};
use crate::parser::{parse_report, MetricTuple, Record, RecordLocation};
use crate::utils::error::{ParseError, TreeError};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// Monotonic id source shared by the whole tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdSequence {
    last: NodeId,
}

impl IdSequence {
    /// Next vacant id; the first one handed out is 1
    pub fn next_id(&mut self) -> NodeId {
        self.last += 1;
        self.last
    }

    /// Last id handed out, 0 before the first insertion
    pub fn last(&self) -> NodeId {
        self.last
    }
}

/// A leaf together with the chain of containers above it
#[derive(Debug, Clone)]
pub struct LeafRef<'a> {
    /// Outermost first, the file last
    pub ancestors: Vec<&'a Node>,
    pub node: &'a Node,
    pub item: &'a Item,
}

impl LeafRef<'_> {
    pub fn id(&self) -> NodeId {
        self.node.id
    }
}

/// Holder of the parsed hierarchy
#[derive(Debug, Clone, Serialize)]
pub struct Tree {
    roots: BTreeMap<String, Node>,

    #[serde(skip)]
    ids: IdSequence,

    /// Leaf id -> child-map keys from the root down to the leaf
    #[serde(skip)]
    leaf_index: BTreeMap<NodeId, Vec<String>>,

    #[serde(skip)]
    separator: char,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one insertion, threaded up through the recursion
struct InsertedLeaf {
    id: NodeId,
    metrics: MetricTuple,
    created: bool,
}

/// Everything a level of the recursion needs to know about the record
struct Insertion<'r> {
    record: &'r Record,
    location: RecordLocation<'r>,
    identity: String,
}

impl Tree {
    /// Empty tree using the platform path separator
    pub fn new() -> Self {
        Self::with_separator(std::path::MAIN_SEPARATOR)
    }

    pub fn with_separator(separator: char) -> Self {
        Self {
            roots: BTreeMap::new(),
            ids: IdSequence::default(),
            leaf_index: BTreeMap::new(),
            separator,
        }
    }

    /// Build a tree from already parsed records
    pub fn from_records<'r>(records: impl IntoIterator<Item = &'r Record>) -> Self {
        let mut tree = Self::new();
        for record in records {
            tree.insert(record);
        }
        tree
    }

    /// Parse a raw pmccabe report and build its tree
    ///
    /// **Public** - main entry point for tree construction
    ///
    /// # Errors
    /// * `ParseError::MalformedRecord` - the first record with fewer than 7 fields
    ///   or a non-numeric metric; no partial tree is returned
    pub fn from_report(text: &str) -> Result<Self, ParseError> {
        let records = parse_report(text)?;
        let tree = Self::from_records(&records);
        debug!(
            "Built tree with {} nodes ({} leaves) from {} records",
            tree.node_count(),
            tree.leaf_count(),
            records.len()
        );
        Ok(tree)
    }

    /// Insert one record and return the id of the item it landed in
    ///
    /// Re-inserting a known path and signature accumulates onto the existing
    /// item. Returns `None` when a name on the path is already taken by a
    /// node of another kind (a package where a file is expected, a file
    /// where a package is expected, or a function), which pmccabe output
    /// never produces.
    pub fn insert(&mut self, record: &Record) -> Option<NodeId> {
        let insertion = Insertion {
            record,
            location: record.location(self.separator),
            identity: record.function_identity(self.separator),
        };

        let mut trail = Vec::with_capacity(insertion.location.packages.len() + 2);
        let Some(leaf) = insert_level(
            &mut self.roots,
            &insertion.location.packages,
            &insertion,
            &mut self.ids,
            &mut trail,
        ) else {
            warn!(
                "Skipping record for `{}`: path {} collides with an existing node of another kind",
                record.signature, record.path
            );
            return None;
        };

        if leaf.created {
            self.leaf_index.insert(leaf.id, trail);
        }
        Some(leaf.id)
    }

    /// Top-level nodes keyed by name
    pub fn roots(&self) -> &BTreeMap<String, Node> {
        &self.roots
    }

    pub(crate) fn roots_mut(&mut self) -> &mut BTreeMap<String, Node> {
        &mut self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Last id drawn from the sequence; ids are never reused
    pub fn last_id(&self) -> NodeId {
        self.ids.last()
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn node_count(&self) -> usize {
        self.roots.values().map(Node::subtree_size).sum()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_index.len()
    }

    /// Child-map keys leading from the root to a leaf
    pub fn ancestry(&self, leaf_id: NodeId) -> Option<&[String]> {
        self.leaf_index.get(&leaf_id).map(Vec::as_slice)
    }

    /// Every leaf, depth first in key order
    pub fn leaves(&self) -> Vec<LeafRef<'_>> {
        let mut leaves = Vec::with_capacity(self.leaf_index.len());
        let mut ancestors = Vec::new();
        collect_leaves(self.roots.values(), &mut ancestors, &mut leaves);
        leaves
    }

    /// Look up a node by id with a full-tree search
    ///
    /// # Errors
    /// * `TreeError::NotFound` - no node carries the id
    /// * `TreeError::DuplicateId` - more than one node carries it
    pub fn find(&self, id: NodeId) -> Result<&Node, TreeError> {
        let mut matches = Vec::new();
        let mut stack: Vec<&Node> = self.roots.values().collect();
        while let Some(node) = stack.pop() {
            if node.id == id {
                matches.push(node);
            }
            stack.extend(node.children());
        }

        match matches.as_slice() {
            [] => Err(TreeError::NotFound(id)),
            [node] => Ok(*node),
            _ => Err(TreeError::DuplicateId(id)),
        }
    }

    /// Detach a leaf from its file and drop its id from every ancestor's stats
    ///
    /// Containers left empty stay in the tree.
    ///
    /// # Errors
    /// * `TreeError::NotFound` - the id is not a live leaf
    pub fn remove_leaf(&mut self, leaf_id: NodeId) -> Result<(), TreeError> {
        let trail = self
            .leaf_index
            .remove(&leaf_id)
            .ok_or(TreeError::NotFound(leaf_id))?;
        let Some((leaf_key, container_keys)) = trail.split_last() else {
            return Err(TreeError::NotFound(leaf_id));
        };

        let mut siblings = &mut self.roots;
        for key in container_keys {
            let container = siblings
                .get_mut(key)
                .and_then(Node::container_mut)
                .ok_or(TreeError::NotFound(leaf_id))?;
            container.child_stats.remove(&leaf_id);
            siblings = &mut container.children;
        }

        match siblings.get(leaf_key) {
            Some(node) if node.id == leaf_id => {
                siblings.remove(leaf_key);
                Ok(())
            }
            _ => Err(TreeError::NotFound(leaf_id)),
        }
    }
}

fn insert_level(
    siblings: &mut BTreeMap<String, Node>,
    packages: &[&str],
    insertion: &Insertion<'_>,
    ids: &mut IdSequence,
    trail: &mut Vec<String>,
) -> Option<InsertedLeaf> {
    let Some((head, rest)) = packages.split_first() else {
        return insert_file(siblings, insertion, ids, trail);
    };
    trail.push(head.to_string());

    if let Some(node) = siblings.get_mut(*head) {
        if node.node_type() != NodeType::Package {
            debug!("`{}` is a {}, not a package", head, node.node_type().name());
            return None;
        }
        let container = node.container_mut()?;
        let leaf = insert_level(&mut container.children, rest, insertion, ids, trail)?;
        container.child_stats.insert(leaf.id, leaf.metrics);
        return Some(leaf);
    }

    let mut container = Container::default();
    let leaf = insert_level(&mut container.children, rest, insertion, ids, trail)?;
    container.child_stats.insert(leaf.id, leaf.metrics);
    let id = ids.next_id();
    siblings.insert(
        head.to_string(),
        Node::new(id, *head, NodeKind::Package(container)),
    );
    Some(leaf)
}

fn insert_file(
    siblings: &mut BTreeMap<String, Node>,
    insertion: &Insertion<'_>,
    ids: &mut IdSequence,
    trail: &mut Vec<String>,
) -> Option<InsertedLeaf> {
    let file_name = insertion.location.file_name;
    trail.push(file_name.to_string());

    if let Some(node) = siblings.get_mut(file_name) {
        if node.node_type() != NodeType::File {
            debug!("`{}` is a {}, not a file", file_name, node.node_type().name());
            return None;
        }
        let container = node.container_mut()?;
        let leaf = insert_item(&mut container.children, insertion, ids, trail)?;
        container.child_stats.insert(leaf.id, leaf.metrics);
        return Some(leaf);
    }

    let mut file = FileNode {
        container: Container::default(),
        source_path: insertion.record.source_path().to_string(),
    };
    let leaf = insert_item(&mut file.container.children, insertion, ids, trail)?;
    file.container.child_stats.insert(leaf.id, leaf.metrics);
    let id = ids.next_id();
    siblings.insert(
        file_name.to_string(),
        Node::new(id, file_name, NodeKind::File(file)),
    );
    Some(leaf)
}

fn insert_item(
    siblings: &mut BTreeMap<String, Node>,
    insertion: &Insertion<'_>,
    ids: &mut IdSequence,
    trail: &mut Vec<String>,
) -> Option<InsertedLeaf> {
    trail.push(insertion.identity.clone());

    if let Some(node) = siblings.get_mut(&insertion.identity) {
        let id = node.id;
        let item = node.item_mut()?;
        item.accumulate(insertion.record);
        return Some(InsertedLeaf {
            id,
            metrics: item.metrics(),
            created: false,
        });
    }

    let id = ids.next_id();
    let item = Item::from(insertion.record);
    let metrics = item.metrics();
    siblings.insert(
        insertion.identity.clone(),
        Node::new(id, insertion.record.signature.as_str(), NodeKind::Item(item)),
    );
    Some(InsertedLeaf {
        id,
        metrics,
        created: true,
    })
}

fn collect_leaves<'a>(
    nodes: impl Iterator<Item = &'a Node>,
    ancestors: &mut Vec<&'a Node>,
    out: &mut Vec<LeafRef<'a>>,
) {
    for node in nodes {
        match node.item() {
            Some(item) => out.push(LeafRef {
                ancestors: ancestors.clone(),
                node,
                item,
            }),
            None => {
                ancestors.push(node);
                collect_leaves(node.children(), ancestors, out);
                ancestors.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> Record {
        line.parse().unwrap()
    }

    fn tree_of(lines: &[&str]) -> Tree {
        let mut tree = Tree::with_separator('/');
        for line in lines {
            tree.insert(&record(line));
        }
        tree
    }

    #[test]
    fn test_ids_assigned_leaf_first() {
        let tree = tree_of(&["7 8 10 42 20 pkg/file.cpp(42): foo"]);

        let pkg = &tree.roots()["pkg"];
        let file = &pkg.container().unwrap().children["file.cpp"];
        let item = &file.container().unwrap().children["foo(42):"];

        assert_eq!(item.id, 1);
        assert_eq!(file.id, 2);
        assert_eq!(pkg.id, 3);
        assert_eq!(tree.last_id(), 3);
        assert_eq!(item.name, "foo");
        assert_eq!(file.node_type(), NodeType::File);
        assert_eq!(pkg.node_type(), NodeType::Package);
    }

    #[test]
    fn test_existing_containers_keep_their_ids() {
        let tree = tree_of(&[
            "1 1 1 1 1 pkg/file.cpp(1): a",
            "2 2 2 2 2 pkg/file.cpp(9): b",
            "3 3 3 3 3 pkg/other.cpp(4): c",
        ]);

        let pkg = &tree.roots()["pkg"];
        assert_eq!(pkg.id, 3);
        let children = &pkg.container().unwrap().children;
        assert_eq!(children["file.cpp"].id, 2);
        assert_eq!(children["file.cpp"].container().unwrap().children["b(9):"].id, 4);
        assert_eq!(children["other.cpp"].id, 6);
        assert_eq!(tree.last_id(), 6);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_repeated_identity_accumulates() {
        let mut tree = Tree::with_separator('/');
        let first = tree.insert(&record("1 2 3 4 5 pkg/f.cpp(4): foo"));
        let second = tree.insert(&record("10 20 30 40 50 pkg/f.cpp(4): foo"));

        assert_eq!(first, second);
        assert_eq!(tree.leaf_count(), 1);
        let item = tree.find(first.unwrap()).unwrap().item().unwrap();
        assert_eq!(item.mmcc, 11);
        assert_eq!(item.lif, 55);

        let pkg = tree.roots()["pkg"].container().unwrap();
        assert_eq!(pkg.child_stats[&1], MetricTuple::new(11, 22, 33, 55));
    }

    #[test]
    fn test_packages_track_every_descendant_leaf() {
        let tree = tree_of(&[
            "1 1 1 1 1 a/b/x.cpp(1): f",
            "2 2 2 2 2 a/c.cpp(2): g",
        ]);

        let a = tree.roots()["a"].container().unwrap();
        let leaf_ids: Vec<NodeId> = a.child_stats.keys().copied().collect();
        let expected: Vec<NodeId> = tree.leaves().iter().map(LeafRef::id).collect();
        assert_eq!(leaf_ids, expected);

        let b = a.children["b"].container().unwrap();
        assert_eq!(b.child_stats.len(), 1);
    }

    #[test]
    fn test_single_segment_path_is_root_file() {
        let tree = tree_of(&["1 1 1 1 1 main.cpp(3): main"]);
        let root = &tree.roots()["main.cpp"];
        assert_eq!(root.node_type(), NodeType::File);
        assert_eq!(root.id, 2);
    }

    #[test]
    fn test_leading_separator_is_ignored() {
        let tree = tree_of(&["1 1 1 1 1 /src/a.cpp(3): f"]);
        assert!(tree.roots().contains_key("src"));
        assert!(!tree.roots().contains_key(""));
    }

    #[test]
    fn test_file_source_path() {
        let tree = tree_of(&["1 1 1 1 1 src/net/a.cpp(3): f"]);
        let leaf = &tree.leaves()[0];
        match &leaf.ancestors.last().unwrap().kind {
            NodeKind::File(file) => assert_eq!(file.source_path, "src/net/a.cpp"),
            other => panic!("expected file, got {:?}", other),
        }
        assert_eq!(leaf.item.full_path, "src/net/a.cpp(3):");
    }

    #[test]
    fn test_function_named_like_directory_is_skipped() {
        let mut tree = tree_of(&["1 1 1 1 1 a/x.cpp f"]);
        let before = tree.last_id();
        assert_eq!(tree.insert(&record("1 1 1 1 1 a/x.cpp/f/y.cpp(1): g")), None);
        assert_eq!(tree.last_id(), before);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_package_named_like_file_is_skipped() {
        let mut tree = tree_of(&["1 1 1 1 1 a/x(1): f"]);
        let before = tree.last_id();

        assert_eq!(tree.insert(&record("1 1 1 1 1 a/x/y.cpp(1): g")), None);
        assert_eq!(tree.last_id(), before);

        let x = &tree.roots()["a"].container().unwrap().children["x"];
        assert_eq!(x.node_type(), NodeType::File);
        assert!(x.children().all(|child| child.node_type() == NodeType::Item));
        assert_eq!(tree.roots()["a"].container().unwrap().child_stats.len(), 1);
    }

    #[test]
    fn test_file_named_like_package_is_skipped() {
        let mut tree = tree_of(&["1 1 1 1 1 a/x/y.cpp(1): g"]);
        let before = tree.last_id();

        assert_eq!(tree.insert(&record("1 1 1 1 1 a/x(1): f")), None);
        assert_eq!(tree.last_id(), before);

        let x = &tree.roots()["a"].container().unwrap().children["x"];
        assert_eq!(x.node_type(), NodeType::Package);
        assert!(x.children().all(|child| child.node_type() == NodeType::File));
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_find() {
        let tree = tree_of(&["1 1 1 1 1 pkg/file.cpp(42): foo"]);
        assert_eq!(tree.find(2).unwrap().name, "file.cpp");
        assert_eq!(tree.find(99).unwrap_err(), TreeError::NotFound(99));
    }

    #[test]
    fn test_find_reports_duplicate_ids() {
        let mut tree = tree_of(&["1 1 1 1 1 pkg/a.cpp(1): f", "1 1 1 1 1 pkg/a.cpp(2): g"]);
        let file = tree
            .roots_mut()
            .get_mut("pkg")
            .and_then(Node::container_mut)
            .and_then(|pkg| pkg.children.get_mut("a.cpp"))
            .and_then(Node::container_mut)
            .unwrap();
        file.children.get_mut("g(2):").unwrap().id = 1;

        assert_eq!(tree.find(1).unwrap_err(), TreeError::DuplicateId(1));
        assert_eq!(tree.find(2).unwrap().name, "a.cpp");
    }

    #[test]
    fn test_remove_leaf_cleans_all_ancestors() {
        let mut tree = tree_of(&[
            "1 1 1 1 1 a/b/x.cpp(1): f",
            "2 2 2 2 2 a/b/x.cpp(5): g",
        ]);
        let f = tree.insert(&record("0 0 0 0 0 a/b/x.cpp(1): f")).unwrap();

        tree.remove_leaf(f).unwrap();

        let a = tree.roots()["a"].container().unwrap();
        let b = a.children["b"].container().unwrap();
        let x = b.children["x.cpp"].container().unwrap();
        assert!(!a.child_stats.contains_key(&f));
        assert!(!b.child_stats.contains_key(&f));
        assert!(!x.child_stats.contains_key(&f));
        assert!(!x.children.contains_key("f(1):"));
        assert_eq!(x.children.len(), 1);
        assert_eq!(tree.remove_leaf(f), Err(TreeError::NotFound(f)));
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut tree = tree_of(&["1 1 1 1 1 a/x.cpp(1): f"]);
        tree.remove_leaf(1).unwrap();
        let id = tree.insert(&record("1 1 1 1 1 a/x.cpp(1): f")).unwrap();
        assert_eq!(id, 4);
        // containers survive the removal and keep their ids
        assert_eq!(tree.roots()["a"].id, 3);
    }
}
