//! Range-based leaf filtering.
//!
//! A leaf survives only if every configured attribute lies inside its
//! range. Failing leaves are first collected as a set and then removed, so
//! the result does not depend on traversal order. Packages and files are
//! never removed, even when they end up empty.

use crate::parser::{Metric, MetricRange};
use crate::tree::{NodeId, Tree};
use crate::utils::error::TreeError;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Inclusive range per attribute; attributes without a range always pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeFilter {
    ranges: BTreeMap<Metric, MetricRange>,
}

impl RangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, metric: Metric, range: MetricRange) -> Self {
        self.ranges.insert(metric, range);
        self
    }

    /// Set or clear the range of one attribute
    pub fn set(&mut self, metric: Metric, range: Option<MetricRange>) {
        match range {
            Some(range) => {
                self.ranges.insert(metric, range);
            }
            None => {
                self.ranges.remove(&metric);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> impl Iterator<Item = (Metric, MetricRange)> + '_ {
        self.ranges.iter().map(|(metric, range)| (*metric, *range))
    }

    /// True when every configured range contains the matching value
    pub fn accepts(&self, value_of: impl Fn(Metric) -> u64) -> bool {
        self.ranges
            .iter()
            .all(|(metric, range)| range.contains(value_of(*metric)))
    }
}

/// Remove every leaf that fails the filter
///
/// **Public** - main entry point for filtering
///
/// # Returns
/// Ids of the removed leaves, ascending
///
/// # Errors
/// * `TreeError::DuplicateId` - two leaves share an id (broken id assignment)
/// * `TreeError::NotFound` - a failing leaf vanished from the reverse index
pub fn filter_leaves(tree: &mut Tree, filter: &RangeFilter) -> Result<Vec<NodeId>, TreeError> {
    if filter.is_empty() {
        debug!("No ranges configured, keeping all {} leaves", tree.leaf_count());
        return Ok(Vec::new());
    }

    let mut seen = BTreeSet::new();
    let mut failing = BTreeSet::new();
    for leaf in tree.leaves() {
        if !seen.insert(leaf.id()) {
            return Err(TreeError::DuplicateId(leaf.id()));
        }
        let metrics = leaf.item.metrics();
        if !filter.accepts(|metric| metrics.get(metric)) {
            failing.insert(leaf.id());
        }
    }

    for id in &failing {
        tree.remove_leaf(*id)?;
    }

    debug!(
        "Filter removed {} of {} leaves",
        failing.len(),
        seen.len()
    );
    Ok(failing.into_iter().collect())
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
    fn test_duplicate_leaf_ids_are_rejected() {
        let mut tree = tree_of(&["1 1 1 1 1 a/x.cpp(1): f", "9 9 9 9 9 a/x.cpp(2): g"]);
        let file = tree
            .roots_mut()
            .get_mut("a")
            .and_then(|node| node.container_mut())
            .and_then(|pkg| pkg.children.get_mut("x.cpp"))
            .and_then(|node| node.container_mut())
            .unwrap();
        file.children.get_mut("g(2):").unwrap().id = 1;

        let filter = RangeFilter::new().with_range(Metric::Mmcc, MetricRange::at_least(5));
        assert_eq!(
            filter_leaves(&mut tree, &filter),
            Err(TreeError::DuplicateId(1))
        );
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let mut tree = tree_of(&["1 1 1 1 1 a/x.cpp(1): f"]);
        assert!(filter_leaves(&mut tree, &RangeFilter::new()).unwrap().is_empty());
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_any_failing_range_removes_leaf() {
        let mut tree = tree_of(&[
            "5 5 10 1 1 a/x.cpp(1): ok",
            "5 5 99 1 1 a/x.cpp(2): too_many_statements",
            "2 5 10 1 1 a/x.cpp(3): too_simple",
        ]);
        let filter = RangeFilter::new()
            .with_range(Metric::Mmcc, MetricRange::between(4, 15))
            .with_range(Metric::Sif, MetricRange::between(2, 50));

        let removed = filter_leaves(&mut tree, &filter).unwrap();

        assert_eq!(removed.len(), 2);
        let names: Vec<&str> = tree.leaves().iter().map(|l| l.node.name.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn test_open_upper_bound() {
        let mut tree = tree_of(&["1000 1 1 1 1 a/x.cpp(1): huge", "0 1 1 1 1 a/x.cpp(2): zero"]);
        let filter = RangeFilter::new().with_range(Metric::Mmcc, MetricRange::at_least(1));
        filter_leaves(&mut tree, &filter).unwrap();
        assert_eq!(tree.leaves()[0].node.name, "huge");
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_set_clears_range() {
        let mut filter = RangeFilter::new();
        filter.set(Metric::Lif, Some(MetricRange::at_least(3)));
        assert!(!filter.is_empty());
        filter.set(Metric::Lif, None);
        assert!(filter.is_empty());
    }
}
