//! Per-container statistics over tracked child metrics.
//!
//! Every package and file gets the mean, median and population standard
//! deviation of each attribute across the entries currently in its
//! `child_stats`. All three are truncated to integers. The pass reads the
//! tree as it is *now*: running it after the range filter excludes the
//! removed leaves, running it before leaves numbers that the filter will not
//! update.

use crate::parser::{Metric, MetricTuple};
use crate::tree::{Aggregate, Node, Tree};
use log::debug;

/// Compute aggregates for every container in the tree
///
/// **Public** - main entry point for the statistics pass
///
/// # Returns
/// Number of containers that received an aggregate
pub fn compute_tree_statistics(tree: &mut Tree) -> usize {
    let computed = tree
        .roots_mut()
        .values_mut()
        .map(compute_statistics)
        .sum();
    debug!("Computed statistics for {} containers", computed);
    computed
}

/// Compute aggregates for `node` and every container below it
///
/// Items are left untouched. A container without tracked children ends up
/// with no aggregate.
///
/// # Returns
/// Number of containers that received an aggregate
pub fn compute_statistics(node: &mut Node) -> usize {
    let Some(container) = node.container_mut() else {
        return 0;
    };

    let nested: usize = container
        .children
        .values_mut()
        .map(compute_statistics)
        .sum();

    let values: Vec<MetricTuple> = container.child_stats.values().copied().collect();
    container.aggregate = aggregate(&values);
    nested + usize::from(container.aggregate.is_some())
}

/// Mean, median and deviation of a set of tuples, `None` when empty
pub fn aggregate(values: &[MetricTuple]) -> Option<Aggregate> {
    if values.is_empty() {
        return None;
    }

    let column = |metric: Metric| -> Vec<u64> { values.iter().map(|v| v.get(metric)).collect() };
    let mean = MetricTuple::from_fn(|metric| truncated_mean(&column(metric)));
    let median = MetricTuple::from_fn(|metric| truncated_median(&column(metric)));
    let deviation =
        MetricTuple::from_fn(|metric| population_deviation(&column(metric), mean.get(metric)));

    Some(Aggregate {
        mean,
        median,
        deviation,
    })
}

/// Integer mean, truncated toward zero
pub fn truncated_mean(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let sum: u128 = values.iter().map(|&v| u128::from(v)).sum();
    // The mean of u64 values always fits back into u64
    (sum / values.len() as u128) as u64
}

/// Middle element, or the truncated average of the two middle elements
pub fn truncated_median(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        let (low, high) = (sorted[mid - 1], sorted[mid]);
        low / 2 + high / 2 + (low % 2 + high % 2) / 2
    }
}

/// Population standard deviation around an already truncated mean
pub fn population_deviation(values: &[u64], mean: u64) -> u64 {
    if values.is_empty() {
        return 0;
    }

    let squares: f64 = values
        .iter()
        .map(|&v| {
            let diff = v as f64 - mean as f64;
            diff * diff
        })
        .sum();
    (squares / values.len() as f64).sqrt() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_median_of_four() {
        assert_eq!(truncated_mean(&[1, 2, 3, 4]), 2);
        assert_eq!(truncated_median(&[4, 1, 3, 2]), 2);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        assert_eq!(truncated_mean(&[u64::MAX, u64::MAX]), u64::MAX);
        assert_eq!(truncated_median(&[u64::MAX, u64::MAX]), u64::MAX);
        assert_eq!(truncated_median(&[u64::MAX, u64::MAX - 1]), u64::MAX - 1);
        assert_eq!(truncated_median(&[3, 4]), 3);

        let big = MetricTuple::new(u64::MAX, u64::MAX, 1, 0);
        let aggregate = aggregate(&[big, big]).unwrap();
        assert_eq!(aggregate.mean, big);
        assert_eq!(aggregate.median, big);
        assert_eq!(aggregate.deviation, MetricTuple::default());
    }

    #[test]
    fn test_median_odd_count() {
        assert_eq!(truncated_median(&[9, 1, 5]), 5);
    }

    #[test]
    fn test_deviation_uses_truncated_mean() {
        // mean of [1, 2] truncates to 1, deviations 0 and 1 -> sqrt(0.5) -> 0
        assert_eq!(population_deviation(&[1, 2], truncated_mean(&[1, 2])), 0);
        // [2, 4, 4, 4, 5, 5, 7, 9] has mean 5 and deviation 2
        let values = [2, 4, 4, 4, 5, 5, 7, 9];
        assert_eq!(population_deviation(&values, truncated_mean(&values)), 2);
    }

    #[test]
    fn test_single_child_aggregate() {
        let value = MetricTuple::new(7, 8, 10, 20);
        let aggregate = aggregate(&[value]).unwrap();
        assert_eq!(aggregate.mean, value);
        assert_eq!(aggregate.median, value);
        assert_eq!(aggregate.deviation, MetricTuple::default());
    }

    #[test]
    fn test_empty_aggregate() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn test_attributes_aggregate_independently() {
        let values = [
            MetricTuple::new(1, 10, 100, 4),
            MetricTuple::new(2, 20, 100, 4),
            MetricTuple::new(3, 30, 100, 4),
            MetricTuple::new(4, 40, 100, 4),
        ];
        let aggregate = aggregate(&values).unwrap();
        assert_eq!(aggregate.mean, MetricTuple::new(2, 25, 100, 4));
        assert_eq!(aggregate.median, MetricTuple::new(2, 25, 100, 4));
        assert_eq!(aggregate.deviation.sif, 0);
        assert_eq!(aggregate.deviation.mmcc, 1);
    }
}
