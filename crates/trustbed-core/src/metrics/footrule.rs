//! Spearman rank correlation over fractional ranks.

use std::collections::BTreeMap;

use trustbed_types::{Accuracy, AgentId, Metric};

use crate::rankings;

/// Spearman's rank correlation between estimate and ground truth, shifted
/// onto [0, 1].
///
/// Both maps are converted to fractional rankings; the squared rank
/// differences are summed over the estimate's agents and normalized by
/// `n(n² − 1)`, with the truth ranked over its full agent set. Identical
/// orderings score 1, fully reversed ones 0. An empty estimate scores 0, a
/// single estimate 1.
#[derive(Debug, Clone, Default)]
pub struct SpearmanFootrule;

impl SpearmanFootrule {
    /// Creates the metric.
    pub fn new() -> Self {
        Self
    }
}

impl Metric for SpearmanFootrule {
    fn name(&self) -> &'static str {
        "spearman-footrule"
    }
}

impl<T: PartialOrd + 'static> Accuracy<T> for SpearmanFootrule {
    fn evaluate(
        &mut self,
        estimate: &BTreeMap<AgentId, T>,
        ground_truth: &BTreeMap<AgentId, f64>,
    ) -> f64 {
        if estimate.is_empty() {
            return 0.0;
        }
        if estimate.len() == 1 {
            return 1.0;
        }

        let estimate_ranks = rankings::fractional(estimate);
        let truth_ranks = rankings::fractional(ground_truth);

        let mut squared_sum = 0.0;
        for (agent, rank) in &estimate_ranks {
            let Some(truth_rank) = truth_ranks.get(agent) else {
                continue;
            };
            let diff = rank - truth_rank;
            squared_sum += diff * diff;
        }

        let n = estimate_ranks.len() as f64;
        (2.0 - 6.0 * squared_sum / n / (n * n - 1.0)) / 2.0
    }

    fn boxed_clone(&self) -> Box<dyn Accuracy<T>> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(AgentId, f64)]) -> BTreeMap<AgentId, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_identical_order_scores_one() {
        let truth = map(&[(0, 0.9), (1, 0.5), (2, 0.1)]);
        let estimate = map(&[(0, 0.7), (1, 0.4), (2, 0.2)]);
        let mut metric = SpearmanFootrule::new();
        assert_eq!(metric.evaluate(&estimate, &truth), 1.0);
    }

    #[test]
    fn test_reversed_order_scores_zero() {
        let truth = map(&[(0, 0.9), (1, 0.5), (2, 0.1)]);
        let estimate = map(&[(0, 0.2), (1, 0.4), (2, 0.7)]);
        let mut metric = SpearmanFootrule::new();
        assert!(metric.evaluate(&estimate, &truth).abs() < 1e-12);
    }

    #[test]
    fn test_ties_share_fractional_ranks() {
        let truth = map(&[(0, 0.8), (1, 0.8), (2, 0.1)]);
        let estimate = map(&[(0, 0.6), (1, 0.6), (2, 0.2)]);
        let mut metric = SpearmanFootrule::new();
        // Both sides rank the tied agents 1.5 and the last agent 3.
        assert_eq!(metric.evaluate(&estimate, &truth), 1.0);
    }

    #[test]
    fn test_degenerate_sizes() {
        let mut metric = SpearmanFootrule::new();
        assert_eq!(metric.evaluate(&map(&[]), &map(&[(0, 0.4)])), 0.0);
        assert_eq!(metric.evaluate(&map(&[(0, 0.4)]), &map(&[(0, 0.4)])), 1.0);
    }
}
