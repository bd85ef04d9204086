//! Kendall's tau-a rank correlation.

use std::collections::BTreeMap;

use trustbed_types::{Accuracy, AgentId, Metric};

use crate::rankings::cmp_sign;

/// Kendall's tau-a between an estimate map and ground truth, shifted onto
/// [0, 1].
///
/// Walks every unordered pair of ground-truth agents for which both
/// estimates exist; a pair is concordant when estimate and truth order it
/// the same way. The pair count in the denominator comes from the truth
/// map, so agents the model has no estimate for depress the score. An empty
/// estimate map scores 0, one too small to form a pair scores 1.
#[derive(Debug, Clone, Default)]
pub struct KendallsTauA;

impl KendallsTauA {
    /// Creates the metric.
    pub fn new() -> Self {
        Self
    }
}

impl Metric for KendallsTauA {
    fn name(&self) -> &'static str {
        "kendalls-tau-a"
    }
}

impl<T: PartialOrd + 'static> Accuracy<T> for KendallsTauA {
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
        let pair_count = ground_truth.len() * (ground_truth.len() - 1) / 2;
        if pair_count == 0 {
            return 1.0;
        }

        let truth: Vec<(AgentId, f64)> = ground_truth.iter().map(|(a, t)| (*a, *t)).collect();
        let mut concordant: i64 = 0;
        let mut discordant: i64 = 0;
        for (i, &(agent_a, truth_a)) in truth.iter().enumerate() {
            for &(agent_b, truth_b) in &truth[i + 1..] {
                let (Some(est_a), Some(est_b)) = (estimate.get(&agent_a), estimate.get(&agent_b))
                else {
                    continue;
                };
                let product = cmp_sign(est_a, est_b) * cmp_sign(&truth_a, &truth_b);
                if product > 0 {
                    concordant += 1;
                } else if product < 0 {
                    discordant += 1;
                }
            }
        }

        let tau = (concordant - discordant) as f64 / pair_count as f64;
        (tau + 1.0) / 2.0
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
    fn test_perfect_agreement_scores_one() {
        let truth = map(&[(0, 0.9), (1, 0.5), (2, 0.1)]);
        let estimate = map(&[(0, 3.0), (1, 2.0), (2, 1.0)]);
        let mut metric = KendallsTauA::new();
        assert_eq!(metric.evaluate(&estimate, &truth), 1.0);
    }

    #[test]
    fn test_reversed_order_scores_zero() {
        let truth = map(&[(0, 0.9), (1, 0.5), (2, 0.1)]);
        let estimate = map(&[(0, 1.0), (1, 2.0), (2, 3.0)]);
        let mut metric = KendallsTauA::new();
        assert_eq!(metric.evaluate(&estimate, &truth), 0.0);
    }

    #[test]
    fn test_missing_estimates_depress_the_score() {
        let truth = map(&[(0, 0.9), (1, 0.5), (2, 0.1)]);
        // Only one of the three truth pairs has both estimates, and it is
        // concordant: tau = 1/3, shifted to 2/3.
        let estimate = map(&[(0, 2.0), (1, 1.0)]);
        let mut metric = KendallsTauA::new();
        assert!((metric.evaluate(&estimate, &truth) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_sizes() {
        let mut metric = KendallsTauA::new();
        assert_eq!(metric.evaluate(&map(&[]), &map(&[(0, 0.5)])), 0.0);
        assert_eq!(metric.evaluate(&map(&[(0, 1.0)]), &map(&[(0, 0.5)])), 1.0);
    }

    #[test]
    fn test_works_over_integer_scores() {
        let truth = map(&[(0, 0.9), (1, 0.1)]);
        let mut estimate = BTreeMap::new();
        estimate.insert(0, 10u32);
        estimate.insert(1, 2u32);
        let mut metric = KendallsTauA::new();
        assert_eq!(metric.evaluate(&estimate, &truth), 1.0);
    }
}
