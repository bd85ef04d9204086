//! Utility of chosen interaction partners.

use std::collections::BTreeMap;

use trustbed_types::{AgentId, Metric, Utility};

/// Ratio of accumulated obtained capability to accumulated maximal
/// capability, across the whole run.
///
/// Each evaluation adds the chosen agent's ground-truth capability to the
/// obtained total and the tick's best capability to the maximal total, then
/// reports their ratio; 1 means the model always picked a best partner. The
/// totals are the per-service instance state, so early mistakes keep
/// weighing on later ticks.
#[derive(Debug, Clone, Default)]
pub struct CumulativeNormalizedUtility {
    obtained: f64,
    maximal: f64,
}

impl CumulativeNormalizedUtility {
    /// Creates the metric with empty totals.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for CumulativeNormalizedUtility {
    fn name(&self) -> &'static str {
        "cumulative-normalized-utility"
    }
}

impl Utility for CumulativeNormalizedUtility {
    fn evaluate(&mut self, ground_truth: &BTreeMap<AgentId, f64>, agent: AgentId) -> f64 {
        let obtained = ground_truth.get(&agent).copied().unwrap_or(0.0);
        let maximal = ground_truth.values().copied().fold(0.0, f64::max);

        self.obtained += obtained;
        self.maximal += maximal;

        if self.maximal == 0.0 {
            return 0.0;
        }
        self.obtained / self.maximal
    }

    fn boxed_clone(&self) -> Box<dyn Utility> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truth() -> BTreeMap<AgentId, f64> {
        [(0, 1.0), (1, 0.5), (2, 0.0)].into_iter().collect()
    }

    #[test]
    fn test_best_choice_scores_one() {
        let mut metric = CumulativeNormalizedUtility::new();
        assert_eq!(metric.evaluate(&truth(), 0), 1.0);
    }

    #[test]
    fn test_totals_accumulate_across_ticks() {
        let mut metric = CumulativeNormalizedUtility::new();
        assert_eq!(metric.evaluate(&truth(), 1), 0.5);
        // Picking the best afterwards cannot erase the earlier miss:
        // (0.5 + 1.0) / (1.0 + 1.0).
        assert_eq!(metric.evaluate(&truth(), 0), 0.75);
        assert_eq!(metric.evaluate(&truth(), 0), (0.5 + 2.0) / 3.0);
    }

    #[test]
    fn test_unknown_agent_obtains_nothing() {
        let mut metric = CumulativeNormalizedUtility::new();
        assert_eq!(metric.evaluate(&truth(), 99), 0.0);
    }

    #[test]
    fn test_empty_truth_scores_zero() {
        let mut metric = CumulativeNormalizedUtility::new();
        assert_eq!(metric.evaluate(&BTreeMap::new(), 0), 0.0);
    }

    #[test]
    fn test_clone_starts_from_current_state() {
        let mut metric = CumulativeNormalizedUtility::new();
        metric.evaluate(&truth(), 1);
        let mut cloned = metric.boxed_clone();
        assert_eq!(cloned.evaluate(&truth(), 0), 0.75);
    }
}
