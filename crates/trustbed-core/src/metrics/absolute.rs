//! Mean absolute estimation error.

use std::collections::BTreeMap;

use trustbed_types::{Accuracy, AgentId, Metric};

/// Mean absolute difference between numeric estimates and ground truth.
///
/// Inverted relative to the rank metrics: 0 is a perfect estimate and
/// larger is worse. The sum runs over the estimate's agents but is divided
/// by the ground-truth population, so missing estimates dilute rather than
/// hide. An empty estimate map scores positive infinity.
#[derive(Debug, Clone, Default)]
pub struct AbsoluteError;

impl AbsoluteError {
    /// Creates the metric.
    pub fn new() -> Self {
        Self
    }
}

impl Metric for AbsoluteError {
    fn name(&self) -> &'static str {
        "absolute-error"
    }
}

impl Accuracy<f64> for AbsoluteError {
    fn evaluate(
        &mut self,
        estimate: &BTreeMap<AgentId, f64>,
        ground_truth: &BTreeMap<AgentId, f64>,
    ) -> f64 {
        if estimate.is_empty() {
            return f64::INFINITY;
        }
        if ground_truth.is_empty() {
            return 0.0;
        }

        let sum: f64 = estimate
            .iter()
            .filter_map(|(agent, est)| ground_truth.get(agent).map(|truth| (truth - est).abs()))
            .sum();
        sum / ground_truth.len() as f64
    }

    fn boxed_clone(&self) -> Box<dyn Accuracy<f64>> {
        Box::new(self.clone())
    }
}
