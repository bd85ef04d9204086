//! Pairwise ordering agreement.

use std::collections::BTreeMap;

use trustbed_types::{Accuracy, AgentId, Metric};

use crate::protocol::SetupError;
use crate::rankings::cmp_sign;

/// Ground-truth differences below this count as ties.
const TRUTH_EPSILON: f64 = 1e-5;

fn pair_agrees<T: PartialOrd>(est_a: &T, est_b: &T, truth_a: f64, truth_b: f64) -> bool {
    let rank_sign = cmp_sign(est_a, est_b);
    let cap_sign = if (truth_a - truth_b).abs() < TRUTH_EPSILON {
        0
    } else {
        cmp_sign(&truth_a, &truth_b)
    };
    (rank_sign >= 0 && cap_sign >= 0) || (rank_sign < 0 && cap_sign < 0)
}

/// Fraction of ordered estimate pairs whose relative order agrees with
/// ground truth.
///
/// A pair agrees when both differences point the same way, counting a tie
/// as "not lower". The tie rule is direction-asymmetric: a pair tied in
/// exactly one of the two maps agrees in one traversal direction and
/// disagrees in the other, contributing half. Ground-truth differences
/// below an epsilon count as ties. An empty estimate map scores 0, a
/// single estimate 1.
#[derive(Debug, Clone, Default)]
pub struct PairwiseAccuracy;

impl PairwiseAccuracy {
    /// Creates the metric.
    pub fn new() -> Self {
        Self
    }
}

impl Metric for PairwiseAccuracy {
    fn name(&self) -> &'static str {
        "pairwise-accuracy"
    }
}

impl<T: PartialOrd + 'static> Accuracy<T> for PairwiseAccuracy {
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

        let mut agreements = 0usize;
        for (agent_a, est_a) in estimate {
            for (agent_b, est_b) in estimate {
                if agent_a == agent_b {
                    continue;
                }
                let (Some(&truth_a), Some(&truth_b)) =
                    (ground_truth.get(agent_a), ground_truth.get(agent_b))
                else {
                    continue;
                };
                if pair_agrees(est_a, est_b, truth_a, truth_b) {
                    agreements += 1;
                }
            }
        }

        agreements as f64 / (estimate.len() * (estimate.len() - 1)) as f64
    }

    fn boxed_clone(&self) -> Box<dyn Accuracy<T>> {
        Box::new(self.clone())
    }
}

/// [`PairwiseAccuracy`] restricted to pairs touching a ground-truth band.
///
/// Only pairs where at least one agent's ground truth lies strictly inside
/// `(lower, upper)` are compared, and the score is the agreeing fraction of
/// those. Useful when only the ordering around a decision threshold
/// matters. Scores 0 when no pair qualifies.
#[derive(Debug, Clone)]
pub struct BoundedPairwiseAccuracy {
    lower: f64,
    upper: f64,
}

impl BoundedPairwiseAccuracy {
    /// Creates the metric over the band `(lower, upper)`.
    ///
    /// Both bounds must lie in [0, 1] and `lower` must be strictly below
    /// `upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, SetupError> {
        let invalid = |reason: String| SetupError::InvalidParameters {
            plugin: "bounded-pairwise-accuracy",
            reason,
        };
        if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) {
            return Err(invalid(format!(
                "bounds must lie within [0, 1], got {lower} and {upper}"
            )));
        }
        if lower >= upper {
            return Err(invalid(format!(
                "lower bound must be below upper bound, got {lower} >= {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    fn inside(&self, truth: f64) -> bool {
        self.lower < truth && truth < self.upper
    }
}

impl Metric for BoundedPairwiseAccuracy {
    fn name(&self) -> &'static str {
        "bounded-pairwise-accuracy"
    }
}

impl<T: PartialOrd + 'static> Accuracy<T> for BoundedPairwiseAccuracy {
    fn evaluate(
        &mut self,
        estimate: &BTreeMap<AgentId, T>,
        ground_truth: &BTreeMap<AgentId, f64>,
    ) -> f64 {
        let mut agreements = 0usize;
        let mut compared = 0usize;
        for (agent_a, est_a) in estimate {
            for (agent_b, est_b) in estimate {
                if agent_a == agent_b {
                    continue;
                }
                let (Some(&truth_a), Some(&truth_b)) =
                    (ground_truth.get(agent_a), ground_truth.get(agent_b))
                else {
                    continue;
                };
                if !self.inside(truth_a) && !self.inside(truth_b) {
                    continue;
                }
                compared += 1;
                if pair_agrees(est_a, est_b, truth_a, truth_b) {
                    agreements += 1;
                }
            }
        }

        if compared == 0 {
            return 0.0;
        }
        agreements as f64 / compared as f64
    }

    fn boxed_clone(&self) -> Box<dyn Accuracy<T>> {
        Box::new(self.clone())
    }
}
