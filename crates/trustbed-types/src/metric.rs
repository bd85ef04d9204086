//! Metric contracts
//!
//! Metrics are pure scorers. They come in three kinds with different
//! evaluate signatures: accuracy scores a whole estimate map, utility
//! scores one chosen partner, opinion-cost scores a tick's request list.
//! All three are boxed-cloneable so the engine can mint one long-lived
//! instance per service from a single validated prototype.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tuples::OpinionRequest;
use crate::{AgentId, ServiceId};

/// Stable identity of a metric class, derived from its name.
///
/// Two metrics registered in the same run must have distinct names; the
/// identifier is the 64-bit FNV-1a hash of the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MetricId(u64);

impl MetricId {
    /// Derives the identifier for a metric name.
    pub fn of(name: &str) -> Self {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in name.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        MetricId(hash)
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Base contract shared by all metric kinds.
pub trait Metric {
    /// Human-readable metric name, used in errors, exports and identity.
    fn name(&self) -> &'static str;

    /// Stable per-class identifier keying results and cached instances.
    fn id(&self) -> MetricId {
        MetricId::of(self.name())
    }
}

/// Scores a whole trust-estimate map against ground truth.
///
/// Generic over the model's score type; most accuracy metrics only compare
/// scores pairwise and thus implement this for every `T: PartialOrd`.
pub trait Accuracy<T>: Metric {
    /// Scores `estimate` against `ground_truth`, updating internal state.
    fn evaluate(
        &mut self,
        estimate: &BTreeMap<AgentId, T>,
        ground_truth: &BTreeMap<AgentId, f64>,
    ) -> f64;

    /// Clones this metric into a fresh boxed instance.
    fn boxed_clone(&self) -> Box<dyn Accuracy<T>>;
}

/// Scores the interaction partner chosen for one service.
pub trait Utility: Metric {
    /// Scores the choice of `agent` given the service's ground truth.
    fn evaluate(&mut self, ground_truth: &BTreeMap<AgentId, f64>, agent: AgentId) -> f64;

    /// Clones this metric into a fresh boxed instance.
    fn boxed_clone(&self) -> Box<dyn Utility>;
}

/// Scores the cost of a tick's opinion requests.
pub trait OpinionCost: Metric {
    /// Scores `requests` against the tick's agents and services.
    fn evaluate(
        &mut self,
        agents: &[AgentId],
        services: &[ServiceId],
        requests: &[OpinionRequest],
    ) -> f64;

    /// Clones this metric into a fresh boxed instance.
    fn boxed_clone(&self) -> Box<dyn OpinionCost>;
}

impl<T> Clone for Box<dyn Accuracy<T>> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

impl Clone for Box<dyn Utility> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

impl Clone for Box<dyn OpinionCost> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_id_is_stable() {
        assert_eq!(MetricId::of("kendalls-tau-a"), MetricId::of("kendalls-tau-a"));
    }

    #[test]
    fn test_metric_id_distinguishes_names() {
        assert_ne!(MetricId::of("kendalls-tau-a"), MetricId::of("pairwise-accuracy"));
        assert_ne!(MetricId::of("utility"), MetricId::of("opinion-cost"));
    }

    #[test]
    fn test_metric_id_display_is_hex() {
        let id = MetricId::of("absolute-error");
        let shown = id.to_string();
        assert_eq!(shown.len(), 16);
        assert!(shown.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
