//! Capability matching between plugins and protocol requirements.
//!
//! A protocol variant states the capability tags its trust model and
//! scenario must declare; the validator checks the declaration against the
//! full registry of known tags, so a plugin declaring an *extra* capability
//! fails the match just like one missing a required capability. That
//! strictness is what keeps protocol selection unambiguous: a model that
//! can pick partners must never be driven by the variant that ignores
//! partner selection. Metric sets are matched by coverage instead, one
//! distinct metric per required score kind.

use trustbed_types::{CapabilitySet, MetricCap, ModelCap, ScenarioCap};

/// The known capability tags, constructed once at setup and handed to the
/// protocol factory.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    model_tags: Vec<ModelCap>,
    scenario_tags: Vec<ScenarioCap>,
    metric_tags: Vec<MetricCap>,
}

impl CapabilityRegistry {
    /// Registry of every tag the built-in protocols understand.
    pub fn standard() -> Self {
        Self {
            model_tags: ModelCap::all().to_vec(),
            scenario_tags: ScenarioCap::all().to_vec(),
            metric_tags: MetricCap::all().to_vec(),
        }
    }

    /// Exact match of a trust model's declared tags against a requirement:
    /// for every registered tag, declared iff required.
    pub fn model_matches(
        &self,
        declared: &CapabilitySet<ModelCap>,
        required: &CapabilitySet<ModelCap>,
    ) -> bool {
        self.model_tags
            .iter()
            .all(|&tag| declared.contains(tag) == required.contains(tag))
    }

    /// Exact match of a scenario's declared tags against a requirement.
    pub fn scenario_matches(
        &self,
        declared: &CapabilitySet<ScenarioCap>,
        required: &CapabilitySet<ScenarioCap>,
    ) -> bool {
        self.scenario_tags
            .iter()
            .all(|&tag| declared.contains(tag) == required.contains(tag))
    }

    /// Matches a metric set against required score kinds: the counts must
    /// agree, every required kind must be registered, and each requirement
    /// must be covered by a distinct metric.
    pub fn metrics_match(
        &self,
        declared: &[CapabilitySet<MetricCap>],
        required: &[MetricCap],
    ) -> bool {
        if declared.len() != required.len() {
            return false;
        }
        let mut used = vec![false; declared.len()];
        for &tag in required {
            if !self.metric_tags.contains(&tag) {
                return false;
            }
            let free = declared
                .iter()
                .enumerate()
                .find(|(i, caps)| !used[*i] && caps.contains(tag));
            match free {
                Some((i, _)) => used[i] = true,
                None => return false,
            }
        }
        true
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partner_selection() -> CapabilitySet<ModelCap> {
        CapabilitySet::empty().with(ModelCap::SelectsInteractionPartners)
    }

    #[test]
    fn test_model_match_is_exact() {
        let registry = CapabilityRegistry::standard();
        let declared = partner_selection();

        assert!(registry.model_matches(&declared, &partner_selection()));
        // Declaring a capability the requirement forbids fails the match.
        assert!(!registry.model_matches(&declared, &CapabilitySet::empty()));
        // So does missing a required one.
        assert!(!registry.model_matches(
            &declared,
            &partner_selection().with(ModelCap::SelectsOpinionProviders),
        ));
    }

    #[test]
    fn test_scenario_match_is_exact() {
        let registry = CapabilityRegistry::standard();
        let declared = CapabilitySet::empty().with(ScenarioCap::AcceptsInteractionPartners);

        assert!(registry.scenario_matches(&declared, &declared));
        assert!(!registry.scenario_matches(&declared, &CapabilitySet::empty()));
    }

    #[test]
    fn test_metric_match_requires_equal_counts() {
        let registry = CapabilityRegistry::standard();
        let accuracy = CapabilitySet::empty().with(MetricCap::Accuracy);

        assert!(registry.metrics_match(&[accuracy.clone()], &[MetricCap::Accuracy]));
        assert!(!registry.metrics_match(
            &[accuracy.clone()],
            &[MetricCap::Accuracy, MetricCap::Utility],
        ));
        assert!(!registry.metrics_match(
            &[accuracy.clone(), accuracy],
            &[MetricCap::Accuracy],
        ));
    }

    #[test]
    fn test_metric_match_needs_distinct_cover() {
        let registry = CapabilityRegistry::standard();
        let accuracy = CapabilitySet::empty().with(MetricCap::Accuracy);
        let utility = CapabilitySet::empty().with(MetricCap::Utility);

        assert!(registry.metrics_match(
            &[utility.clone(), accuracy.clone()],
            &[MetricCap::Accuracy, MetricCap::Utility],
        ));
        // Two accuracy metrics cannot stand in for accuracy + utility.
        assert!(!registry.metrics_match(
            &[accuracy.clone(), accuracy],
            &[MetricCap::Accuracy, MetricCap::Utility],
        ));
    }
}
