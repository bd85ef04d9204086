//! Protocol selection.

use trustbed_types::{CapabilitySet, MetricCap, ModelCap, Scenario, ScenarioCap, TrustModel};

use super::{
    DecisionsModeA, DecisionsModeB, EvaluationProtocol, MetricSet, NoDecisions, SetupError,
};
use crate::validate::CapabilityRegistry;

/// The protocol variants, in the order candidates are tried.
///
/// Exact capability matching makes the variants mutually exclusive, so the
/// order never changes which variant wins; it only fixes the iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    NoDecisions,
    ModeA,
    ModeB,
}

const CANDIDATES: [Variant; 3] = [Variant::NoDecisions, Variant::ModeA, Variant::ModeB];

impl Variant {
    fn model_requirements(self) -> CapabilitySet<ModelCap> {
        match self {
            Variant::NoDecisions => CapabilitySet::empty(),
            Variant::ModeA => CapabilitySet::empty().with(ModelCap::SelectsInteractionPartners),
            Variant::ModeB => CapabilitySet::empty()
                .with(ModelCap::SelectsInteractionPartners)
                .with(ModelCap::SelectsOpinionProviders),
        }
    }

    fn scenario_requirements(self) -> CapabilitySet<ScenarioCap> {
        match self {
            Variant::NoDecisions => CapabilitySet::empty(),
            Variant::ModeA => {
                CapabilitySet::empty().with(ScenarioCap::AcceptsInteractionPartners)
            }
            Variant::ModeB => CapabilitySet::empty()
                .with(ScenarioCap::AcceptsInteractionPartners)
                .with(ScenarioCap::AcceptsOpinionRequests),
        }
    }

    fn metric_requirements(self) -> &'static [MetricCap] {
        match self {
            Variant::NoDecisions => &[MetricCap::Accuracy],
            Variant::ModeA => &[MetricCap::Accuracy, MetricCap::Utility],
            Variant::ModeB => &[
                MetricCap::Accuracy,
                MetricCap::Utility,
                MetricCap::OpinionCost,
            ],
        }
    }
}

/// Picks the protocol variant whose requirements the supplied plugins match
/// exactly, and wires it.
///
/// A validator mismatch is "try the next candidate", not an error; only
/// exhausting every candidate raises [`SetupError::NoProtocol`]. Selection
/// is deterministic: the same capability declarations always resolve to the
/// same variant.
#[derive(Debug, Clone, Default)]
pub struct ProtocolFactory {
    registry: CapabilityRegistry,
}

impl ProtocolFactory {
    /// Creates a factory over a capability registry.
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self { registry }
    }

    /// Resolves and wires the protocol for a (model, scenario, metrics)
    /// triple.
    pub fn resolve<M, S>(
        &self,
        model: M,
        scenario: S,
        metrics: MetricSet<M::Score>,
    ) -> Result<Box<dyn EvaluationProtocol>, SetupError>
    where
        M: TrustModel + 'static,
        S: Scenario + 'static,
    {
        let model_caps = model.capabilities();
        let scenario_caps = scenario.capabilities();
        let metric_caps = metrics.capabilities();

        let chosen = CANDIDATES.into_iter().find(|variant| {
            self.registry
                .model_matches(&model_caps, &variant.model_requirements())
                && self
                    .registry
                    .scenario_matches(&scenario_caps, &variant.scenario_requirements())
                && self
                    .registry
                    .metrics_match(&metric_caps, variant.metric_requirements())
        });

        let no_protocol = SetupError::NoProtocol {
            model: model.name(),
            scenario: scenario.name(),
            metrics: metrics.names(),
        };
        let Some(variant) = chosen else {
            return Err(no_protocol);
        };

        let (accuracy, utility, opinion_cost) = metrics.into_parts();
        match (variant, accuracy, utility, opinion_cost) {
            (Variant::NoDecisions, Some(accuracy), None, None) => {
                Ok(Box::new(NoDecisions::new(model, scenario, accuracy)))
            }
            (Variant::ModeA, Some(accuracy), Some(utility), None) => Ok(Box::new(
                DecisionsModeA::new(model, scenario, accuracy, utility),
            )),
            (Variant::ModeB, Some(accuracy), Some(utility), Some(opinion_cost)) => Ok(Box::new(
                DecisionsModeB::new(model, scenario, accuracy, utility, opinion_cost),
            )),
            _ => Err(no_protocol),
        }
    }
}
