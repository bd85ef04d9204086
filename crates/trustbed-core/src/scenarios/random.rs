//! The random baseline scenario.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trustbed_types::{
    AgentId, CapabilitySet, Experience, Opinion, Scenario, ScenarioCap, ScenarioError, ServiceId,
    Time,
};

use crate::matrix::RelationMatrix;
use crate::protocol::SetupError;
use crate::rng::EvalRng;
use crate::scenarios::{DeceptionKind, DeceptionModel};

/// The scenario family serves a single service.
pub(crate) const ONLY_SERVICE: ServiceId = 0;

/// Deception weights may miss 1 by at most this much.
const PMF_TOLERANCE: f64 = 0.001;

/// Parameters of the random scenario family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomParams {
    /// Number of agents, ids 0..agents.
    pub agents: usize,
    /// Standard deviation of interaction outcomes around capability.
    pub sd_experience: f64,
    /// Standard deviation of internal trust degrees around capability.
    pub sd_opinion: f64,
    /// Distribution the per-pair deception models are drawn from.
    pub deception_pmf: BTreeMap<DeceptionKind, f64>,
    /// Coefficient bound by positive exaggeration models.
    pub positive_kappa: f64,
    /// Coefficient bound by negative exaggeration models.
    pub negative_kappa: f64,
    /// Fraction of agents available as interaction partners.
    pub interaction_density: f64,
}

impl Default for RandomParams {
    fn default() -> Self {
        Self {
            agents: 10,
            sd_experience: 0.10,
            sd_opinion: 0.05,
            deception_pmf: [(DeceptionKind::Truthful, 1.0)].into_iter().collect(),
            positive_kappa: 0.25,
            negative_kappa: 0.25,
            interaction_density: 0.10,
        }
    }
}

impl RandomParams {
    fn invalid(reason: String) -> SetupError {
        SetupError::InvalidParameters {
            plugin: "random-scenario",
            reason,
        }
    }

    /// Rejects parameter combinations the generators cannot honor.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.agents < 1 {
            return Err(Self::invalid("agent count must be at least 1".into()));
        }
        for (label, sd) in [
            ("experience", self.sd_experience),
            ("opinion", self.sd_opinion),
        ] {
            if !sd.is_finite() || sd < 0.0 {
                return Err(Self::invalid(format!(
                    "{label} standard deviation must be non-negative, got {sd}"
                )));
            }
        }
        for (label, kappa) in [
            ("positive", self.positive_kappa),
            ("negative", self.negative_kappa),
        ] {
            if !kappa.is_finite() || !(0.0..=1.0).contains(&kappa) {
                return Err(Self::invalid(format!(
                    "{label} exaggeration coefficient must lie in [0, 1], got {kappa}"
                )));
            }
        }
        if !self.interaction_density.is_finite()
            || !(0.0..=1.0).contains(&self.interaction_density)
        {
            return Err(Self::invalid(format!(
                "interaction density must lie in [0, 1], got {}",
                self.interaction_density
            )));
        }
        if self
            .deception_pmf
            .values()
            .any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(Self::invalid(
                "deception weights must be non-negative".into(),
            ));
        }
        let total: f64 = self.deception_pmf.values().sum();
        if (total - 1.0).abs() > PMF_TOLERANCE {
            return Err(Self::invalid(format!(
                "deception weights must sum to 1, got {total}"
            )));
        }
        Ok(())
    }
}

/// Baseline scenario: one service, capabilities drawn once, full opinion
/// broadcast, one experience per tick.
///
/// Each agent's capability is a uniform draw fixed at construction; it doubles
/// as the ground truth. Every ordered pair of distinct agents gets a deception
/// model drawn from the configured distribution, also fixed for the whole run.
/// Opinions are truncated-normal samples around the target's capability pushed
/// through the pair's deception model. Experiences cycle through a partner
/// pool chosen once from the configured density.
pub struct RandomScenario {
    rng: EvalRng,
    time: Time,
    agents: Vec<AgentId>,
    capabilities: BTreeMap<AgentId, f64>,
    deception: RelationMatrix<DeceptionModel, ()>,
    partners: Vec<AgentId>,
    sd_experience: f64,
    sd_opinion: f64,
    confidence: f64,
}

impl RandomScenario {
    /// Builds the scenario, drawing capabilities, deception models and the
    /// partner pool from `rng`.
    pub fn new(params: RandomParams, mut rng: EvalRng) -> Result<Self, SetupError> {
        params.validate()?;

        let agents: Vec<AgentId> = (0..params.agents).collect();
        let mut capabilities = BTreeMap::new();
        for &agent in &agents {
            capabilities.insert(agent, rng.unit_uniform());
        }

        let mut deception = RelationMatrix::new();
        if let Some(&max) = agents.last() {
            deception.ensure_capacity(max);
        }
        for &source in &agents {
            for &target in &agents {
                if source == target {
                    continue;
                }
                if let Some(kind) = rng.from_weights(&params.deception_pmf) {
                    deception.set(
                        source,
                        target,
                        kind.model(params.positive_kappa, params.negative_kappa),
                    );
                }
            }
        }

        let partners = rng.choose_fraction(&agents, params.interaction_density);

        Ok(Self {
            rng,
            time: 0,
            agents,
            capabilities,
            deception,
            partners,
            sd_experience: params.sd_experience,
            sd_opinion: params.sd_opinion,
            confidence: (1.0 - params.sd_opinion).clamp(0.0, 1.0),
        })
    }

    /// Draws the opinion `source` communicates about `target`, if any.
    pub(crate) fn opinion_for(
        &mut self,
        source: AgentId,
        target: AgentId,
        service: ServiceId,
    ) -> Option<Opinion> {
        let model = *self.deception.get(source, target)?;
        if matches!(model, DeceptionModel::Silent) {
            return None;
        }
        let capability = *self.capabilities.get(&target)?;
        let sample = self.rng.unit_tnd(capability, self.sd_opinion);
        let degree = model.apply(sample, &mut self.rng)?;
        Some(Opinion::new(
            source,
            target,
            service,
            self.time,
            degree,
            self.confidence,
        ))
    }

    /// Draws the outcome of interacting with `agent`, if the agent exists.
    pub(crate) fn experience_with(
        &mut self,
        agent: AgentId,
        service: ServiceId,
    ) -> Option<Experience> {
        let capability = *self.capabilities.get(&agent)?;
        let outcome = self.rng.unit_tnd(capability, self.sd_experience);
        Some(Experience::new(agent, service, self.time, outcome))
    }
}

impl Scenario for RandomScenario {
    fn name(&self) -> &'static str {
        "random"
    }

    fn capabilities(&self) -> CapabilitySet<ScenarioCap> {
        CapabilitySet::empty()
    }

    fn set_current_time(&mut self, time: Time) {
        self.time = time;
    }

    fn agents(&self) -> Vec<AgentId> {
        self.agents.clone()
    }

    fn services(&self) -> Vec<ServiceId> {
        vec![ONLY_SERVICE]
    }

    fn generate_opinions(&mut self) -> Result<Vec<Opinion>, ScenarioError> {
        let mut opinions = Vec::new();
        // agents carry ids 0..n by construction
        let n = self.agents.len();
        for source in 0..n {
            for target in 0..n {
                if source == target {
                    continue;
                }
                if let Some(opinion) = self.opinion_for(source, target, ONLY_SERVICE) {
                    opinions.push(opinion);
                }
            }
        }
        Ok(opinions)
    }

    fn generate_experiences(&mut self) -> Result<Vec<Experience>, ScenarioError> {
        let mut experiences = Vec::new();
        if self.partners.is_empty() {
            return Ok(experiences);
        }
        let partner = self.partners[self.time as usize % self.partners.len()];
        if let Some(experience) = self.experience_with(partner, ONLY_SERVICE) {
            experiences.push(experience);
        }
        Ok(experiences)
    }

    fn ground_truth(&self, _service: ServiceId) -> BTreeMap<AgentId, f64> {
        self.capabilities.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_with_pmf(kind: DeceptionKind) -> RandomParams {
        RandomParams {
            agents: 4,
            deception_pmf: [(kind, 1.0)].into_iter().collect(),
            ..RandomParams::default()
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let cases = [
            RandomParams {
                agents: 0,
                ..RandomParams::default()
            },
            RandomParams {
                sd_opinion: -0.1,
                ..RandomParams::default()
            },
            RandomParams {
                positive_kappa: 1.5,
                ..RandomParams::default()
            },
            RandomParams {
                interaction_density: 1.1,
                ..RandomParams::default()
            },
            RandomParams {
                deception_pmf: [(DeceptionKind::Truthful, 0.9)].into_iter().collect(),
                ..RandomParams::default()
            },
            RandomParams {
                deception_pmf: [
                    (DeceptionKind::Truthful, 2.0),
                    (DeceptionKind::Silent, -1.0),
                ]
                .into_iter()
                .collect(),
                ..RandomParams::default()
            },
        ];
        for params in cases {
            let result = RandomScenario::new(params, EvalRng::seeded(1));
            assert!(matches!(
                result,
                Err(SetupError::InvalidParameters { .. })
            ));
        }
    }

    #[test]
    fn test_ground_truth_is_unit_bounded_and_service_independent() {
        let scenario =
            RandomScenario::new(RandomParams::default(), EvalRng::seeded(3)).unwrap();
        let truth = scenario.ground_truth(0);

        assert_eq!(truth.len(), 10);
        assert!(truth.values().all(|c| (0.0..=1.0).contains(c)));
        assert_eq!(truth, scenario.ground_truth(42));
    }

    #[test]
    fn test_truthful_broadcast_covers_every_ordered_pair() {
        let mut scenario =
            RandomScenario::new(params_with_pmf(DeceptionKind::Truthful), EvalRng::seeded(5))
                .unwrap();
        let opinions = scenario.generate_opinions().unwrap();

        assert_eq!(opinions.len(), 4 * 3);
        assert!(opinions.iter().all(|o| o.source != o.target));
        assert!(opinions.iter().all(|o| (0.0..=1.0).contains(&o.degree)));
        assert!(opinions.iter().all(|o| o.confidence == 1.0 - 0.05));
    }

    #[test]
    fn test_silent_agents_communicate_nothing() {
        let mut scenario =
            RandomScenario::new(params_with_pmf(DeceptionKind::Silent), EvalRng::seeded(5))
                .unwrap();
        assert!(scenario.generate_opinions().unwrap().is_empty());
    }

    #[test]
    fn test_complementary_opinions_invert_capability_exactly() {
        // zero spread pins the internal degree to the capability itself
        let params = RandomParams {
            sd_opinion: 0.0,
            ..params_with_pmf(DeceptionKind::Complementary)
        };
        let mut scenario = RandomScenario::new(params, EvalRng::seeded(8)).unwrap();
        let truth = scenario.ground_truth(0);

        for opinion in scenario.generate_opinions().unwrap() {
            let expected = 1.0 - truth[&opinion.target];
            assert!((opinion.degree - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_experiences_cycle_through_the_partner_pool() {
        let params = RandomParams {
            agents: 5,
            interaction_density: 1.0,
            ..RandomParams::default()
        };
        let mut scenario = RandomScenario::new(params, EvalRng::seeded(11)).unwrap();

        let mut seen = Vec::new();
        for time in 1..=5 {
            scenario.set_current_time(time);
            let experiences = scenario.generate_experiences().unwrap();
            assert_eq!(experiences.len(), 1);
            assert_eq!(experiences[0].time, time);
            seen.push(experiences[0].agent);
        }
        // full density cycles the whole pool before repeating
        let mut distinct = seen.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn test_zero_density_yields_no_experiences() {
        let params = RandomParams {
            interaction_density: 0.0,
            ..RandomParams::default()
        };
        let mut scenario = RandomScenario::new(params, EvalRng::seeded(2)).unwrap();
        scenario.set_current_time(1);
        assert!(scenario.generate_experiences().unwrap().is_empty());
    }

    #[test]
    fn test_same_seed_reproduces_the_run() {
        let run = |seed: u64| {
            let mut scenario =
                RandomScenario::new(RandomParams::default(), EvalRng::seeded(seed)).unwrap();
            let mut opinions = Vec::new();
            let mut experiences = Vec::new();
            for time in 1..=3 {
                scenario.set_current_time(time);
                opinions.extend(scenario.generate_opinions().unwrap());
                experiences.extend(scenario.generate_experiences().unwrap());
            }
            (opinions, experiences)
        };

        assert_eq!(run(13), run(13));
    }
}
