//! Random scenario that lets the model pick interaction partners.

use std::collections::BTreeMap;

use trustbed_types::{
    AgentId, CapabilitySet, Experience, Opinion, Scenario, ScenarioCap, ScenarioError, ServiceId,
    Time,
};

use crate::protocol::SetupError;
use crate::rng::EvalRng;
use crate::scenarios::random::{RandomParams, RandomScenario};

/// [`RandomScenario`] that defers partner choice to the trust model.
///
/// Experiences come only from the partner map supplied through
/// `set_interaction_partners`; the scenario's own partner pool is unused.
/// Services without a mapped partner, and partners naming unknown agents,
/// produce no experience. A step before any map has arrived is an error.
pub struct RandomWithPartners {
    inner: RandomScenario,
    partners: Option<BTreeMap<ServiceId, AgentId>>,
}

impl RandomWithPartners {
    /// Builds the scenario on top of the base generators.
    pub fn new(params: RandomParams, rng: EvalRng) -> Result<Self, SetupError> {
        Ok(Self {
            inner: RandomScenario::new(params, rng)?,
            partners: None,
        })
    }

    pub(crate) fn base_mut(&mut self) -> &mut RandomScenario {
        &mut self.inner
    }
}

impl Scenario for RandomWithPartners {
    fn name(&self) -> &'static str {
        "random-with-partners"
    }

    fn capabilities(&self) -> CapabilitySet<ScenarioCap> {
        CapabilitySet::empty().with(ScenarioCap::AcceptsInteractionPartners)
    }

    fn set_current_time(&mut self, time: Time) {
        self.inner.set_current_time(time);
    }

    fn agents(&self) -> Vec<AgentId> {
        self.inner.agents()
    }

    fn services(&self) -> Vec<ServiceId> {
        self.inner.services()
    }

    fn generate_opinions(&mut self) -> Result<Vec<Opinion>, ScenarioError> {
        self.inner.generate_opinions()
    }

    fn generate_experiences(&mut self) -> Result<Vec<Experience>, ScenarioError> {
        let Some(partners) = &self.partners else {
            return Err(ScenarioError::MissingPartners {
                service: self.inner.services().first().copied().unwrap_or(0),
            });
        };
        let mut experiences = Vec::new();
        for service in self.inner.services() {
            let Some(&agent) = partners.get(&service) else {
                continue;
            };
            if let Some(experience) = self.inner.experience_with(agent, service) {
                experiences.push(experience);
            }
        }
        Ok(experiences)
    }

    fn ground_truth(&self, service: ServiceId) -> BTreeMap<AgentId, f64> {
        self.inner.ground_truth(service)
    }

    fn set_interaction_partners(&mut self, partners: &BTreeMap<ServiceId, AgentId>) {
        self.partners = Some(partners.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> RandomWithPartners {
        RandomWithPartners::new(RandomParams::default(), EvalRng::seeded(21)).unwrap()
    }

    #[test]
    fn test_step_before_any_partner_map_is_an_error() {
        let mut scenario = scenario();
        scenario.set_current_time(1);

        let result = scenario.generate_experiences();
        assert!(matches!(
            result,
            Err(ScenarioError::MissingPartners { service: 0 })
        ));
    }

    #[test]
    fn test_experience_comes_from_the_chosen_partner() {
        let mut scenario = scenario();
        scenario.set_current_time(1);
        scenario.set_interaction_partners(&[(0, 3)].into_iter().collect());

        let experiences = scenario.generate_experiences().unwrap();
        assert_eq!(experiences.len(), 1);
        assert_eq!(experiences[0].agent, 3);
        assert_eq!(experiences[0].service, 0);
    }

    #[test]
    fn test_unmapped_service_and_unknown_agent_are_skipped() {
        let mut scenario = scenario();
        scenario.set_current_time(1);

        // partner for a service this scenario does not serve
        scenario.set_interaction_partners(&[(9, 3)].into_iter().collect());
        assert!(scenario.generate_experiences().unwrap().is_empty());

        // partner naming an agent outside the population
        scenario.set_interaction_partners(&[(0, 99)].into_iter().collect());
        assert!(scenario.generate_experiences().unwrap().is_empty());
    }

    #[test]
    fn test_opinions_still_broadcast() {
        let mut scenario = scenario();
        scenario.set_current_time(1);

        let opinions = scenario.generate_opinions().unwrap();
        assert_eq!(opinions.len(), 10 * 9);
    }

    #[test]
    fn test_last_partner_map_stays_in_effect() {
        let mut scenario = scenario();
        scenario.set_current_time(1);
        scenario.set_interaction_partners(&[(0, 2)].into_iter().collect());
        scenario.generate_experiences().unwrap();

        // next tick without a fresh map reuses the previous one
        scenario.set_current_time(2);
        let experiences = scenario.generate_experiences().unwrap();
        assert_eq!(experiences[0].agent, 2);
    }
}
