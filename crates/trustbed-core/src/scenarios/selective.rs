//! Random scenario that only answers requested opinions.

use std::collections::BTreeMap;

use trustbed_types::{
    AgentId, CapabilitySet, Experience, Opinion, OpinionRequest, Scenario, ScenarioCap,
    ScenarioError, ServiceId, Time,
};

use crate::protocol::SetupError;
use crate::rng::EvalRng;
use crate::scenarios::partners::RandomWithPartners;
use crate::scenarios::random::RandomParams;

/// [`RandomWithPartners`] that additionally defers opinion gathering.
///
/// Instead of broadcasting, opinions are drawn only for the requested
/// (source, target) pairs, stamped with the requested service. Pairs whose
/// deception model is silent, and pairs the scenario never assigned a model
/// (self-pairs, unknown agents), yield nothing. A step before any request
/// list has arrived is an error.
pub struct RandomSelective {
    inner: RandomWithPartners,
    requests: Option<Vec<OpinionRequest>>,
}

impl RandomSelective {
    /// Builds the scenario on top of the base generators.
    pub fn new(params: RandomParams, rng: EvalRng) -> Result<Self, SetupError> {
        Ok(Self {
            inner: RandomWithPartners::new(params, rng)?,
            requests: None,
        })
    }
}

impl Scenario for RandomSelective {
    fn name(&self) -> &'static str {
        "random-selective"
    }

    fn capabilities(&self) -> CapabilitySet<ScenarioCap> {
        [
            ScenarioCap::AcceptsInteractionPartners,
            ScenarioCap::AcceptsOpinionRequests,
        ]
        .into_iter()
        .collect()
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
        let Some(requests) = &self.requests else {
            return Err(ScenarioError::MissingRequests);
        };
        let mut opinions = Vec::new();
        for request in requests {
            if let Some(opinion) =
                self.inner
                    .base_mut()
                    .opinion_for(request.source, request.target, request.service)
            {
                opinions.push(opinion);
            }
        }
        Ok(opinions)
    }

    fn generate_experiences(&mut self) -> Result<Vec<Experience>, ScenarioError> {
        self.inner.generate_experiences()
    }

    fn ground_truth(&self, service: ServiceId) -> BTreeMap<AgentId, f64> {
        self.inner.ground_truth(service)
    }

    fn set_interaction_partners(&mut self, partners: &BTreeMap<ServiceId, AgentId>) {
        self.inner.set_interaction_partners(partners);
    }

    fn set_opinion_requests(&mut self, requests: &[OpinionRequest]) {
        self.requests = Some(requests.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::DeceptionKind;

    fn scenario_with(kind: DeceptionKind) -> RandomSelective {
        let params = RandomParams {
            agents: 4,
            deception_pmf: [(kind, 1.0)].into_iter().collect(),
            ..RandomParams::default()
        };
        RandomSelective::new(params, EvalRng::seeded(33)).unwrap()
    }

    #[test]
    fn test_step_before_any_request_list_is_an_error() {
        let mut scenario = scenario_with(DeceptionKind::Truthful);
        scenario.set_current_time(1);

        let result = scenario.generate_opinions();
        assert!(matches!(result, Err(ScenarioError::MissingRequests)));
    }

    #[test]
    fn test_only_requested_pairs_answer() {
        let mut scenario = scenario_with(DeceptionKind::Truthful);
        scenario.set_current_time(1);
        scenario.set_opinion_requests(&[
            OpinionRequest::new(0, 1, 0),
            OpinionRequest::new(2, 3, 0),
        ]);

        let opinions = scenario.generate_opinions().unwrap();
        let pairs: Vec<(AgentId, AgentId)> =
            opinions.iter().map(|o| (o.source, o.target)).collect();
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_requested_service_is_echoed() {
        let mut scenario = scenario_with(DeceptionKind::Truthful);
        scenario.set_current_time(1);
        scenario.set_opinion_requests(&[OpinionRequest::new(0, 1, 7)]);

        let opinions = scenario.generate_opinions().unwrap();
        assert_eq!(opinions[0].service, 7);
    }

    #[test]
    fn test_silent_pairs_ignore_requests() {
        let mut scenario = scenario_with(DeceptionKind::Silent);
        scenario.set_current_time(1);
        scenario.set_opinion_requests(&[OpinionRequest::new(0, 1, 0)]);

        assert!(scenario.generate_opinions().unwrap().is_empty());
    }

    #[test]
    fn test_self_and_unknown_pairs_yield_nothing() {
        let mut scenario = scenario_with(DeceptionKind::Truthful);
        scenario.set_current_time(1);
        scenario.set_opinion_requests(&[
            OpinionRequest::new(1, 1, 0),
            OpinionRequest::new(0, 99, 0),
        ]);

        assert!(scenario.generate_opinions().unwrap().is_empty());
    }

    #[test]
    fn test_experiences_still_require_a_partner_map() {
        let mut scenario = scenario_with(DeceptionKind::Truthful);
        scenario.set_current_time(1);

        let result = scenario.generate_experiences();
        assert!(matches!(result, Err(ScenarioError::MissingPartners { .. })));

        scenario.set_interaction_partners(&[(0, 2)].into_iter().collect());
        let experiences = scenario.generate_experiences().unwrap();
        assert_eq!(experiences[0].agent, 2);
    }
}
