//! Averaging model that also asks for opinions.

use std::collections::BTreeMap;

use trustbed_types::{
    AgentId, CapabilitySet, Experience, ModelCap, Opinion, OpinionRequest, ServiceId, Time,
    TrustModel,
};

use super::averaging::EXPERIENCE_SATURATION;
use super::AveragingWithPartners;

/// [`AveragingWithPartners`] extended with opinion requests.
///
/// An agent stays under scrutiny until three experiences with it have been
/// collected; for each such agent the model requests opinions from every
/// other agent, on every known service.
pub struct AveragingWithProviders {
    inner: AveragingWithPartners,
    agents: Vec<AgentId>,
    services: Vec<ServiceId>,
}

impl AveragingWithProviders {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self {
            inner: AveragingWithPartners::new(),
            agents: Vec::new(),
            services: Vec::new(),
        }
    }
}

impl Default for AveragingWithProviders {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustModel for AveragingWithProviders {
    type Score = f64;

    fn name(&self) -> &'static str {
        "averaging-with-providers"
    }

    fn capabilities(&self) -> CapabilitySet<ModelCap> {
        [
            ModelCap::SelectsInteractionPartners,
            ModelCap::SelectsOpinionProviders,
        ]
        .into_iter()
        .collect()
    }

    fn set_current_time(&mut self, time: Time) {
        self.inner.set_current_time(time);
    }

    fn set_agents(&mut self, agents: &[AgentId]) {
        self.agents = agents.to_vec();
        self.inner.set_agents(agents);
    }

    fn set_services(&mut self, services: &[ServiceId]) {
        self.services = services.to_vec();
        self.inner.set_services(services);
    }

    fn process_opinions(&mut self, opinions: &[Opinion]) {
        self.inner.process_opinions(opinions);
    }

    fn process_experiences(&mut self, experiences: &[Experience]) {
        self.inner.process_experiences(experiences);
    }

    fn calculate_trust(&mut self) {
        self.inner.calculate_trust();
    }

    fn trust(&self, service: ServiceId) -> BTreeMap<AgentId, f64> {
        self.inner.trust(service)
    }

    fn interaction_partners(&mut self, services: &[ServiceId]) -> BTreeMap<ServiceId, AgentId> {
        self.inner.interaction_partners(services)
    }

    fn opinion_requests(&mut self) -> Vec<OpinionRequest> {
        let mut requests = Vec::new();
        for &service in &self.services {
            for &target in &self.agents {
                if self.inner.inner().experience_count(target) >= EXPERIENCE_SATURATION {
                    continue;
                }
                for &source in &self.agents {
                    if source != target {
                        requests.push(OpinionRequest::new(source, target, service));
                    }
                }
            }
        }
        requests
    }
}
