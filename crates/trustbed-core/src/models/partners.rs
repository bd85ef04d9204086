//! Averaging model that also picks interaction partners.

use std::collections::BTreeMap;

use trustbed_types::{
    AgentId, CapabilitySet, Experience, ModelCap, Opinion, ServiceId, Time, TrustModel,
};

use super::Averaging;

/// [`Averaging`] extended with partner selection.
///
/// For each requested service the model names the agent with the highest
/// current estimate, recomputing estimates first so opinions received this
/// tick already count. Ties go to the lowest agent id; with no estimates at
/// all (the first tick) agent 0 is named.
pub struct AveragingWithPartners {
    inner: Averaging,
}

impl AveragingWithPartners {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self {
            inner: Averaging::new(),
        }
    }

    pub(crate) fn inner(&self) -> &Averaging {
        &self.inner
    }

    pub(crate) fn best_agent(&mut self) -> AgentId {
        self.inner.recompute();
        let mut best: Option<(AgentId, f64)> = None;
        for (&agent, &estimate) in self.inner.estimates() {
            match best {
                Some((_, current)) if estimate <= current => {}
                _ => best = Some((agent, estimate)),
            }
        }
        best.map_or(0, |(agent, _)| agent)
    }
}

impl Default for AveragingWithPartners {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustModel for AveragingWithPartners {
    type Score = f64;

    fn name(&self) -> &'static str {
        "averaging-with-partners"
    }

    fn capabilities(&self) -> CapabilitySet<ModelCap> {
        CapabilitySet::empty().with(ModelCap::SelectsInteractionPartners)
    }

    fn set_current_time(&mut self, time: Time) {
        self.inner.set_current_time(time);
    }

    fn set_agents(&mut self, agents: &[AgentId]) {
        self.inner.set_agents(agents);
    }

    fn set_services(&mut self, services: &[ServiceId]) {
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
        // estimates ignore the service, so one pick serves every service
        let best = self.best_agent();
        services.iter().map(|&service| (service, best)).collect()
    }
}
