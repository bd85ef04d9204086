//! Trust model contract
//!
//! The algorithm under evaluation. A protocol pushes the tick's context
//! (time, agents, services) and data (opinions, experiences) into the
//! model, asks it to recompute, then pulls per-service estimates out.

use std::collections::BTreeMap;
use std::fmt;

use crate::capability::{CapabilitySet, ModelCap};
use crate::tuples::{Experience, Opinion, OpinionRequest};
use crate::{AgentId, ServiceId, Time};

/// A computational trust model under evaluation.
///
/// `Score` is the model's native trust-estimate type: a real number, a
/// qualitative degree, an ordinal rank. Metrics only ever compare scores,
/// so `PartialOrd` is the whole requirement.
///
/// The two selection methods are capability extensions. Their defaults
/// select nothing; a protocol only calls them when the model declared the
/// matching tag, which the validator checked at setup.
pub trait TrustModel {
    /// The model's native trust-estimate type. Estimates are owned values;
    /// metrics hold per-service instances typed over `Score`, so the type
    /// must not borrow.
    type Score: PartialOrd + Clone + fmt::Debug + 'static;

    /// Human-readable model name, used in errors and exports.
    fn name(&self) -> &'static str;

    /// Capability tags this model declares.
    fn capabilities(&self) -> CapabilitySet<ModelCap>;

    /// Conveys the current tick.
    fn set_current_time(&mut self, time: Time);

    /// Conveys the agents present this tick.
    fn set_agents(&mut self, agents: &[AgentId]);

    /// Conveys the services present this tick.
    fn set_services(&mut self, services: &[ServiceId]);

    /// Hands the model the tick's opinions.
    fn process_opinions(&mut self, opinions: &[Opinion]);

    /// Hands the model the tick's experiences.
    fn process_experiences(&mut self, experiences: &[Experience]);

    /// Recomputes trust estimates from the state accumulated so far.
    fn calculate_trust(&mut self);

    /// Returns the current estimate map for one service.
    fn trust(&self, service: ServiceId) -> BTreeMap<AgentId, Self::Score>;

    /// Picks an interaction partner per service.
    ///
    /// Capability extension for [`ModelCap::SelectsInteractionPartners`].
    fn interaction_partners(
        &mut self,
        _services: &[ServiceId],
    ) -> BTreeMap<ServiceId, AgentId> {
        BTreeMap::new()
    }

    /// Emits the opinion requests for the coming tick.
    ///
    /// Capability extension for [`ModelCap::SelectsOpinionProviders`].
    fn opinion_requests(&mut self) -> Vec<OpinionRequest> {
        Vec::new()
    }
}

/// Boxed models satisfy the contract too, so callers that pick a model at
/// runtime can hand a `Box<dyn TrustModel<Score = ...>>` to anything expecting
/// a concrete model. The capability extensions forward explicitly; the trait
/// defaults would otherwise swallow the inner model's answers.
impl<M: TrustModel + ?Sized> TrustModel for Box<M> {
    type Score = M::Score;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn capabilities(&self) -> CapabilitySet<ModelCap> {
        (**self).capabilities()
    }

    fn set_current_time(&mut self, time: Time) {
        (**self).set_current_time(time);
    }

    fn set_agents(&mut self, agents: &[AgentId]) {
        (**self).set_agents(agents);
    }

    fn set_services(&mut self, services: &[ServiceId]) {
        (**self).set_services(services);
    }

    fn process_opinions(&mut self, opinions: &[Opinion]) {
        (**self).process_opinions(opinions);
    }

    fn process_experiences(&mut self, experiences: &[Experience]) {
        (**self).process_experiences(experiences);
    }

    fn calculate_trust(&mut self) {
        (**self).calculate_trust();
    }

    fn trust(&self, service: ServiceId) -> BTreeMap<AgentId, Self::Score> {
        (**self).trust(service)
    }

    fn interaction_partners(
        &mut self,
        services: &[ServiceId],
    ) -> BTreeMap<ServiceId, AgentId> {
        (**self).interaction_partners(services)
    }

    fn opinion_requests(&mut self) -> Vec<OpinionRequest> {
        (**self).opinion_requests()
    }
}
