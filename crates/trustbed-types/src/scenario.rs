//! Scenario contract
//!
//! The synthetic environment. A scenario owns the agent population, the
//! per-agent ground-truth capabilities, and the generation of opinions and
//! experiences each tick.

use std::collections::BTreeMap;

use crate::capability::{CapabilitySet, ScenarioCap};
use crate::tuples::{Experience, Opinion, OpinionRequest};
use crate::{AgentId, ServiceId, Time};

/// Errors a scenario can raise while generating a tick's data.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Experiences were requested before a partner map was supplied.
    #[error("no interaction partners set before generating experiences for service {service}")]
    MissingPartners { service: ServiceId },

    /// Opinions were requested before an opinion-request list was supplied.
    #[error("no opinion requests set before generating opinions")]
    MissingRequests,
}

/// A synthetic environment generating agent behavior.
///
/// The two setter methods are capability extensions with no-op defaults; a
/// protocol only calls them when the scenario declared the matching tag.
pub trait Scenario {
    /// Human-readable scenario name, used in errors and exports.
    fn name(&self) -> &'static str;

    /// Capability tags this scenario declares.
    fn capabilities(&self) -> CapabilitySet<ScenarioCap>;

    /// Conveys the current tick.
    fn set_current_time(&mut self, time: Time);

    /// Agents present this tick.
    fn agents(&self) -> Vec<AgentId>;

    /// Services present this tick.
    fn services(&self) -> Vec<ServiceId>;

    /// Generates the tick's opinions.
    fn generate_opinions(&mut self) -> Result<Vec<Opinion>, ScenarioError>;

    /// Generates the tick's experiences.
    fn generate_experiences(&mut self) -> Result<Vec<Experience>, ScenarioError>;

    /// Ground-truth capability of every agent for one service.
    fn ground_truth(&self, service: ServiceId) -> BTreeMap<AgentId, f64>;

    /// Receives the trust model's partner choices.
    ///
    /// Capability extension for [`ScenarioCap::AcceptsInteractionPartners`].
    fn set_interaction_partners(&mut self, _partners: &BTreeMap<ServiceId, AgentId>) {}

    /// Receives the trust model's opinion requests.
    ///
    /// Capability extension for [`ScenarioCap::AcceptsOpinionRequests`].
    fn set_opinion_requests(&mut self, _requests: &[OpinionRequest]) {}
}

/// Boxed scenarios satisfy the contract too, mirroring the boxed-model impl.
/// The capability extensions forward explicitly past the no-op defaults.
impl<S: Scenario + ?Sized> Scenario for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn capabilities(&self) -> CapabilitySet<ScenarioCap> {
        (**self).capabilities()
    }

    fn set_current_time(&mut self, time: Time) {
        (**self).set_current_time(time);
    }

    fn agents(&self) -> Vec<AgentId> {
        (**self).agents()
    }

    fn services(&self) -> Vec<ServiceId> {
        (**self).services()
    }

    fn generate_opinions(&mut self) -> Result<Vec<Opinion>, ScenarioError> {
        (**self).generate_opinions()
    }

    fn generate_experiences(&mut self) -> Result<Vec<Experience>, ScenarioError> {
        (**self).generate_experiences()
    }

    fn ground_truth(&self, service: ServiceId) -> BTreeMap<AgentId, f64> {
        (**self).ground_truth(service)
    }

    fn set_interaction_partners(&mut self, partners: &BTreeMap<ServiceId, AgentId>) {
        (**self).set_interaction_partners(partners);
    }

    fn set_opinion_requests(&mut self, requests: &[OpinionRequest]) {
        (**self).set_opinion_requests(requests);
    }
}
