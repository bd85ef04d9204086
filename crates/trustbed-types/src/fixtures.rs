//! Scripted plugins for testing.
//!
//! This module provides canned trust-model and scenario implementations
//! whose answers are fixed up front and whose inputs are recorded for
//! later inspection. Enable the `test-fixtures` feature to access them.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // trustbed-types = { path = "../trustbed-types", features = ["test-fixtures"] }
//!
//! use trustbed_types::fixtures::{ScriptedModel, ScriptedScenario};
//!
//! let model = ScriptedModel::new().with_estimate(0, [(0, 1.0), (1, 0.5)]);
//! let log = model.log();
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::capability::{CapabilitySet, ModelCap, ScenarioCap};
use crate::model::TrustModel;
use crate::scenario::{Scenario, ScenarioError};
use crate::tuples::{Experience, Opinion, OpinionRequest};
use crate::{AgentId, ServiceId, Time};

/// Everything a [`ScriptedModel`] was told, in call order.
#[derive(Debug, Default)]
pub struct ModelLog {
    /// Ticks conveyed via `set_current_time`
    pub times: Vec<Time>,
    /// Agent lists conveyed via `set_agents`
    pub agent_batches: Vec<Vec<AgentId>>,
    /// Service lists conveyed via `set_services`
    pub service_batches: Vec<Vec<ServiceId>>,
    /// Opinions received, per call
    pub opinion_batches: Vec<usize>,
    /// Experiences received, per call
    pub experience_batches: Vec<usize>,
    /// Number of `calculate_trust` calls
    pub trust_calculations: usize,
}

/// A trust model with fixed answers and a recorded input log.
pub struct ScriptedModel {
    caps: CapabilitySet<ModelCap>,
    estimates: BTreeMap<ServiceId, BTreeMap<AgentId, f64>>,
    partners: BTreeMap<ServiceId, AgentId>,
    requests: Vec<OpinionRequest>,
    log: Rc<RefCell<ModelLog>>,
}

impl ScriptedModel {
    /// Creates a model with no capabilities and no estimates.
    pub fn new() -> Self {
        Self {
            caps: CapabilitySet::empty(),
            estimates: BTreeMap::new(),
            partners: BTreeMap::new(),
            requests: Vec::new(),
            log: Rc::new(RefCell::new(ModelLog::default())),
        }
    }

    /// Declares a capability tag.
    pub fn with_capability(mut self, tag: ModelCap) -> Self {
        self.caps.insert(tag);
        self
    }

    /// Fixes the estimate map returned for a service.
    pub fn with_estimate<I>(mut self, service: ServiceId, estimate: I) -> Self
    where
        I: IntoIterator<Item = (AgentId, f64)>,
    {
        self.estimates.insert(service, estimate.into_iter().collect());
        self
    }

    /// Fixes the partner answer for a service.
    pub fn with_partner(mut self, service: ServiceId, agent: AgentId) -> Self {
        self.partners.insert(service, agent);
        self
    }

    /// Fixes the opinion-request answer.
    pub fn with_requests(mut self, requests: Vec<OpinionRequest>) -> Self {
        self.requests = requests;
        self
    }

    /// Returns a handle onto the input log that survives moving the model
    /// into a protocol.
    pub fn log(&self) -> Rc<RefCell<ModelLog>> {
        Rc::clone(&self.log)
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustModel for ScriptedModel {
    type Score = f64;

    fn name(&self) -> &'static str {
        "scripted-model"
    }

    fn capabilities(&self) -> CapabilitySet<ModelCap> {
        self.caps.clone()
    }

    fn set_current_time(&mut self, time: Time) {
        self.log.borrow_mut().times.push(time);
    }

    fn set_agents(&mut self, agents: &[AgentId]) {
        self.log.borrow_mut().agent_batches.push(agents.to_vec());
    }

    fn set_services(&mut self, services: &[ServiceId]) {
        self.log.borrow_mut().service_batches.push(services.to_vec());
    }

    fn process_opinions(&mut self, opinions: &[Opinion]) {
        self.log.borrow_mut().opinion_batches.push(opinions.len());
    }

    fn process_experiences(&mut self, experiences: &[Experience]) {
        self.log
            .borrow_mut()
            .experience_batches
            .push(experiences.len());
    }

    fn calculate_trust(&mut self) {
        self.log.borrow_mut().trust_calculations += 1;
    }

    fn trust(&self, service: ServiceId) -> BTreeMap<AgentId, f64> {
        self.estimates.get(&service).cloned().unwrap_or_default()
    }

    fn interaction_partners(
        &mut self,
        services: &[ServiceId],
    ) -> BTreeMap<ServiceId, AgentId> {
        services
            .iter()
            .filter_map(|s| self.partners.get(s).map(|a| (*s, *a)))
            .collect()
    }

    fn opinion_requests(&mut self) -> Vec<OpinionRequest> {
        self.requests.clone()
    }
}

/// Everything a [`ScriptedScenario`] was told, in call order.
#[derive(Debug, Default)]
pub struct ScenarioLog {
    /// Ticks conveyed via `set_current_time`
    pub times: Vec<Time>,
    /// Partner maps received via `set_interaction_partners`
    pub partner_maps: Vec<BTreeMap<ServiceId, AgentId>>,
    /// Request lists received via `set_opinion_requests`
    pub request_lists: Vec<Vec<OpinionRequest>>,
}

/// A scenario with fixed agents, ground truth and tick data.
///
/// When the partner-accepting tag is declared, experiences are emitted only
/// for services present in the last received partner map, and asking for
/// experiences before any map arrived is a missing-data error. The
/// request-accepting tag gates opinions the same way.
pub struct ScriptedScenario {
    caps: CapabilitySet<ScenarioCap>,
    agents: Vec<AgentId>,
    services: Vec<ServiceId>,
    truth: BTreeMap<ServiceId, BTreeMap<AgentId, f64>>,
    opinions: Vec<Opinion>,
    experiences: Vec<Experience>,
    log: Rc<RefCell<ScenarioLog>>,
}

impl ScriptedScenario {
    /// Creates a scenario with no agents and no capabilities.
    pub fn new() -> Self {
        Self {
            caps: CapabilitySet::empty(),
            agents: Vec::new(),
            services: vec![0],
            truth: BTreeMap::new(),
            opinions: Vec::new(),
            experiences: Vec::new(),
            log: Rc::new(RefCell::new(ScenarioLog::default())),
        }
    }

    /// Declares a capability tag.
    pub fn with_capability(mut self, tag: ScenarioCap) -> Self {
        self.caps.insert(tag);
        self
    }

    /// Sets the agent population.
    pub fn with_agents(mut self, agents: Vec<AgentId>) -> Self {
        self.agents = agents;
        self
    }

    /// Sets the service list.
    pub fn with_services(mut self, services: Vec<ServiceId>) -> Self {
        self.services = services;
        self
    }

    /// Fixes the ground truth for a service.
    pub fn with_ground_truth<I>(mut self, service: ServiceId, truth: I) -> Self
    where
        I: IntoIterator<Item = (AgentId, f64)>,
    {
        self.truth.insert(service, truth.into_iter().collect());
        self
    }

    /// Sets the opinions emitted each tick.
    pub fn with_opinions(mut self, opinions: Vec<Opinion>) -> Self {
        self.opinions = opinions;
        self
    }

    /// Sets the experiences emitted each tick.
    pub fn with_experiences(mut self, experiences: Vec<Experience>) -> Self {
        self.experiences = experiences;
        self
    }

    /// Returns a handle onto the input log that survives moving the
    /// scenario into a protocol.
    pub fn log(&self) -> Rc<RefCell<ScenarioLog>> {
        Rc::clone(&self.log)
    }
}

impl Default for ScriptedScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ScriptedScenario {
    fn name(&self) -> &'static str {
        "scripted-scenario"
    }

    fn capabilities(&self) -> CapabilitySet<ScenarioCap> {
        self.caps.clone()
    }

    fn set_current_time(&mut self, time: Time) {
        self.log.borrow_mut().times.push(time);
    }

    fn agents(&self) -> Vec<AgentId> {
        self.agents.clone()
    }

    fn services(&self) -> Vec<ServiceId> {
        self.services.clone()
    }

    fn generate_opinions(&mut self) -> Result<Vec<Opinion>, ScenarioError> {
        if !self.caps.contains(ScenarioCap::AcceptsOpinionRequests) {
            return Ok(self.opinions.clone());
        }

        let log = self.log.borrow();
        let requests = log.request_lists.last().ok_or(ScenarioError::MissingRequests)?;
        Ok(self
            .opinions
            .iter()
            .filter(|o| {
                requests
                    .iter()
                    .any(|r| r.source == o.source && r.target == o.target && r.service == o.service)
            })
            .copied()
            .collect())
    }

    fn generate_experiences(&mut self) -> Result<Vec<Experience>, ScenarioError> {
        if !self.caps.contains(ScenarioCap::AcceptsInteractionPartners) {
            return Ok(self.experiences.clone());
        }

        let log = self.log.borrow();
        let partners = log
            .partner_maps
            .last()
            .ok_or(ScenarioError::MissingPartners {
                service: self.services.first().copied().unwrap_or(0),
            })?;
        Ok(self
            .experiences
            .iter()
            .filter(|e| partners.contains_key(&e.service))
            .copied()
            .collect())
    }

    fn ground_truth(&self, service: ServiceId) -> BTreeMap<AgentId, f64> {
        self.truth.get(&service).cloned().unwrap_or_default()
    }

    fn set_interaction_partners(&mut self, partners: &BTreeMap<ServiceId, AgentId>) {
        self.log.borrow_mut().partner_maps.push(partners.clone());
    }

    fn set_opinion_requests(&mut self, requests: &[OpinionRequest]) {
        self.log.borrow_mut().request_lists.push(requests.to_vec());
    }
}
