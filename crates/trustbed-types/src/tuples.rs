//! Exchange tuples
//!
//! The three record types that flow between a scenario and a trust model
//! during a tick. The engine moves them; only the trust model may retain
//! them.

use serde::{Deserialize, Serialize};

use crate::{AgentId, ServiceId, Time};

/// A third-party statement about an agent's trustworthiness.
///
/// Produced by the scenario each tick and consumed once by the trust model
/// the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    /// Agent giving the opinion
    pub source: AgentId,
    /// Agent the opinion is about
    pub target: AgentId,
    /// Service the opinion concerns
    pub service: ServiceId,
    /// Tick at which the opinion was voiced
    pub time: Time,
    /// Reported trust degree, by convention in [0, 1]
    pub degree: f64,
    /// Reporter's stated confidence in the degree, in [0, 1]
    pub confidence: f64,
}

impl Opinion {
    /// Creates a new opinion.
    pub fn new(
        source: AgentId,
        target: AgentId,
        service: ServiceId,
        time: Time,
        degree: f64,
        confidence: f64,
    ) -> Self {
        Self {
            source,
            target,
            service,
            time,
            degree,
            confidence,
        }
    }
}

/// A first-hand interaction outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    /// Agent the interaction was with
    pub agent: AgentId,
    /// Service the interaction concerned
    pub service: ServiceId,
    /// Tick at which the interaction happened
    pub time: Time,
    /// Observed outcome, by convention in [0, 1]
    pub outcome: f64,
}

impl Experience {
    /// Creates a new experience.
    pub fn new(agent: AgentId, service: ServiceId, time: Time, outcome: f64) -> Self {
        Self {
            agent,
            service,
            time,
            outcome,
        }
    }
}

/// A trust model's request for an opinion from one agent about another.
///
/// Ordered by (source, target, service) so request lists sort into a
/// deterministic sequence before they reach the scenario.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OpinionRequest {
    /// Agent the opinion is requested from
    pub source: AgentId,
    /// Agent the opinion should be about
    pub target: AgentId,
    /// Service the opinion should concern
    pub service: ServiceId,
}

impl OpinionRequest {
    /// Creates a new opinion request.
    pub fn new(source: AgentId, target: AgentId, service: ServiceId) -> Self {
        Self {
            source,
            target,
            service,
        }
    }
}
