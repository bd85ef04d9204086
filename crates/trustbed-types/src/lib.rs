//! Shared data types and plugin contracts for the trust evaluation testbed.
//!
//! This crate contains pure data structures and the traits that trust
//! models, scenarios and metrics implement. It has no engine logic and is
//! a dependency for all other crates in the workspace.

pub mod capability;
pub mod metric;
pub mod model;
pub mod scenario;
pub mod tuples;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

/// Agent identifier. Non-negative, allocated by the scenario; gaps are
/// allowed, so consumers must tolerate sparse and growing id ranges.
pub type AgentId = usize;

/// Service identifier naming an independent capability dimension.
pub type ServiceId = usize;

/// Simulation time. Ticks start at 1 and advance by 1.
pub type Time = u64;

// Re-export data tuples
pub use tuples::{Experience, Opinion, OpinionRequest};

// Re-export capability tags
pub use capability::{CapabilitySet, MetricCap, ModelCap, ScenarioCap};

// Re-export plugin contracts
pub use metric::{Accuracy, Metric, MetricId, OpinionCost, Utility};
pub use model::TrustModel;
pub use scenario::{Scenario, ScenarioError};
