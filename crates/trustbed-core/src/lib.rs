//! Core evaluation machinery for the trust testbed.
//!
//! This crate owns the deterministic evaluation pipeline: the protocol
//! variants that shuttle tuples between a trust model and a scenario each
//! tick, the metrics that score the model's estimates, and the reference
//! models and scenarios experiments are run against. It is deliberately
//! free of I/O concerns; persisting readings is the runner's job.

pub mod matrix;
pub mod metrics;
pub mod models;
pub mod protocol;
pub mod rankings;
pub mod rng;
pub mod scenarios;
pub mod validate;

pub use matrix::RelationMatrix;
pub use protocol::{
    EvalError, EvaluationProtocol, MetricSet, ProtocolFactory, ResultQueryError, ResultStore,
    SetupError, Subscriber, SubscriberError,
};
pub use rng::EvalRng;
pub use validate::CapabilityRegistry;
