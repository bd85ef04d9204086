//! Experiment driver for the trust testbed.
//!
//! This crate turns a TOML experiment description into a finished run: it
//! builds the configured plugins, lets the protocol factory resolve the
//! evaluation protocol, drives it tick by tick, and exports the collected
//! readings. The `trustbed` binary is a thin CLI over these pieces.

pub mod config;
pub mod output;
pub mod reading;

pub use config::{default_config_toml, ConfigError, ExperimentConfig};
pub use output::{OutputError, RunRecord};
pub use reading::{Reading, RecordingSubscriber};

use trustbed_core::{EvalError, EvaluationProtocol, Subscriber};
use trustbed_types::Time;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every tick completed.
    Completed { ticks: Time },
    /// A tick failed and the run stopped there.
    Faulted { tick: Time, error: EvalError },
}

impl RunOutcome {
    /// Ticks that completed before the run ended.
    pub fn ticks(&self) -> Time {
        match self {
            RunOutcome::Completed { ticks } => *ticks,
            RunOutcome::Faulted { tick, .. } => tick - 1,
        }
    }
}

/// Drives a protocol for `duration` ticks, times 1 through `duration`.
///
/// Subscribers are registered before the first tick. A failed tick leaves
/// the experiment in an undefined state, so the run stops at the failure
/// instead of retrying; readings collected up to that point stay valid.
pub fn run(
    protocol: &mut dyn EvaluationProtocol,
    duration: Time,
    subscribers: Vec<Box<dyn Subscriber>>,
) -> RunOutcome {
    for subscriber in subscribers {
        protocol.subscribe(subscriber);
    }
    for tick in 1..=duration {
        if let Err(error) = protocol.step(tick) {
            tracing::warn!(%error, tick, "tick failed, aborting run");
            return RunOutcome::Faulted { tick, error };
        }
    }
    RunOutcome::Completed { ticks: duration }
}
