//! Readings and their collection.
//!
//! A reading is one exported measurement. The [`RecordingSubscriber`] turns
//! the protocol's per-tick result notifications into a growing reading log
//! that outlives the run.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use trustbed_core::{ResultQueryError, ResultStore, Subscriber, SubscriberError};
use trustbed_types::{ServiceId, Time};

/// One measurement: a metric's value for a service at a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Tick the value was recorded at
    pub tick: Time,
    /// Name of the metric that produced the value
    pub metric: String,
    /// Service the value was scored for
    pub service: ServiceId,
    /// The recorded value
    pub value: f64,
}

impl Reading {
    /// Creates a reading.
    pub fn new(tick: Time, metric: impl Into<String>, service: ServiceId, value: f64) -> Self {
        Self {
            tick,
            metric: metric.into(),
            service,
            value,
        }
    }
}

/// Subscriber that copies every recorded (metric, service) value into a
/// shared log after each tick.
///
/// The log handle survives moving the subscriber into a protocol, the same
/// way the scripted test fixtures expose their input logs.
pub struct RecordingSubscriber {
    readings: Rc<RefCell<Vec<Reading>>>,
}

impl RecordingSubscriber {
    /// Creates a subscriber with an empty log.
    pub fn new() -> Self {
        Self {
            readings: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Returns a handle onto the reading log.
    pub fn readings(&self) -> Rc<RefCell<Vec<Reading>>> {
        Rc::clone(&self.readings)
    }
}

impl Default for RecordingSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber for RecordingSubscriber {
    fn on_tick_complete(
        &mut self,
        time: Time,
        results: &ResultStore,
    ) -> Result<(), SubscriberError> {
        let mut readings = self.readings.borrow_mut();
        for (metric, service, value) in results.entries() {
            let name = results
                .metric_name(metric)
                .ok_or(ResultQueryError::UnknownMetric { metric })?;
            readings.push(Reading::new(time, name, service, value));
        }
        Ok(())
    }
}
