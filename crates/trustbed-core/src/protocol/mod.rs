//! Evaluation protocols
//!
//! A protocol drives one experiment: each tick it shuttles the scenario's
//! context and tuples into the trust model, asks the model to recompute,
//! scores the estimates with per-service metric instances, and notifies
//! subscribers. Three variants exist, differing in how much decision power
//! the trust model has; the factory picks the one whose capability
//! requirements the supplied plugins match exactly.
//!
//! A protocol instance is single-use: construct it for one (model,
//! scenario, metric-set) triple, call [`EvaluationProtocol::step`] with
//! monotonically increasing times, and drop it with the run.

mod factory;
mod mode_a;
mod mode_b;
mod no_decisions;

pub use factory::ProtocolFactory;
pub use mode_a::DecisionsModeA;
pub use mode_b::DecisionsModeB;
pub use no_decisions::NoDecisions;

use std::collections::BTreeMap;

use thiserror::Error;

use trustbed_types::{
    Accuracy, CapabilitySet, MetricCap, MetricId, OpinionCost, ScenarioError, ServiceId, Time,
    Utility,
};

/// Raised while wiring an experiment together.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A plugin rejected its construction parameters.
    #[error("invalid parameters for {plugin}: {reason}")]
    InvalidParameters {
        plugin: &'static str,
        reason: String,
    },

    /// No registered protocol accepts the supplied triple.
    #[error(
        "no evaluation protocol accepts model '{model}' with scenario \
         '{scenario}' and metrics {metrics:?}"
    )]
    NoProtocol {
        model: &'static str,
        scenario: &'static str,
        metrics: Vec<&'static str>,
    },
}

/// Raised by a failed tick.
///
/// A failed tick leaves the run in an undefined state; callers abort rather
/// than retry.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// Raised when a subscriber asks for a result that was never computed.
///
/// Distinguishes a metric the run never scored from a metric that has no
/// value for the requested service.
#[derive(Debug, Error)]
pub enum ResultQueryError {
    #[error("no results recorded for metric {metric}")]
    UnknownMetric { metric: MetricId },

    #[error("metric {metric} has no result for service {service}")]
    UnknownService { metric: MetricId, service: ServiceId },
}

/// Raised by a subscriber's tick callback.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error(transparent)]
    Query(#[from] ResultQueryError),

    #[error("subscriber sink failed: {0}")]
    Sink(String),
}

/// Receives a notification after every completed tick.
///
/// Subscribers read results, they never mutate them. A subscriber error is
/// isolated: the protocol logs it and carries on with the remaining
/// subscribers and ticks.
pub trait Subscriber {
    /// Called once per completed tick with the current results.
    fn on_tick_complete(&mut self, time: Time, results: &ResultStore)
        -> Result<(), SubscriberError>;
}

/// Tick results keyed by (metric, service).
///
/// Each value is overwritten when its metric next scores that service; a
/// metric skipped on some tick (an unchosen partner) simply leaves its
/// previous value in place.
#[derive(Debug, Default)]
pub struct ResultStore {
    values: BTreeMap<MetricId, BTreeMap<ServiceId, f64>>,
    names: BTreeMap<MetricId, &'static str>,
}

impl ResultStore {
    pub(crate) fn record(
        &mut self,
        metric: MetricId,
        name: &'static str,
        service: ServiceId,
        value: f64,
    ) {
        self.names.insert(metric, name);
        self.values.entry(metric).or_default().insert(service, value);
    }

    /// Latest value for a (service, metric) pair.
    pub fn value(&self, service: ServiceId, metric: MetricId) -> Result<f64, ResultQueryError> {
        let per_service = self
            .values
            .get(&metric)
            .ok_or(ResultQueryError::UnknownMetric { metric })?;
        per_service
            .get(&service)
            .copied()
            .ok_or(ResultQueryError::UnknownService { metric, service })
    }

    /// Name of a metric that has recorded at least one value.
    pub fn metric_name(&self, metric: MetricId) -> Option<&'static str> {
        self.names.get(&metric).copied()
    }

    /// All recorded values, ordered by metric then service.
    pub fn entries(&self) -> impl Iterator<Item = (MetricId, ServiceId, f64)> + '_ {
        self.values.iter().flat_map(|(metric, per_service)| {
            per_service
                .iter()
                .map(move |(service, value)| (*metric, *service, *value))
        })
    }
}

/// The metrics an experiment scores, at most one per kind.
///
/// The accuracy slot is generic over the model's score type; utility and
/// opinion-cost always score plain values. The factory decides which slots
/// a protocol variant requires.
pub struct MetricSet<T> {
    accuracy: Option<Box<dyn Accuracy<T>>>,
    utility: Option<Box<dyn Utility>>,
    opinion_cost: Option<Box<dyn OpinionCost>>,
}

impl<T> MetricSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            accuracy: None,
            utility: None,
            opinion_cost: None,
        }
    }

    /// Sets the accuracy metric.
    pub fn with_accuracy(mut self, metric: Box<dyn Accuracy<T>>) -> Self {
        self.accuracy = Some(metric);
        self
    }

    /// Sets the utility metric.
    pub fn with_utility(mut self, metric: Box<dyn Utility>) -> Self {
        self.utility = Some(metric);
        self
    }

    /// Sets the opinion-cost metric.
    pub fn with_opinion_cost(mut self, metric: Box<dyn OpinionCost>) -> Self {
        self.opinion_cost = Some(metric);
        self
    }

    /// Capability tags of each present metric, one set per metric.
    pub fn capabilities(&self) -> Vec<CapabilitySet<MetricCap>> {
        let mut sets = Vec::new();
        if self.accuracy.is_some() {
            sets.push(CapabilitySet::empty().with(MetricCap::Accuracy));
        }
        if self.utility.is_some() {
            sets.push(CapabilitySet::empty().with(MetricCap::Utility));
        }
        if self.opinion_cost.is_some() {
            sets.push(CapabilitySet::empty().with(MetricCap::OpinionCost));
        }
        sets
    }

    /// Names of the present metrics, for error reporting.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if let Some(metric) = &self.accuracy {
            names.push(metric.name());
        }
        if let Some(metric) = &self.utility {
            names.push(metric.name());
        }
        if let Some(metric) = &self.opinion_cost {
            names.push(metric.name());
        }
        names
    }

    fn into_parts(
        self,
    ) -> (
        Option<Box<dyn Accuracy<T>>>,
        Option<Box<dyn Utility>>,
        Option<Box<dyn OpinionCost>>,
    ) {
        (self.accuracy, self.utility, self.opinion_cost)
    }
}

impl<T> Default for MetricSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-service metric instances minted lazily from one prototype.
///
/// Each (metric, service) pair is scored by exactly one long-lived
/// instance, so cumulative metrics keep their state across ticks.
struct InstanceCache<M: Clone> {
    prototype: M,
    instances: BTreeMap<ServiceId, M>,
}

impl<M: Clone> InstanceCache<M> {
    fn new(prototype: M) -> Self {
        Self {
            prototype,
            instances: BTreeMap::new(),
        }
    }

    fn instance(&mut self, service: ServiceId) -> &mut M {
        let prototype = &self.prototype;
        self.instances
            .entry(service)
            .or_insert_with(|| prototype.clone())
    }
}

/// Result and subscriber bookkeeping shared by all protocol variants.
#[derive(Default)]
struct ProtocolBase {
    results: ResultStore,
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl ProtocolBase {
    fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, metric: MetricId, name: &'static str, service: ServiceId, value: f64) {
        self.results.record(metric, name, service, value);
    }

    fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) {
        self.subscribers.push(subscriber);
    }

    fn results(&self) -> &ResultStore {
        &self.results
    }

    fn notify(&mut self, time: Time) {
        for subscriber in &mut self.subscribers {
            if let Err(error) = subscriber.on_tick_complete(time, &self.results) {
                tracing::warn!(%error, time, "subscriber failed, continuing run");
            }
        }
    }
}

/// A running experiment.
///
/// `step` performs the variant's exchange for one tick and then notifies
/// subscribers. Times must be fed in increasing order; the protocol itself
/// does not track them.
pub trait EvaluationProtocol {
    /// The variant's name.
    fn name(&self) -> &'static str;

    /// Advances the experiment by one tick.
    fn step(&mut self, time: Time) -> Result<(), EvalError>;

    /// Registers a subscriber notified after every tick.
    fn subscribe(&mut self, subscriber: Box<dyn Subscriber>);

    /// Results recorded so far.
    fn results(&self) -> &ResultStore;

    /// Name of the trust model under evaluation.
    fn model_name(&self) -> &'static str;

    /// Name of the driving scenario.
    fn scenario_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustbed_types::{AgentId, Metric, OpinionRequest};

    #[derive(Clone)]
    struct StubAccuracy;

    impl Metric for StubAccuracy {
        fn name(&self) -> &'static str {
            "stub-accuracy"
        }
    }

    impl Accuracy<f64> for StubAccuracy {
        fn evaluate(
            &mut self,
            _estimate: &BTreeMap<AgentId, f64>,
            _ground_truth: &BTreeMap<AgentId, f64>,
        ) -> f64 {
            0.0
        }

        fn boxed_clone(&self) -> Box<dyn Accuracy<f64>> {
            Box::new(self.clone())
        }
    }

    #[derive(Clone)]
    struct StubUtility;

    impl Metric for StubUtility {
        fn name(&self) -> &'static str {
            "stub-utility"
        }
    }

    impl Utility for StubUtility {
        fn evaluate(&mut self, _ground_truth: &BTreeMap<AgentId, f64>, _agent: AgentId) -> f64 {
            0.0
        }

        fn boxed_clone(&self) -> Box<dyn Utility> {
            Box::new(self.clone())
        }
    }

    #[derive(Clone)]
    struct StubCost;

    impl Metric for StubCost {
        fn name(&self) -> &'static str {
            "stub-cost"
        }
    }

    impl OpinionCost for StubCost {
        fn evaluate(
            &mut self,
            _agents: &[AgentId],
            _services: &[ServiceId],
            _requests: &[OpinionRequest],
        ) -> f64 {
            0.0
        }

        fn boxed_clone(&self) -> Box<dyn OpinionCost> {
            Box::new(self.clone())
        }
    }

    /// Accuracy stub that counts its own invocations.
    #[derive(Clone, Default)]
    struct TickCounter {
        calls: u32,
    }

    impl Metric for TickCounter {
        fn name(&self) -> &'static str {
            "tick-counter"
        }
    }

    impl Accuracy<f64> for TickCounter {
        fn evaluate(
            &mut self,
            _estimate: &BTreeMap<AgentId, f64>,
            _ground_truth: &BTreeMap<AgentId, f64>,
        ) -> f64 {
            self.calls += 1;
            f64::from(self.calls)
        }

        fn boxed_clone(&self) -> Box<dyn Accuracy<f64>> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_result_store_round_trip() {
        let mut store = ResultStore::default();
        let id = MetricId::of("stub-accuracy");
        store.record(id, "stub-accuracy", 0, 0.5);

        assert_eq!(store.value(0, id).unwrap(), 0.5);
        assert_eq!(store.metric_name(id), Some("stub-accuracy"));
    }

    #[test]
    fn test_result_store_overwrites_per_tick() {
        let mut store = ResultStore::default();
        let id = MetricId::of("stub-accuracy");
        store.record(id, "stub-accuracy", 3, 0.25);
        store.record(id, "stub-accuracy", 3, 0.75);

        assert_eq!(store.value(3, id).unwrap(), 0.75);
        assert_eq!(store.entries().count(), 1);
    }

    #[test]
    fn test_result_store_distinguishes_query_errors() {
        let mut store = ResultStore::default();
        let known = MetricId::of("stub-accuracy");
        let unknown = MetricId::of("never-registered");
        store.record(known, "stub-accuracy", 0, 1.0);

        assert!(matches!(
            store.value(0, unknown),
            Err(ResultQueryError::UnknownMetric { .. })
        ));
        assert!(matches!(
            store.value(9, known),
            Err(ResultQueryError::UnknownService { service: 9, .. })
        ));
    }

    #[test]
    fn test_metric_set_capabilities_in_slot_order() {
        let empty: MetricSet<f64> = MetricSet::new();
        assert!(empty.capabilities().is_empty());

        let set = MetricSet::new()
            .with_opinion_cost(Box::new(StubCost))
            .with_utility(Box::new(StubUtility))
            .with_accuracy(Box::new(StubAccuracy));

        let caps = set.capabilities();
        assert_eq!(caps.len(), 3);
        assert!(caps[0].contains(MetricCap::Accuracy));
        assert!(caps[1].contains(MetricCap::Utility));
        assert!(caps[2].contains(MetricCap::OpinionCost));
        assert_eq!(set.names(), vec!["stub-accuracy", "stub-utility", "stub-cost"]);
    }

    #[test]
    fn test_instance_cache_keeps_state_per_service() {
        let prototype: Box<dyn Accuracy<f64>> = Box::new(TickCounter::default());
        let mut cache = InstanceCache::new(prototype);
        let estimate = BTreeMap::new();
        let truth = BTreeMap::new();

        assert_eq!(cache.instance(0).evaluate(&estimate, &truth), 1.0);
        assert_eq!(cache.instance(0).evaluate(&estimate, &truth), 2.0);
        // A different service gets a fresh clone of the prototype.
        assert_eq!(cache.instance(1).evaluate(&estimate, &truth), 1.0);
    }
}
