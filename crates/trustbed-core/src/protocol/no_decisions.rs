//! The baseline protocol: the scenario decides everything.

use trustbed_types::{Accuracy, Metric, Scenario, Time, TrustModel};

use super::{EvalError, EvaluationProtocol, InstanceCache, ProtocolBase, ResultStore, Subscriber};

/// Evaluation protocol where the scenario determines both opinion providers
/// and interaction partners; the trust model only observes.
///
/// Per tick: convey time to model and scenario, convey the scenario's
/// services and agents to the model, feed the generated opinions and
/// experiences through, recompute trust, then score each service's estimate
/// with that service's accuracy instance.
pub struct NoDecisions<M: TrustModel, S: Scenario> {
    model: M,
    scenario: S,
    accuracy: InstanceCache<Box<dyn Accuracy<M::Score>>>,
    base: ProtocolBase,
}

impl<M: TrustModel, S: Scenario> NoDecisions<M, S> {
    /// Wires the triple directly. [`ProtocolFactory`](super::ProtocolFactory)
    /// is the usual entry point; it checks capability fit before
    /// constructing.
    pub fn new(model: M, scenario: S, accuracy: Box<dyn Accuracy<M::Score>>) -> Self {
        Self {
            model,
            scenario,
            accuracy: InstanceCache::new(accuracy),
            base: ProtocolBase::new(),
        }
    }
}

impl<M: TrustModel, S: Scenario> EvaluationProtocol for NoDecisions<M, S> {
    fn name(&self) -> &'static str {
        "no-decisions"
    }

    fn step(&mut self, time: Time) -> Result<(), EvalError> {
        self.model.set_current_time(time);
        self.scenario.set_current_time(time);

        let services = self.scenario.services();
        self.model.set_services(&services);

        let agents = self.scenario.agents();
        self.model.set_agents(&agents);

        let opinions = self.scenario.generate_opinions()?;
        self.model.process_opinions(&opinions);

        let experiences = self.scenario.generate_experiences()?;
        self.model.process_experiences(&experiences);

        self.model.calculate_trust();

        for &service in &services {
            let estimate = self.model.trust(service);
            let truth = self.scenario.ground_truth(service);

            let accuracy = self.accuracy.instance(service);
            let value = accuracy.evaluate(&estimate, &truth);
            let (id, name) = (accuracy.id(), accuracy.name());
            self.base.record(id, name, service, value);
        }

        self.base.notify(time);
        Ok(())
    }

    fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) {
        self.base.subscribe(subscriber);
    }

    fn results(&self) -> &ResultStore {
        self.base.results()
    }

    fn model_name(&self) -> &'static str {
        self.model.name()
    }

    fn scenario_name(&self) -> &'static str {
        self.scenario.name()
    }
}
