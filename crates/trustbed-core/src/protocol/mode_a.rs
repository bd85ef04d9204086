//! Mode A: the trust model selects interaction partners.

use trustbed_types::{Accuracy, Metric, Scenario, Time, TrustModel, Utility};

use super::{EvalError, EvaluationProtocol, InstanceCache, ProtocolBase, ResultStore, Subscriber};

/// Evaluation protocol where the trust model picks the interaction partner
/// for each service and the scenario generates experiences with those
/// partners.
///
/// The tick extends [`NoDecisions`](super::NoDecisions): after opinions are
/// processed, the model's partner map is conveyed to the scenario, so the
/// partner choice can draw on the tick's fresh opinions but not on its
/// experiences. Scoring adds a utility metric per service; a service the
/// model chose no partner for is skipped, never scored as zero.
pub struct DecisionsModeA<M: TrustModel, S: Scenario> {
    model: M,
    scenario: S,
    accuracy: InstanceCache<Box<dyn Accuracy<M::Score>>>,
    utility: InstanceCache<Box<dyn Utility>>,
    base: ProtocolBase,
}

impl<M: TrustModel, S: Scenario> DecisionsModeA<M, S> {
    /// Wires the triple directly. [`ProtocolFactory`](super::ProtocolFactory)
    /// is the usual entry point; it checks capability fit before
    /// constructing.
    pub fn new(
        model: M,
        scenario: S,
        accuracy: Box<dyn Accuracy<M::Score>>,
        utility: Box<dyn Utility>,
    ) -> Self {
        Self {
            model,
            scenario,
            accuracy: InstanceCache::new(accuracy),
            utility: InstanceCache::new(utility),
            base: ProtocolBase::new(),
        }
    }
}

impl<M: TrustModel, S: Scenario> EvaluationProtocol for DecisionsModeA<M, S> {
    fn name(&self) -> &'static str {
        "decisions-mode-a"
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

        let partners = self.model.interaction_partners(&services);
        self.scenario.set_interaction_partners(&partners);

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

            if let Some(&agent) = partners.get(&service) {
                let utility = self.utility.instance(service);
                let value = utility.evaluate(&truth, agent);
                let (id, name) = (utility.id(), utility.name());
                self.base.record(id, name, service, value);
            }
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
