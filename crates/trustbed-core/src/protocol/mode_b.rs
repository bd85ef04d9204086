//! Mode B: the trust model selects opinion providers and partners.

use trustbed_types::{
    Accuracy, Metric, OpinionCost, Scenario, Time, TrustModel, Utility,
};

use super::{EvalError, EvaluationProtocol, InstanceCache, ProtocolBase, ResultStore, Subscriber};

/// Evaluation protocol where the trust model asks for the opinions it
/// wants, on top of Mode A's partner selection.
///
/// Before opinions are generated, the model's opinion requests are conveyed
/// to the scenario, which generates opinions only for them. Requests are
/// sorted by (source, target, service) before they are conveyed, so a model
/// emitting them in hash or insertion order cannot leak nondeterminism into
/// the scenario's sampling. Scoring adds an opinion-cost metric per
/// service, fed the whole tick's request list regardless of partner
/// choices.
pub struct DecisionsModeB<M: TrustModel, S: Scenario> {
    model: M,
    scenario: S,
    accuracy: InstanceCache<Box<dyn Accuracy<M::Score>>>,
    utility: InstanceCache<Box<dyn Utility>>,
    opinion_cost: InstanceCache<Box<dyn OpinionCost>>,
    base: ProtocolBase,
}

impl<M: TrustModel, S: Scenario> DecisionsModeB<M, S> {
    /// Wires the triple directly. [`ProtocolFactory`](super::ProtocolFactory)
    /// is the usual entry point; it checks capability fit before
    /// constructing.
    pub fn new(
        model: M,
        scenario: S,
        accuracy: Box<dyn Accuracy<M::Score>>,
        utility: Box<dyn Utility>,
        opinion_cost: Box<dyn OpinionCost>,
    ) -> Self {
        Self {
            model,
            scenario,
            accuracy: InstanceCache::new(accuracy),
            utility: InstanceCache::new(utility),
            opinion_cost: InstanceCache::new(opinion_cost),
            base: ProtocolBase::new(),
        }
    }
}

impl<M: TrustModel, S: Scenario> EvaluationProtocol for DecisionsModeB<M, S> {
    fn name(&self) -> &'static str {
        "decisions-mode-b"
    }

    fn step(&mut self, time: Time) -> Result<(), EvalError> {
        self.model.set_current_time(time);
        self.scenario.set_current_time(time);

        let services = self.scenario.services();
        self.model.set_services(&services);

        let agents = self.scenario.agents();
        self.model.set_agents(&agents);

        let mut requests = self.model.opinion_requests();
        requests.sort_unstable();
        self.scenario.set_opinion_requests(&requests);

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

            let opinion_cost = self.opinion_cost.instance(service);
            let value = opinion_cost.evaluate(&agents, &services, &requests);
            let (id, name) = (opinion_cost.id(), opinion_cost.name());
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
