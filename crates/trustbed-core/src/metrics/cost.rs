//! Cost of opinion requests.

use trustbed_types::{AgentId, Metric, OpinionCost, OpinionRequest, ServiceId};

/// Requests as a fraction of the densest possible request set.
///
/// With `n` agents and `s` services a model could request every ordered
/// pair for every service, `n(n−1)s` requests in total; the score is the
/// tick's request count divided by that, so 1 means "asked everyone about
/// everyone". Degenerate populations (fewer than two agents, no services)
/// score 0.
#[derive(Debug, Clone, Default)]
pub struct RequestDensityCost;

impl RequestDensityCost {
    /// Creates the metric.
    pub fn new() -> Self {
        Self
    }
}

impl Metric for RequestDensityCost {
    fn name(&self) -> &'static str {
        "request-density-cost"
    }
}

impl OpinionCost for RequestDensityCost {
    fn evaluate(
        &mut self,
        agents: &[AgentId],
        services: &[ServiceId],
        requests: &[OpinionRequest],
    ) -> f64 {
        if agents.len() < 2 || services.is_empty() {
            return 0.0;
        }
        requests.len() as f64
            / (agents.len() - 1) as f64
            / agents.len() as f64
            / services.len() as f64
    }

    fn boxed_clone(&self) -> Box<dyn OpinionCost> {
        Box::new(self.clone())
    }
}
