//! The averaging baseline model.

use std::collections::BTreeMap;

use trustbed_types::{
    AgentId, CapabilitySet, Experience, ModelCap, Opinion, ServiceId, Time, TrustModel,
};

use crate::matrix::RelationMatrix;

/// Experience weight saturates after this many interactions.
pub(crate) const EXPERIENCE_SATURATION: u32 = 3;

/// Running first-hand evidence about one agent.
#[derive(Debug, Default, Clone, Copy)]
struct ExperienceStat {
    sum: f64,
    count: u32,
}

/// Baseline model blending experience averages with received opinions.
///
/// Opinions land in the relationship matrix (latest per ordered pair wins);
/// an agent's reputation is the mean of the opinions about them.
/// Experiences accumulate per agent in the self row. An estimate blends the
/// experience average, weighted `min(count, 3)/3`, with the reputation
/// carrying the rest, so direct evidence drowns out hearsay after three
/// interactions. Agents with neither kind of evidence get no estimate.
/// Services are deliberately ignored: every service sees the same map.
pub struct Averaging {
    matrix: RelationMatrix<f64, ExperienceStat>,
    estimates: BTreeMap<AgentId, f64>,
}

impl Averaging {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self {
            matrix: RelationMatrix::new(),
            estimates: BTreeMap::new(),
        }
    }

    /// Experiences recorded so far about an agent.
    pub(crate) fn experience_count(&self, agent: AgentId) -> u32 {
        self.matrix.get_self(agent).map_or(0, |stat| stat.count)
    }

    pub(crate) fn estimates(&self) -> &BTreeMap<AgentId, f64> {
        &self.estimates
    }

    /// Recomputes the estimate map from the matrix.
    pub(crate) fn recompute(&mut self) {
        let mut estimates = BTreeMap::new();
        for agent in 0..self.matrix.capacity() {
            let (sum, count) = self
                .matrix
                .column(agent)
                .fold((0.0, 0u32), |(sum, count), &degree| (sum + degree, count + 1));
            let reputation = (count > 0).then(|| sum / f64::from(count));

            let experience = self
                .matrix
                .get_self(agent)
                .filter(|stat| stat.count > 0)
                .map(|stat| {
                    let weight =
                        f64::from(stat.count.min(EXPERIENCE_SATURATION)) / f64::from(EXPERIENCE_SATURATION);
                    (stat.sum / f64::from(stat.count), weight)
                });

            let estimate = match (experience, reputation) {
                (Some((average, weight)), Some(reputation)) if weight < 1.0 => {
                    weight * average + (1.0 - weight) * reputation
                }
                (Some((average, _)), _) => average,
                (None, Some(reputation)) => reputation,
                (None, None) => continue,
            };
            estimates.insert(agent, estimate);
        }
        self.estimates = estimates;
    }

    fn grow_for<I: Iterator<Item = AgentId>>(&mut self, ids: I) {
        if let Some(max) = ids.max() {
            self.matrix.ensure_capacity(max);
        }
    }
}

impl Default for Averaging {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustModel for Averaging {
    type Score = f64;

    fn name(&self) -> &'static str {
        "averaging"
    }

    fn capabilities(&self) -> CapabilitySet<ModelCap> {
        CapabilitySet::empty()
    }

    fn set_current_time(&mut self, _time: Time) {}

    fn set_agents(&mut self, agents: &[AgentId]) {
        self.grow_for(agents.iter().copied());
    }

    fn set_services(&mut self, _services: &[ServiceId]) {}

    fn process_opinions(&mut self, opinions: &[Opinion]) {
        self.grow_for(opinions.iter().flat_map(|o| [o.source, o.target]));
        for opinion in opinions {
            self.matrix.set(opinion.source, opinion.target, opinion.degree);
        }
    }

    fn process_experiences(&mut self, experiences: &[Experience]) {
        self.grow_for(experiences.iter().map(|e| e.agent));
        for experience in experiences {
            let stat = self
                .matrix
                .self_mut(experience.agent)
                .get_or_insert_with(ExperienceStat::default);
            stat.sum += experience.outcome;
            stat.count += 1;
        }
    }

    fn calculate_trust(&mut self) {
        self.recompute();
    }

    fn trust(&self, _service: ServiceId) -> BTreeMap<AgentId, f64> {
        self.estimates.clone()
    }
}
