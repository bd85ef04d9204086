//! Capability tags
//!
//! Optional behaviors a plugin may declare. The evaluation protocols state
//! their requirements as tag sets and the validator matches declared
//! against required tags exactly, so protocol selection never inspects
//! runtime types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Optional behaviors a trust model can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCap {
    /// Picks an interaction partner per service each tick
    SelectsInteractionPartners,
    /// Picks which agents to request opinions from each tick
    SelectsOpinionProviders,
}

impl ModelCap {
    /// Returns the tag's stable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCap::SelectsInteractionPartners => "selects-interaction-partners",
            ModelCap::SelectsOpinionProviders => "selects-opinion-providers",
        }
    }

    /// Returns all trust-model tags.
    pub fn all() -> &'static [ModelCap] {
        &[
            ModelCap::SelectsInteractionPartners,
            ModelCap::SelectsOpinionProviders,
        ]
    }
}

/// Optional behaviors a scenario can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioCap {
    /// Accepts a partner map before generating experiences
    AcceptsInteractionPartners,
    /// Accepts an opinion-request list before generating opinions
    AcceptsOpinionRequests,
}

impl ScenarioCap {
    /// Returns the tag's stable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioCap::AcceptsInteractionPartners => "accepts-interaction-partners",
            ScenarioCap::AcceptsOpinionRequests => "accepts-opinion-requests",
        }
    }

    /// Returns all scenario tags.
    pub fn all() -> &'static [ScenarioCap] {
        &[
            ScenarioCap::AcceptsInteractionPartners,
            ScenarioCap::AcceptsOpinionRequests,
        ]
    }
}

/// The kind of score a metric produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCap {
    /// Scores the whole estimate map against ground truth
    Accuracy,
    /// Scores the chosen interaction partner for one service
    Utility,
    /// Scores the cost of the tick's opinion requests
    OpinionCost,
}

impl MetricCap {
    /// Returns the tag's stable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCap::Accuracy => "accuracy",
            MetricCap::Utility => "utility",
            MetricCap::OpinionCost => "opinion-cost",
        }
    }

    /// Returns all metric tags.
    pub fn all() -> &'static [MetricCap] {
        &[MetricCap::Accuracy, MetricCap::Utility, MetricCap::OpinionCost]
    }
}

/// An ordered set of capability tags.
///
/// Plugins declare one of these; protocols state their requirements with
/// them. Equality is set equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet<C: Ord + Copy> {
    tags: BTreeSet<C>,
}

impl<C: Ord + Copy> CapabilitySet<C> {
    /// Creates an empty set.
    pub fn empty() -> Self {
        Self {
            tags: BTreeSet::new(),
        }
    }

    /// Adds a tag, builder style.
    pub fn with(mut self, tag: C) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Adds a tag in place.
    pub fn insert(&mut self, tag: C) {
        self.tags.insert(tag);
    }

    /// Returns true when the tag is declared.
    pub fn contains(&self, tag: C) -> bool {
        self.tags.contains(&tag)
    }

    /// Number of declared tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true when no tags are declared.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates tags in their natural order.
    pub fn iter(&self) -> impl Iterator<Item = C> + '_ {
        self.tags.iter().copied()
    }
}

impl<C: Ord + Copy> Default for CapabilitySet<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: Ord + Copy> FromIterator<C> for CapabilitySet<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl<C: Ord + Copy + fmt::Debug> fmt::Display for CapabilitySet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", tag)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_set_builder() {
        let caps = CapabilitySet::empty()
            .with(ModelCap::SelectsInteractionPartners)
            .with(ModelCap::SelectsOpinionProviders);

        assert_eq!(caps.len(), 2);
        assert!(caps.contains(ModelCap::SelectsInteractionPartners));
        assert!(caps.contains(ModelCap::SelectsOpinionProviders));
    }

    #[test]
    fn test_capability_set_insert_is_idempotent() {
        let mut caps = CapabilitySet::empty();
        caps.insert(ScenarioCap::AcceptsInteractionPartners);
        caps.insert(ScenarioCap::AcceptsInteractionPartners);

        assert_eq!(caps.len(), 1);
        assert!(!caps.contains(ScenarioCap::AcceptsOpinionRequests));
    }

    #[test]
    fn test_capability_set_equality_is_set_equality() {
        let a = CapabilitySet::empty()
            .with(MetricCap::Accuracy)
            .with(MetricCap::Utility);
        let b = CapabilitySet::empty()
            .with(MetricCap::Utility)
            .with(MetricCap::Accuracy);

        assert_eq!(a, b);
    }

    #[test]
    fn test_tag_serialization() {
        assert_eq!(
            serde_json::to_string(&ModelCap::SelectsInteractionPartners).unwrap(),
            r#""selects_interaction_partners""#
        );
        assert_eq!(
            serde_json::to_string(&MetricCap::OpinionCost).unwrap(),
            r#""opinion_cost""#
        );
    }
}
