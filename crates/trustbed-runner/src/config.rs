//! Experiment configuration.
//!
//! An experiment is described by a TOML file naming the model, the scenario
//! with its parameters, and the metrics to score with. The config builds the
//! plugins and hands them to the protocol factory; which protocol variant
//! runs falls out of the capability match, never out of the config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trustbed_core::metrics::{
    AbsoluteError, BoundedPairwiseAccuracy, CumulativeNormalizedUtility, KendallsTauA,
    PairwiseAccuracy, RequestDensityCost, SpearmanFootrule,
};
use trustbed_core::models::{Averaging, AveragingWithPartners, AveragingWithProviders};
use trustbed_core::scenarios::{RandomParams, RandomScenario, RandomSelective, RandomWithPartners};
use trustbed_core::{
    CapabilityRegistry, EvalRng, EvaluationProtocol, MetricSet, ProtocolFactory, SetupError,
};
use trustbed_types::{Scenario, Time, TrustModel};

/// Complete experiment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Seed every random draw in the run derives from
    pub seed: u64,
    /// Number of ticks to run
    pub duration: Time,
    /// Trust model selection
    pub model: ModelConfig,
    /// Scenario selection and parameters
    pub scenario: ScenarioConfig,
    /// Metrics to score the run with
    pub metrics: Vec<MetricEntry>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            duration: 1000,
            model: ModelConfig::default(),
            scenario: ScenarioConfig::default(),
            metrics: vec![MetricEntry::named(MetricName::KendallsTauA)],
        }
    }
}

impl ExperimentConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the configured plugins and resolves the protocol for them.
    ///
    /// The scenario draws its population from a fresh [`EvalRng`] seeded with
    /// `self.seed`, so two calls on the same config produce identical runs.
    pub fn build_protocol(&self) -> Result<Box<dyn EvaluationProtocol>, SetupError> {
        let model = self.model.build();
        let scenario = self.scenario.build(EvalRng::seeded(self.seed))?;
        let metrics = build_metrics(&self.metrics)?;
        ProtocolFactory::new(CapabilityRegistry::standard()).resolve(model, scenario, metrics)
    }
}

/// Trust model selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Which built-in model to evaluate
    pub name: ModelName,
}

impl ModelConfig {
    fn build(&self) -> Box<dyn TrustModel<Score = f64>> {
        match self.name {
            ModelName::Averaging => Box::new(Averaging::new()),
            ModelName::AveragingWithPartners => Box::new(AveragingWithPartners::new()),
            ModelName::AveragingWithProviders => Box::new(AveragingWithProviders::new()),
        }
    }
}

/// Built-in trust model names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelName {
    /// Plain opinion/experience averaging
    #[default]
    Averaging,
    /// Averaging plus interaction partner selection
    AveragingWithPartners,
    /// Averaging plus partner and opinion provider selection
    AveragingWithProviders,
}

/// Scenario selection and parameters.
///
/// The parameters are flattened into the same table, so a config reads
/// `[scenario] name = "random" agents = 25 ...`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Which built-in scenario drives the run
    pub name: ScenarioName,
    /// Parameters shared by the random scenario family
    #[serde(flatten)]
    pub params: RandomParams,
}

impl ScenarioConfig {
    fn build(&self, rng: EvalRng) -> Result<Box<dyn Scenario>, SetupError> {
        let params = self.params.clone();
        Ok(match self.name {
            ScenarioName::Random => Box::new(RandomScenario::new(params, rng)?),
            ScenarioName::RandomWithPartners => Box::new(RandomWithPartners::new(params, rng)?),
            ScenarioName::RandomSelective => Box::new(RandomSelective::new(params, rng)?),
        })
    }
}

/// Built-in scenario names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioName {
    /// Full opinion broadcast, scenario-chosen partners
    #[default]
    Random,
    /// Accepts the model's partner choices
    RandomWithPartners,
    /// Accepts partner choices and answers only requested opinions
    RandomSelective,
}

/// One configured metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEntry {
    /// Which built-in metric to instantiate
    pub name: MetricName,
    /// Lower bound, where the metric takes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    /// Upper bound, where the metric takes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl MetricEntry {
    /// Creates an entry without bounds.
    pub fn named(name: MetricName) -> Self {
        Self {
            name,
            lower: None,
            upper: None,
        }
    }
}

/// Built-in metric names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// Kendall's tau-a rank correlation
    KendallsTauA,
    /// Fraction of correctly ordered pairs
    PairwiseAccuracy,
    /// Pairwise accuracy restricted to a ground-truth band
    BoundedPairwiseAccuracy,
    /// Spearman's footrule rank distance
    SpearmanFootrule,
    /// Mean absolute estimate error
    AbsoluteError,
    /// Utility of chosen partners, cumulative and normalized
    CumulativeNormalizedUtility,
    /// Opinion requests per agent pair
    RequestDensityCost,
}

fn build_metrics(entries: &[MetricEntry]) -> Result<MetricSet<f64>, SetupError> {
    fn claim(slot: &mut bool, kind: &str) -> Result<(), SetupError> {
        if *slot {
            return Err(SetupError::InvalidParameters {
                plugin: "metrics",
                reason: format!("more than one {kind} metric configured"),
            });
        }
        *slot = true;
        Ok(())
    }

    let mut set = MetricSet::new();
    let (mut accuracy, mut utility, mut cost) = (false, false, false);
    for entry in entries {
        set = match entry.name {
            MetricName::KendallsTauA => {
                claim(&mut accuracy, "accuracy")?;
                set.with_accuracy(Box::new(KendallsTauA::new()))
            }
            MetricName::PairwiseAccuracy => {
                claim(&mut accuracy, "accuracy")?;
                set.with_accuracy(Box::new(PairwiseAccuracy::new()))
            }
            MetricName::BoundedPairwiseAccuracy => {
                claim(&mut accuracy, "accuracy")?;
                let (Some(lower), Some(upper)) = (entry.lower, entry.upper) else {
                    return Err(SetupError::InvalidParameters {
                        plugin: "bounded-pairwise-accuracy",
                        reason: "lower and upper bounds are required".into(),
                    });
                };
                set.with_accuracy(Box::new(BoundedPairwiseAccuracy::new(lower, upper)?))
            }
            MetricName::SpearmanFootrule => {
                claim(&mut accuracy, "accuracy")?;
                set.with_accuracy(Box::new(SpearmanFootrule::new()))
            }
            MetricName::AbsoluteError => {
                claim(&mut accuracy, "accuracy")?;
                set.with_accuracy(Box::new(AbsoluteError::new()))
            }
            MetricName::CumulativeNormalizedUtility => {
                claim(&mut utility, "utility")?;
                set.with_utility(Box::new(CumulativeNormalizedUtility::new()))
            }
            MetricName::RequestDensityCost => {
                claim(&mut cost, "opinion-cost")?;
                set.with_opinion_cost(Box::new(RequestDensityCost::new()))
            }
        };
    }
    Ok(set)
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Trust testbed experiment

seed = 42
duration = 1000

[model]
name = "averaging"

[scenario]
name = "random"
agents = 10
sd_experience = 0.10
sd_opinion = 0.05
positive_kappa = 0.25
negative_kappa = 0.25
interaction_density = 0.10

[scenario.deception_pmf]
truthful = 1.0

[[metrics]]
name = "kendalls_tau_a"
"#
    .to_string()
}
