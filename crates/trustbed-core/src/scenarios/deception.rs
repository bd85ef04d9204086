//! Deception models agents apply to the opinions they communicate.

use serde::{Deserialize, Serialize};

use crate::rng::EvalRng;

/// Deception model identifiers, as they appear in experiment configuration.
///
/// A kind plus the scenario's exaggeration coefficients materializes into a
/// [`DeceptionModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeceptionKind {
    Truthful,
    Complementary,
    PositiveExaggeration,
    NegativeExaggeration,
    RandomLie,
    Silent,
}

impl DeceptionKind {
    /// Binds the kind to concrete exaggeration coefficients.
    pub fn model(self, positive_kappa: f64, negative_kappa: f64) -> DeceptionModel {
        match self {
            Self::Truthful => DeceptionModel::Truthful,
            Self::Complementary => DeceptionModel::Complementary,
            Self::PositiveExaggeration => DeceptionModel::PositiveExaggeration {
                kappa: positive_kappa,
            },
            Self::NegativeExaggeration => DeceptionModel::NegativeExaggeration {
                kappa: negative_kappa,
            },
            Self::RandomLie => DeceptionModel::RandomLie,
            Self::Silent => DeceptionModel::Silent,
        }
    }
}

/// How an agent distorts an internal trust degree before communicating it.
///
/// `apply` returns `None` when no opinion is communicated at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeceptionModel {
    /// Reports the value unchanged.
    Truthful,
    /// Reports `1 - value`.
    Complementary,
    /// Inflates towards 1: `value (1 - kappa) + kappa`.
    PositiveExaggeration { kappa: f64 },
    /// Deflates towards 0: `value (1 - kappa)`.
    NegativeExaggeration { kappa: f64 },
    /// Ignores the value and reports a uniform draw.
    RandomLie,
    /// Communicates nothing.
    Silent,
}

impl DeceptionModel {
    /// Distorts an internal trust degree, or withholds it entirely.
    pub fn apply(self, value: f64, rng: &mut EvalRng) -> Option<f64> {
        match self {
            Self::Truthful => Some(value),
            Self::Complementary => Some(1.0 - value),
            Self::PositiveExaggeration { kappa } => Some(value * (1.0 - kappa) + kappa),
            Self::NegativeExaggeration { kappa } => Some(value * (1.0 - kappa)),
            Self::RandomLie => Some(rng.unit_uniform()),
            Self::Silent => None,
        }
    }
}
