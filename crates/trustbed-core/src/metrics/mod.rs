//! Built-in metrics.
//!
//! One representative per score kind plus the classic rank-correlation
//! accuracies. Every metric is a cheap value type; protocols clone a
//! validated prototype into one instance per service, so stateful metrics
//! (the cumulative utility) accumulate per service across ticks.

mod absolute;
mod cost;
mod footrule;
mod kendall;
mod pairwise;
mod utility;

pub use absolute::AbsoluteError;
pub use cost::RequestDensityCost;
pub use footrule::SpearmanFootrule;
pub use kendall::KendallsTauA;
pub use pairwise::{BoundedPairwiseAccuracy, PairwiseAccuracy};
pub use utility::CumulativeNormalizedUtility;
