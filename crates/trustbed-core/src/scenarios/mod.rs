//! Built-in scenarios.
//!
//! The random family shares one set of generators and parameters; the
//! variants differ in which decisions they accept from the model, declared
//! through capability tags the factory matches against.

mod deception;
pub(crate) mod partners;
pub(crate) mod random;
mod selective;

pub use deception::{DeceptionKind, DeceptionModel};
pub use partners::RandomWithPartners;
pub use random::{RandomParams, RandomScenario};
pub use selective::RandomSelective;
