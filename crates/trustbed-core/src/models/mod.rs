//! Built-in trust models.
//!
//! All three share the same evidence handling; they differ only in which
//! decisions they volunteer. [`Averaging`] only estimates, the other two add
//! partner selection and opinion requests on top and unlock the richer
//! protocol variants through their capability tags.

pub(crate) mod averaging;
mod partners;
mod providers;

pub use averaging::Averaging;
pub use partners::AveragingWithPartners;
pub use providers::AveragingWithProviders;
