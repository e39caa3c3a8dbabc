//! Ride fare comparison engine.
//!
//! Estimates a fare per configured provider and vehicle class, applies an
//! activity discount and ranks the result for presentation. Distance lookup and
//! discount tiering are pluggable collaborators.

pub mod catalog;
pub mod comparison;
pub mod config;
pub mod discount;
pub mod distance;
pub mod error;
pub mod presentation;
pub mod pricing;
pub mod ranking;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use catalog::{ProviderId, VehicleClass};
pub use comparison::{savings_versus, ComparisonRequest, FareComparator};
pub use config::PricingConfig;
pub use discount::{apply_discount, DiscountPolicy, StepTierPolicy};
pub use error::FareError;
pub use pricing::{FareEstimate, PricingRule};
pub use ranking::{rank, RankedResult, SortCriterion};
