//! Error types for fare estimation and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{ProviderId, VehicleClass};

/// Errors surfaced synchronously by the comparison engine.
#[derive(Error, Debug)]
pub enum FareError {
    /// No pricing rule is configured for the pair. This is a caller or
    /// configuration bug, distinct from a distance-based unavailability.
    #[error("no pricing rule configured for {provider} {vehicle_class}")]
    UnsupportedCombination {
        provider: ProviderId,
        vehicle_class: VehicleClass,
    },

    #[error("distance must be a finite, non-negative number of kilometres (got {0})")]
    InvalidDistance(f64),

    #[error("discount fraction must be within [0, 1) (got {0})")]
    InvalidDiscount(f64),

    #[error("invalid pricing configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read pricing configuration {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pricing configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl FareError {
    /// True for a missing (provider, class) rule, which callers may skip.
    pub fn is_unsupported_combination(&self) -> bool {
        matches!(self, FareError::UnsupportedCombination { .. })
    }
}
