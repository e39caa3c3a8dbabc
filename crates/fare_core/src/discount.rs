//! Discount adjustment and the activity-based tier policy that feeds it.

use serde::{Deserialize, Serialize};

use crate::error::FareError;
use crate::pricing::FareEstimate;

pub(crate) fn validate_fraction(fraction: f64) -> Result<(), FareError> {
    if fraction.is_finite() && (0.0..1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(FareError::InvalidDiscount(fraction))
    }
}

/// Return a copy of `estimate` with `cost * (1 - fraction)`.
///
/// ETA and availability are carried over untouched. Fractions outside
/// `[0, 1)` are rejected rather than clamped.
pub fn apply_discount(estimate: &FareEstimate, fraction: f64) -> Result<FareEstimate, FareError> {
    validate_fraction(fraction)?;

    let mut adjusted = estimate.clone();
    if fraction > 0.0 {
        adjusted.cost = estimate.cost * (1.0 - fraction);
    }
    Ok(adjusted)
}

/// Maps a daily activity signal to a discount fraction.
pub trait DiscountPolicy: Send + Sync {
    fn discount_fraction(&self, daily_steps: u32, has_commuter_pass: bool) -> f64;
}

/// Step count threshold and the fraction it unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepTier {
    pub min_steps: u32,
    pub fraction: f64,
}

/// Tiered step-count discount, optionally gated on a commuter pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTierPolicy {
    pub requires_commuter_pass: bool,
    pub tiers: Vec<StepTier>,
}

impl Default for StepTierPolicy {
    fn default() -> Self {
        Self {
            requires_commuter_pass: true,
            tiers: vec![
                StepTier {
                    min_steps: 5_000,
                    fraction: 0.05,
                },
                StepTier {
                    min_steps: 7_500,
                    fraction: 0.10,
                },
                StepTier {
                    min_steps: 10_000,
                    fraction: 0.20,
                },
            ],
        }
    }
}

impl StepTierPolicy {
    pub fn validate(&self) -> Result<(), FareError> {
        for tier in &self.tiers {
            validate_fraction(tier.fraction).map_err(|_| {
                FareError::InvalidConfig(format!(
                    "discount tier at {} steps has fraction {} outside [0, 1)",
                    tier.min_steps, tier.fraction
                ))
            })?;
        }
        Ok(())
    }
}

impl DiscountPolicy for StepTierPolicy {
    fn discount_fraction(&self, daily_steps: u32, has_commuter_pass: bool) -> f64 {
        if self.requires_commuter_pass && !has_commuter_pass {
            return 0.0;
        }
        // Highest threshold reached wins, regardless of declaration order.
        self.tiers
            .iter()
            .filter(|tier| daily_steps >= tier.min_steps)
            .max_by_key(|tier| tier.min_steps)
            .map_or(0.0, |tier| tier.fraction)
    }
}
