//! Pricing configuration: the rule table, distance limits and discount tiers.
//!
//! Loaded from TOML so that price changes do not need a rebuild:
//!
//! ```toml
//! [[rules]]
//! provider = "Uber"
//! vehicle_class = "car"
//! base_fare = 60.0
//! per_km_rate = 15.0
//! average_speed_kmh = 24.0
//!
//! [distance_limits]
//! bike = 15.0
//! auto = 40.0
//!
//! [discount]
//! requires_commuter_pass = true
//! tiers = [{ min_steps = 5000, fraction = 0.05 }]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{ProviderId, VehicleClass};
use crate::discount::StepTierPolicy;
use crate::error::FareError;
use crate::pricing::{estimate_with_rule, DistanceLimits, FareEstimate, PricingRule};

/// One row of the pricing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub provider: ProviderId,
    pub vehicle_class: VehicleClass,
    #[serde(flatten)]
    pub rule: PricingRule,
}

impl RuleEntry {
    pub fn new(provider: &str, vehicle_class: VehicleClass, rule: PricingRule) -> Self {
        Self {
            provider: ProviderId::new(provider),
            vehicle_class,
            rule,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub rules: Vec<RuleEntry>,
    #[serde(default)]
    pub distance_limits: DistanceLimits,
    #[serde(default)]
    pub discount: StepTierPolicy,
}

impl Default for PricingConfig {
    /// Mock tariff for the three providers the app ships with.
    fn default() -> Self {
        Self {
            rules: vec![
                RuleEntry::new("Uber", VehicleClass::Car, PricingRule::new(60.0, 15.0, 24.0)),
                RuleEntry::new("Uber", VehicleClass::Auto, PricingRule::new(35.0, 10.0, 20.0)),
                RuleEntry::new("Ola", VehicleClass::Car, PricingRule::new(55.0, 14.5, 23.0)),
                RuleEntry::new("Ola", VehicleClass::Auto, PricingRule::new(30.0, 9.5, 19.0)),
                RuleEntry::new("Rapido", VehicleClass::Bike, PricingRule::new(20.0, 7.0, 28.0)),
            ],
            distance_limits: DistanceLimits::default(),
            discount: StepTierPolicy::default(),
        }
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl PricingConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, FareError> {
        let config: PricingConfig = toml::from_str(raw)?;
        config.validate()?;
        debug!(rules = config.rules.len(), "loaded pricing configuration");
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FareError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| FareError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), FareError> {
        let mut seen = HashSet::new();
        for entry in &self.rules {
            let label = format!("{} {}", entry.provider, entry.vehicle_class);
            if entry.provider.as_str().trim().is_empty() {
                return Err(FareError::InvalidConfig(
                    "provider names must be non-empty".to_string(),
                ));
            }
            if !seen.insert((entry.provider.clone(), entry.vehicle_class)) {
                return Err(FareError::InvalidConfig(format!(
                    "duplicate pricing rule for {label}"
                )));
            }
            if !non_negative(entry.rule.base_fare) || !non_negative(entry.rule.per_km_rate) {
                return Err(FareError::InvalidConfig(format!(
                    "{label}: base_fare and per_km_rate must be non-negative"
                )));
            }
            if !positive(entry.rule.average_speed_kmh) {
                return Err(FareError::InvalidConfig(format!(
                    "{label}: average_speed_kmh must be positive"
                )));
            }
        }

        for class in VehicleClass::ALL {
            if let Some(max_km) = self.distance_limits.limit_for(class) {
                if !positive(max_km) {
                    return Err(FareError::InvalidConfig(format!(
                        "distance limit for {class} must be positive (got {max_km})"
                    )));
                }
            }
        }

        self.discount.validate()
    }

    pub fn rule(&self, provider: &ProviderId, vehicle_class: VehicleClass) -> Option<&PricingRule> {
        self.rules
            .iter()
            .find(|entry| &entry.provider == provider && entry.vehicle_class == vehicle_class)
            .map(|entry| &entry.rule)
    }

    /// Estimate one provider/class pair. A missing rule yields
    /// [`FareError::UnsupportedCombination`] so callers can skip it.
    pub fn estimate(
        &self,
        provider: &ProviderId,
        vehicle_class: VehicleClass,
        distance_km: f64,
    ) -> Result<FareEstimate, FareError> {
        let rule = self
            .rule(provider, vehicle_class)
            .ok_or_else(|| FareError::UnsupportedCombination {
                provider: provider.clone(),
                vehicle_class,
            })?;
        estimate_with_rule(
            provider,
            vehicle_class,
            rule,
            &self.distance_limits,
            distance_km,
        )
    }
}
