//! Test helpers for common fixtures.
//!
//! Shared builders so unit tests, integration tests and benches construct
//! estimates and configurations the same way.

use crate::catalog::{ProviderId, VehicleClass};
use crate::config::{PricingConfig, RuleEntry};
use crate::pricing::{unavailable_reason, DistanceLimits, FareEstimate, PricingRule};

/// The "Provider X" tariff: base 60, 15 per km, 30 km/h.
pub const TEST_RULE: PricingRule = PricingRule {
    base_fare: 60.0,
    per_km_rate: 15.0,
    average_speed_kmh: 30.0,
};

/// An available estimate with the given cost and ETA.
pub fn test_estimate(
    provider: &str,
    vehicle_class: VehicleClass,
    cost: f64,
    eta_minutes: u32,
) -> FareEstimate {
    FareEstimate {
        provider: ProviderId::new(provider),
        vehicle_class,
        cost,
        eta_minutes,
        available: true,
        unavailable_reason: None,
    }
}

/// An estimate that exceeded a class limit of `max_km`.
pub fn test_unavailable_estimate(
    provider: &str,
    vehicle_class: VehicleClass,
    cost: f64,
    max_km: f64,
) -> FareEstimate {
    FareEstimate {
        available: false,
        unavailable_reason: Some(unavailable_reason(max_km)),
        ..test_estimate(provider, vehicle_class, cost, 0)
    }
}

/// Single-rule configuration for provider `X` with the default limits.
pub fn single_rule_config(vehicle_class: VehicleClass) -> PricingConfig {
    PricingConfig {
        rules: vec![RuleEntry::new("X", vehicle_class, TEST_RULE)],
        distance_limits: DistanceLimits::default(),
        ..PricingConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_estimate_mentions_limit() {
        let estimate = test_unavailable_estimate("Rapido", VehicleClass::Bike, 90.0, 15.0);
        assert!(!estimate.available);
        assert_eq!(
            estimate.unavailable_reason.as_deref(),
            Some("Not available for distances over 15km")
        );
    }

    #[test]
    fn single_rule_config_is_valid() {
        single_rule_config(VehicleClass::Car)
            .validate()
            .expect("valid config");
    }
}
