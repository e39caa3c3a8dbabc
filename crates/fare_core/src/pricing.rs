//! Fare estimation: linear per-(provider, class) pricing plus per-class distance limits.
//!
//! Formula: `cost = base_fare + distance_km * per_km_rate`, left unrounded.
//! ETA is `distance_km / average_speed_kmh` in whole minutes, rounded half up.

use serde::{Deserialize, Serialize};

use crate::catalog::{ProviderId, VehicleClass};
use crate::error::FareError;

/// Default maximum trip distance for bikes (km).
pub const DEFAULT_BIKE_LIMIT_KM: f64 = 15.0;

/// Default maximum trip distance for autos (km).
pub const DEFAULT_AUTO_LIMIT_KM: f64 = 40.0;

/// Linear pricing model for one provider/class pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    /// Flat fare charged for any trip.
    pub base_fare: f64,
    /// Rate per kilometre travelled.
    pub per_km_rate: f64,
    /// Average speed used to estimate trip duration.
    pub average_speed_kmh: f64,
}

impl PricingRule {
    pub fn new(base_fare: f64, per_km_rate: f64, average_speed_kmh: f64) -> Self {
        Self {
            base_fare,
            per_km_rate,
            average_speed_kmh,
        }
    }

    pub fn cost_for(&self, distance_km: f64) -> f64 {
        self.base_fare + distance_km * self.per_km_rate
    }

    pub fn eta_minutes_for(&self, distance_km: f64) -> u32 {
        if distance_km <= 0.0 {
            return 0;
        }
        // Non-negative input, so `round` (half away from zero) is half up.
        (distance_km / self.average_speed_kmh * 60.0).round() as u32
    }
}

/// Maximum distance each vehicle class may be booked for. `None` is unbounded,
/// including classes left out of a configured table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceLimits {
    pub bike: Option<f64>,
    pub auto: Option<f64>,
    pub car: Option<f64>,
}

impl Default for DistanceLimits {
    fn default() -> Self {
        Self {
            bike: Some(DEFAULT_BIKE_LIMIT_KM),
            auto: Some(DEFAULT_AUTO_LIMIT_KM),
            car: None,
        }
    }
}

impl DistanceLimits {
    /// No class is ever limited.
    pub fn unbounded() -> Self {
        Self {
            bike: None,
            auto: None,
            car: None,
        }
    }

    pub fn limit_for(&self, vehicle_class: VehicleClass) -> Option<f64> {
        match vehicle_class {
            VehicleClass::Bike => self.bike,
            VehicleClass::Auto => self.auto,
            VehicleClass::Car => self.car,
        }
    }

    pub fn permits(&self, vehicle_class: VehicleClass, distance_km: f64) -> bool {
        self.limit_for(vehicle_class)
            .map_or(true, |max_km| distance_km <= max_km)
    }
}

/// Cost and duration offered by one provider/class for a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareEstimate {
    pub provider: ProviderId,
    pub vehicle_class: VehicleClass,
    pub cost: f64,
    pub eta_minutes: u32,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}

impl FareEstimate {
    /// Short booking label, e.g. `"Bike via Rapido"`.
    pub fn summary(&self) -> String {
        format!("{} via {}", self.vehicle_class, self.provider)
    }
}

/// Message shown verbatim when a trip exceeds a class limit.
pub fn unavailable_reason(max_km: f64) -> String {
    format!("Not available for distances over {max_km}km")
}

pub(crate) fn validate_distance(distance_km: f64) -> Result<(), FareError> {
    if distance_km.is_finite() && distance_km >= 0.0 {
        Ok(())
    } else {
        Err(FareError::InvalidDistance(distance_km))
    }
}

/// Estimate a single fare from an explicit rule and limit table.
pub fn estimate_with_rule(
    provider: &ProviderId,
    vehicle_class: VehicleClass,
    rule: &PricingRule,
    limits: &DistanceLimits,
    distance_km: f64,
) -> Result<FareEstimate, FareError> {
    validate_distance(distance_km)?;

    let available = limits.permits(vehicle_class, distance_km);
    let reason = if available {
        None
    } else {
        limits.limit_for(vehicle_class).map(unavailable_reason)
    };

    Ok(FareEstimate {
        provider: provider.clone(),
        vehicle_class,
        cost: rule.cost_for(distance_km),
        eta_minutes: rule.eta_minutes_for(distance_km),
        available,
        unavailable_reason: reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ProviderId {
        ProviderId::new("X")
    }

    #[test]
    fn fare_includes_base_and_distance() {
        let rule = PricingRule::new(60.0, 15.0, 30.0);
        let estimate = estimate_with_rule(
            &provider(),
            VehicleClass::Car,
            &rule,
            &DistanceLimits::default(),
            10.0,
        )
        .expect("estimate");

        assert!((estimate.cost - 210.0).abs() < 1e-9);
        assert_eq!(estimate.eta_minutes, 20);
        assert!(estimate.available);
        assert_eq!(estimate.unavailable_reason, None);
    }

    #[test]
    fn eta_rounds_half_up() {
        // 1 km at 8 km/h is exactly 7.5 minutes.
        let slow = PricingRule::new(0.0, 0.0, 8.0);
        assert_eq!(slow.eta_minutes_for(1.0), 8);

        let rule = PricingRule::new(0.0, 0.0, 60.0);
        assert_eq!(rule.eta_minutes_for(2.4), 2);
        assert_eq!(rule.eta_minutes_for(0.0), 0);
    }

    #[test]
    fn bike_within_limit_is_available() {
        let rule = PricingRule::new(20.0, 7.0, 28.0);
        let estimate = estimate_with_rule(
            &provider(),
            VehicleClass::Bike,
            &rule,
            &DistanceLimits::default(),
            10.0,
        )
        .expect("estimate");
        assert!(estimate.available);
    }

    #[test]
    fn bike_at_limit_is_still_available() {
        let rule = PricingRule::new(20.0, 7.0, 28.0);
        let estimate = estimate_with_rule(
            &provider(),
            VehicleClass::Bike,
            &rule,
            &DistanceLimits::default(),
            DEFAULT_BIKE_LIMIT_KM,
        )
        .expect("estimate");
        assert!(estimate.available);
    }

    #[test]
    fn bike_over_limit_reports_threshold() {
        let rule = PricingRule::new(20.0, 7.0, 28.0);
        let estimate = estimate_with_rule(
            &provider(),
            VehicleClass::Bike,
            &rule,
            &DistanceLimits::default(),
            20.0,
        )
        .expect("estimate");

        assert!(!estimate.available);
        assert_eq!(
            estimate.unavailable_reason.as_deref(),
            Some("Not available for distances over 15km")
        );
        // cost is still computed for unavailable entries
        assert!((estimate.cost - 160.0).abs() < 1e-9);
    }

    #[test]
    fn unbounded_class_is_always_available() {
        let rule = PricingRule::new(60.0, 15.0, 25.0);
        let estimate = estimate_with_rule(
            &provider(),
            VehicleClass::Car,
            &rule,
            &DistanceLimits::default(),
            5_000.0,
        )
        .expect("estimate");
        assert!(estimate.available);
    }

    #[test]
    fn unbounded_limits_never_mark_unavailable() {
        let rule = PricingRule::new(20.0, 7.0, 28.0);
        let estimate = estimate_with_rule(
            &provider(),
            VehicleClass::Bike,
            &rule,
            &DistanceLimits::unbounded(),
            250.0,
        )
        .expect("estimate");
        assert!(estimate.available);
        assert_eq!(estimate.unavailable_reason, None);
    }

    #[test]
    fn fractional_limit_keeps_decimals_in_reason() {
        assert_eq!(
            unavailable_reason(12.5),
            "Not available for distances over 12.5km"
        );
    }

    #[test]
    fn negative_or_nan_distance_is_rejected() {
        let rule = PricingRule::new(60.0, 15.0, 25.0);
        for distance in [-1.0, f64::NAN, f64::INFINITY] {
            let result = estimate_with_rule(
                &provider(),
                VehicleClass::Car,
                &rule,
                &DistanceLimits::default(),
                distance,
            );
            assert!(matches!(result, Err(FareError::InvalidDistance(_))));
        }
    }

    #[test]
    fn summary_names_class_and_provider() {
        let rule = PricingRule::new(20.0, 7.0, 28.0);
        let estimate = estimate_with_rule(
            &ProviderId::new("Rapido"),
            VehicleClass::Bike,
            &rule,
            &DistanceLimits::default(),
            3.0,
        )
        .expect("estimate");
        assert_eq!(estimate.summary(), "Bike via Rapido");
    }
}
