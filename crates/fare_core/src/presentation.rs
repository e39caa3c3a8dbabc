//! Render-time formatting. Costs are only rounded here, never upstream.

use crate::pricing::FareEstimate;

/// Currency symbol prefixed to rendered costs.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Cost rounded to the nearest whole currency unit.
pub fn display_cost(cost: f64) -> i64 {
    cost.round() as i64
}

pub fn format_cost(cost: f64) -> String {
    format!("{CURRENCY_SYMBOL}{}", display_cost(cost))
}

pub fn format_eta(eta_minutes: u32) -> String {
    format!("~{eta_minutes} mins")
}

/// One comparison row, e.g. `"Ola - Car  ~26 mins  ₹176"`. Unavailable rows
/// show the reason verbatim instead of a price.
pub fn render_line(estimate: &FareEstimate) -> String {
    let label = format!("{} - {}", estimate.provider, estimate.vehicle_class);
    if estimate.available {
        format!(
            "{label}  {}  {}",
            format_eta(estimate.eta_minutes),
            format_cost(estimate.cost)
        )
    } else {
        let reason = estimate.unavailable_reason.as_deref().unwrap_or("Not available");
        format!("{label}  {reason}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProviderId, VehicleClass};

    #[test]
    fn rounds_only_at_render_time() {
        assert_eq!(display_cost(175.75), 176);
        assert_eq!(display_cost(111.49), 111);
        assert_eq!(format_cost(83.30), "₹83");
    }

    #[test]
    fn unavailable_row_shows_reason_verbatim() {
        let estimate = FareEstimate {
            provider: ProviderId::new("Rapido"),
            vehicle_class: VehicleClass::Bike,
            cost: 160.0,
            eta_minutes: 43,
            available: false,
            unavailable_reason: Some("Not available for distances over 15km".to_string()),
        };
        assert_eq!(
            render_line(&estimate),
            "Rapido - Bike  Not available for distances over 15km"
        );
    }

    #[test]
    fn available_row_shows_eta_and_price() {
        let estimate = FareEstimate {
            provider: ProviderId::new("Ola"),
            vehicle_class: VehicleClass::Car,
            cost: 175.75,
            eta_minutes: 26,
            available: true,
            unavailable_reason: None,
        };
        assert_eq!(render_line(&estimate), "Ola - Car  ~26 mins  ₹176");
    }
}
