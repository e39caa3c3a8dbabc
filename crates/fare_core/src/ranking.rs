//! Ranking of fare estimates.
//!
//! Available estimates are sorted by the chosen criterion with the other one as
//! tie-break, then the preferred vehicle class is moved ahead by a stable
//! partition. Unavailable estimates follow in their input order.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::VehicleClass;
use crate::pricing::FareEstimate;

/// Primary sort key for available rides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    #[default]
    Cost,
    Time,
}

impl FromStr for SortCriterion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cost" | "price" => Ok(SortCriterion::Cost),
            "time" | "eta" => Ok(SortCriterion::Time),
            other => Err(format!("unknown sort criterion '{other}' (expected cost or time)")),
        }
    }
}

/// Ordered comparison output: ranked available entries, then unavailable ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    available: Vec<FareEstimate>,
    unavailable: Vec<FareEstimate>,
}

impl RankedResult {
    pub fn available(&self) -> &[FareEstimate] {
        &self.available
    }

    pub fn unavailable(&self) -> &[FareEstimate] {
        &self.unavailable
    }

    /// The "most efficient" ride, if any is bookable.
    pub fn top(&self) -> Option<&FareEstimate> {
        self.available.first()
    }

    pub fn len(&self) -> usize {
        self.available.len() + self.unavailable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.unavailable.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FareEstimate> {
        self.available.iter().chain(self.unavailable.iter())
    }

    pub fn into_vec(self) -> Vec<FareEstimate> {
        let mut ordered = self.available;
        ordered.extend(self.unavailable);
        ordered
    }
}

fn compare_by(criterion: SortCriterion, a: &FareEstimate, b: &FareEstimate) -> Ordering {
    let by_cost = a.cost.total_cmp(&b.cost);
    let by_eta = a.eta_minutes.cmp(&b.eta_minutes);
    match criterion {
        SortCriterion::Cost => by_cost.then(by_eta),
        SortCriterion::Time => by_eta.then(by_cost),
    }
}

/// Rank estimates for presentation. Never fails; the output is always a
/// permutation of the input.
pub fn rank(
    estimates: impl IntoIterator<Item = FareEstimate>,
    criterion: SortCriterion,
    preferred_class: Option<VehicleClass>,
) -> RankedResult {
    let (mut available, unavailable): (Vec<_>, Vec<_>) =
        estimates.into_iter().partition(|estimate| estimate.available);

    // `sort_by` is stable: full ties keep input order.
    available.sort_by(|a, b| compare_by(criterion, a, b));

    if let Some(preferred) = preferred_class {
        let (mut head, tail): (Vec<_>, Vec<_>) = available
            .into_iter()
            .partition(|estimate| estimate.vehicle_class == preferred);
        head.extend(tail);
        available = head;
    }

    RankedResult {
        available,
        unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProviderId;

    fn offer(provider: &str, class: VehicleClass, cost: f64, eta: u32) -> FareEstimate {
        FareEstimate {
            provider: ProviderId::new(provider),
            vehicle_class: class,
            cost,
            eta_minutes: eta,
            available: true,
            unavailable_reason: None,
        }
    }

    fn providers(result: &RankedResult) -> Vec<&str> {
        result.iter().map(|e| e.provider.as_str()).collect()
    }

    #[test]
    fn time_criterion_breaks_cost_tie_by_eta() {
        let a = offer("A", VehicleClass::Car, 100.0, 20);
        let b = offer("B", VehicleClass::Car, 100.0, 15);
        let ranked = rank(vec![a, b], SortCriterion::Time, None);
        assert_eq!(providers(&ranked), vec!["B", "A"]);
    }

    #[test]
    fn cost_criterion_breaks_cost_tie_by_eta() {
        let a = offer("A", VehicleClass::Car, 100.0, 20);
        let b = offer("B", VehicleClass::Car, 100.0, 15);
        let ranked = rank(vec![a, b], SortCriterion::Cost, None);
        assert_eq!(providers(&ranked), vec!["B", "A"]);
    }

    #[test]
    fn time_criterion_breaks_eta_tie_by_cost() {
        let a = offer("A", VehicleClass::Car, 120.0, 20);
        let b = offer("B", VehicleClass::Auto, 90.0, 20);
        let ranked = rank(vec![a, b], SortCriterion::Time, None);
        assert_eq!(providers(&ranked), vec!["B", "A"]);
    }

    #[test]
    fn preferred_class_floats_ahead_without_reordering_others() {
        let a = offer("A", VehicleClass::Car, 100.0, 20);
        let b = offer("B", VehicleClass::Auto, 90.0, 30);
        let c = offer("C", VehicleClass::Bike, 95.0, 25);

        let plain = rank(vec![a.clone(), b.clone(), c.clone()], SortCriterion::Cost, None);
        assert_eq!(providers(&plain), vec!["B", "C", "A"]);

        let preferred = rank(vec![a, b, c], SortCriterion::Cost, Some(VehicleClass::Car));
        assert_eq!(providers(&preferred), vec!["A", "B", "C"]);
        assert_eq!(preferred.top().map(|e| e.provider.as_str()), Some("A"));
    }

    #[test]
    fn preferred_entries_keep_their_sorted_order() {
        let ranked = rank(
            vec![
                offer("Uber", VehicleClass::Car, 185.0, 25),
                offer("Rapido", VehicleClass::Bike, 83.0, 20),
                offer("Ola", VehicleClass::Car, 175.0, 26),
            ],
            SortCriterion::Cost,
            Some(VehicleClass::Car),
        );
        assert_eq!(providers(&ranked), vec!["Ola", "Uber", "Rapido"]);
    }

    #[test]
    fn unavailable_entries_follow_in_input_order() {
        let mut far_bike = offer("Rapido", VehicleClass::Bike, 10.0, 5);
        far_bike.available = false;
        let mut far_auto = offer("Ola", VehicleClass::Auto, 5.0, 5);
        far_auto.available = false;

        let ranked = rank(
            vec![
                far_bike,
                offer("Uber", VehicleClass::Car, 300.0, 40),
                far_auto,
            ],
            SortCriterion::Cost,
            Some(VehicleClass::Bike),
        );

        assert_eq!(providers(&ranked), vec!["Uber", "Rapido", "Ola"]);
        assert_eq!(ranked.available().len(), 1);
        assert_eq!(ranked.unavailable().len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let ranked = rank(Vec::new(), SortCriterion::Time, Some(VehicleClass::Car));
        assert!(ranked.is_empty());
        assert!(ranked.top().is_none());
    }

    #[test]
    fn all_unavailable_has_no_top() {
        let mut only = offer("Rapido", VehicleClass::Bike, 10.0, 5);
        only.available = false;
        let ranked = rank(vec![only], SortCriterion::Cost, None);
        assert!(ranked.top().is_none());
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let ranked = rank(
            vec![
                offer("Ola", VehicleClass::Auto, 100.0, 15),
                offer("Uber", VehicleClass::Auto, 100.0, 15),
            ],
            SortCriterion::Cost,
            None,
        );
        assert_eq!(providers(&ranked), vec!["Ola", "Uber"]);
    }

    #[test]
    fn criterion_parses_aliases() {
        assert_eq!("ETA".parse::<SortCriterion>(), Ok(SortCriterion::Time));
        assert_eq!("price".parse::<SortCriterion>(), Ok(SortCriterion::Cost));
        assert!("distance".parse::<SortCriterion>().is_err());
    }
}
