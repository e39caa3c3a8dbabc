//! End-to-end comparison: estimate every configured ride, discount, rank.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::catalog::{ProviderId, VehicleClass};
use crate::config::PricingConfig;
use crate::discount::{apply_discount, validate_fraction, DiscountPolicy};
use crate::error::FareError;
use crate::pricing::{estimate_with_rule, validate_distance, FareEstimate};
use crate::ranking::{rank, RankedResult, SortCriterion};

/// One user-initiated comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub distance_km: f64,
    #[serde(default)]
    pub sort_criterion: SortCriterion,
    #[serde(default)]
    pub preferred_class: Option<VehicleClass>,
    #[serde(default)]
    pub discount_fraction: f64,
}

impl ComparisonRequest {
    pub fn new(distance_km: f64) -> Self {
        Self {
            distance_km,
            sort_criterion: SortCriterion::Cost,
            preferred_class: None,
            discount_fraction: 0.0,
        }
    }

    pub fn with_sort_criterion(mut self, criterion: SortCriterion) -> Self {
        self.sort_criterion = criterion;
        self
    }

    pub fn with_preferred_class(mut self, class: VehicleClass) -> Self {
        self.preferred_class = Some(class);
        self
    }

    pub fn with_discount_fraction(mut self, fraction: f64) -> Self {
        self.discount_fraction = fraction;
        self
    }

    /// Resolve the discount from an activity signal through `policy`.
    pub fn with_activity_discount(
        self,
        policy: &dyn DiscountPolicy,
        daily_steps: u32,
        has_commuter_pass: bool,
    ) -> Self {
        self.with_discount_fraction(policy.discount_fraction(daily_steps, has_commuter_pass))
    }

    pub fn validate(&self) -> Result<(), FareError> {
        validate_distance(self.distance_km)?;
        validate_fraction(self.discount_fraction)
    }
}

/// Runs comparisons against a fixed, validated pricing configuration.
#[derive(Debug, Clone, Default)]
pub struct FareComparator {
    config: PricingConfig,
}

impl FareComparator {
    /// Fails with [`FareError::InvalidConfig`] when `config` would produce
    /// meaningless estimates (zero speeds, non-finite limits, ...).
    pub fn new(config: PricingConfig) -> Result<Self, FareError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Estimate and discount every configured ride, in configuration order.
    /// The discount is applied regardless of availability.
    pub fn estimates(&self, request: &ComparisonRequest) -> Result<Vec<FareEstimate>, FareError> {
        request.validate()?;

        let mut estimates = Vec::with_capacity(self.config.rules.len());
        for entry in &self.config.rules {
            let estimate = estimate_with_rule(
                &entry.provider,
                entry.vehicle_class,
                &entry.rule,
                &self.config.distance_limits,
                request.distance_km,
            )?;
            let adjusted = apply_discount(&estimate, request.discount_fraction)?;
            trace!(
                provider = %adjusted.provider,
                class = %adjusted.vehicle_class,
                cost = adjusted.cost,
                eta_minutes = adjusted.eta_minutes,
                available = adjusted.available,
                "estimated fare"
            );
            estimates.push(adjusted);
        }
        Ok(estimates)
    }

    pub fn compare(&self, request: &ComparisonRequest) -> Result<RankedResult, FareError> {
        let estimates = self.estimates(request)?;
        let ranked = rank(estimates, request.sort_criterion, request.preferred_class);
        debug!(
            distance_km = request.distance_km,
            criterion = ?request.sort_criterion,
            preferred = ?request.preferred_class,
            available = ranked.available().len(),
            unavailable = ranked.unavailable().len(),
            "ranked fare comparison"
        );
        if ranked.top().is_none() {
            warn!(distance_km = request.distance_km, "no rides available for trip");
        }
        Ok(ranked)
    }

    /// Compare only the given provider/class pairs, skipping pairs with no
    /// configured rule.
    pub fn compare_selected<'a>(
        &self,
        request: &ComparisonRequest,
        selection: impl IntoIterator<Item = (&'a ProviderId, VehicleClass)>,
    ) -> Result<RankedResult, FareError> {
        request.validate()?;

        let mut estimates = Vec::new();
        for (provider, class) in selection {
            match self.config.estimate(provider, class, request.distance_km) {
                Ok(estimate) => {
                    estimates.push(apply_discount(&estimate, request.discount_fraction)?)
                }
                Err(error) if error.is_unsupported_combination() => {
                    warn!(%provider, %class, "skipping ride with no pricing rule");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(rank(estimates, request.sort_criterion, request.preferred_class))
    }
}

/// How much cheaper `chosen` is than `reference`; zero if it is not cheaper.
pub fn savings_versus(chosen: &FareEstimate, reference: &FareEstimate) -> f64 {
    (reference.cost - chosen.cost).max(0.0)
}
