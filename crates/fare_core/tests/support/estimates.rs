use fare_core::catalog::VehicleClass;
use fare_core::pricing::FareEstimate;
use fare_core::test_helpers::{test_estimate, test_unavailable_estimate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG so every randomized check is reproducible.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_class(rng: &mut StdRng) -> VehicleClass {
    VehicleClass::ALL[rng.gen_range(0..VehicleClass::ALL.len())]
}

/// Random mix of available and unavailable estimates. Costs and ETAs are drawn
/// from small ranges so ties are common.
pub fn random_estimates(rng: &mut StdRng, count: usize) -> Vec<FareEstimate> {
    (0..count)
        .map(|index| {
            let provider = format!("P{index}");
            let class = random_class(rng);
            let cost = f64::from(rng.gen_range(8..12_u32)) * 10.0;
            if rng.gen_bool(0.2) {
                test_unavailable_estimate(&provider, class, cost, 15.0)
            } else {
                test_estimate(&provider, class, cost, rng.gen_range(10..14))
            }
        })
        .collect()
}

pub fn provider_names<'a>(estimates: impl IntoIterator<Item = &'a FareEstimate>) -> Vec<String> {
    estimates
        .into_iter()
        .map(|estimate| estimate.provider.to_string())
        .collect()
}
