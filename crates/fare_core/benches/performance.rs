//! Performance benchmarks for fare_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fare_core::catalog::VehicleClass;
use fare_core::comparison::{ComparisonRequest, FareComparator};
use fare_core::ranking::{rank, SortCriterion};
use fare_core::test_helpers::test_estimate;

fn bench_comparison(c: &mut Criterion) {
    let comparator = FareComparator::default();
    let mut group = c.benchmark_group("comparison");
    for distance_km in [3.0, 12.0, 45.0] {
        group.bench_with_input(
            BenchmarkId::from_parameter(distance_km),
            &distance_km,
            |b, &distance_km| {
                let request = ComparisonRequest::new(distance_km)
                    .with_preferred_class(VehicleClass::Car)
                    .with_discount_fraction(0.1);
                b.iter(|| black_box(comparator.compare(&request)));
            },
        );
    }
    group.finish();
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");
    for size in [10_usize, 100, 1_000] {
        let estimates: Vec<_> = (0..size)
            .map(|i| {
                let class = VehicleClass::ALL[i % VehicleClass::ALL.len()];
                // Few distinct costs so tie-breaking is exercised.
                test_estimate("P", class, (i % 17) as f64 * 10.0, (i % 7) as u32 + 10)
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &estimates, |b, estimates| {
            b.iter(|| {
                black_box(rank(
                    estimates.clone(),
                    SortCriterion::Time,
                    Some(VehicleClass::Auto),
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_comparison, bench_ranking);
criterion_main!(benches);
