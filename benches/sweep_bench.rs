//! Benchmarks for the finite strip solver

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fsm_eigenvalue::prelude::*;

fn create_plate_model(parts: u32) -> StripModel {
    let width = 100.0;
    let nodal_lines = (0..=parts)
        .map(|i| NodalLine::new(i + 1, width * i as f64 / parts as f64, 0.0))
        .collect();
    let strips: Vec<_> = (1..=parts).map(|i| StripSpec::new(i, i + 1, "steel")).collect();

    StripModel::build(
        nodal_lines,
        &strips,
        vec![("steel".to_string(), Material::steel())],
        BeamType::SimplySupported,
    )
    .unwrap()
}

fn benchmark_single_iteration(c: &mut Criterion) {
    let model = create_plate_model(1);
    let integrals = IntegralTable::simply_supported([1]);

    c.bench_function("single_strip_iteration", |b| {
        b.iter(|| {
            let result = perform_iteration(&model, &integrals, black_box(100.0), 1.0, 1, GoverningRule::MinSigned);
            black_box(result.unwrap());
        })
    });
}

fn benchmark_fine_iteration(c: &mut Criterion) {
    let model = create_plate_model(20);
    let integrals = IntegralTable::simply_supported([1]);

    c.bench_function("plate_20_strips_iteration", |b| {
        b.iter(|| {
            let result = perform_iteration(&model, &integrals, black_box(500.0), 1.0, 1, GoverningRule::MinSigned);
            black_box(result.unwrap());
        })
    });
}

fn benchmark_sweep(c: &mut Criterion) {
    let model = Arc::new(create_plate_model(8));
    let space = SearchSpace::from_ranges([100.0, 1000.0, 100.0], [1.0, 3.0, 0.5], [1.0, 5.0, 1.0]).unwrap();
    let integrals = Arc::new(IntegralTable::simply_supported(space.m.iter().copied()));

    c.bench_function("plate_8_strips_sweep_10x5x5", |b| {
        b.iter(|| {
            let points = sweep(&space, Arc::clone(&model), Arc::clone(&integrals), &SweepOptions::default())
                .unwrap()
                .collect::<FsmResult<Vec<_>>>();
            black_box(points.unwrap());
        })
    });
}

criterion_group!(benches, benchmark_single_iteration, benchmark_fine_iteration, benchmark_sweep);

criterion_main!(benches);
