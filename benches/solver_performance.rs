//! Performance benchmarks for the coverage solution paths
//!
//! The same saturation curve can be produced three ways, with very
//! different cost profiles:
//!
//! 1. **Closed form** (plug flow): one log/exp pair per point. The
//!    baseline; everything else is measured against it.
//! 2. **Stiff ODE integration** (well-stirred): adaptive implicit
//!    stepping, cost dominated by the saturation tail where the
//!    equation is stiffest.
//! 3. **Bounded Newton inversion** (well-stirred, point queries): a
//!    damped iteration per point, cost growing as the root approaches
//!    full coverage.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # All coverage benchmarks
//! cargo bench --bench solver_performance
//!
//! # Only the closed-form path
//! cargo bench --bench solver_performance closed_form
//!
//! # Stiffness scaling with Da
//! cargo bench --bench solver_performance stiffness
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ald_rs::nondim::{CoverageModel, PlugFlowMixed, SoftSatWellStirred, WellStirred};

// =================================================================================================
// Closed-form evaluation
// =================================================================================================

fn bench_closed_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("closed_form");

    for &points in &[500usize, 5_000, 50_000] {
        let model = PlugFlowMixed::new(20.0).unwrap();
        let times: Vec<f64> = (0..points).map(|i| 5.0 * i as f64 / points as f64).collect();

        group.bench_with_input(BenchmarkId::from_parameter(points), &times, |b, times| {
            b.iter(|| {
                let coverage = model.coverage_profile(black_box(times)).unwrap();
                black_box(coverage)
            })
        });
    }

    group.finish();
}

// =================================================================================================
// ODE integration vs Newton inversion
// =================================================================================================

fn bench_well_stirred_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("well_stirred");
    let model = WellStirred::new(20.0).unwrap();

    group.bench_function("ode_curve_500pts", |b| {
        b.iter(|| {
            let curve = model.saturation_curve(black_box(5.0), 0.01).unwrap();
            black_box(curve)
        })
    });

    group.bench_function("newton_inversion_100pts", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 1..=100 {
                let t = 5.0 * i as f64 / 100.0;
                acc += model.calc_coverage(black_box(t)).unwrap();
            }
            black_box(acc)
        })
    });

    group.finish();
}

// =================================================================================================
// Stiffness scaling
// =================================================================================================

fn bench_stiffness_scaling(c: &mut Criterion) {
    // Higher Da sharpens the saturation transition and forces the
    // adaptive integrator onto smaller steps.
    let mut group = c.benchmark_group("stiffness");

    for &da in &[10.0, 100.0, 1000.0] {
        let model = WellStirred::new(da).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(da as u64), &model, |b, model| {
            b.iter(|| {
                let curve = model.saturation_curve(black_box(5.0), 0.01).unwrap();
                black_box(curve)
            })
        });
    }

    group.finish();
}

// =================================================================================================
// Two-pathway overhead
// =================================================================================================

fn bench_soft_saturation(c: &mut Criterion) {
    let mut group = c.benchmark_group("soft_saturation");
    let model = SoftSatWellStirred::new(20.0, 0.5, 0.8, 0.2).unwrap();

    group.bench_function("curve_500pts", |b| {
        b.iter(|| {
            let curve = model.saturation_curve(black_box(5.0), 0.01).unwrap();
            black_box(curve)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_closed_form,
    bench_well_stirred_paths,
    bench_stiffness_scaling,
    bench_soft_saturation
);
criterion_main!(benches);
