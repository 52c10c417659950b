//! Performance benchmarks for NMF update rules
//!
//! Each benchmark runs a fixed number of iterations (min_residue = 0) from the
//! same initial factors, so the timings compare per-iteration cost.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nmfrs_decomp::{factorize, NmfConfig, UpdateRule};
use scirs2_core::ndarray_ext::Array2;
use scirs2_core::random::{Rng, SeedableRng, StdRng};
use std::hint::black_box;

fn randu(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.random::<f64>())
}

// ============================================================================
// Update rule benchmarks
// ============================================================================

fn bench_update_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("nmf_update_rules");

    for &(size, rank) in &[(64, 8), (128, 16), (256, 32)] {
        let v = randu(size, size, 1);
        let w0 = randu(size, rank, 2);
        let h0 = randu(rank, size, 3);

        group.throughput(Throughput::Elements((size * size) as u64));

        for rule in UpdateRule::ALL {
            let config = NmfConfig::new(rank)
                .with_rule(rule)
                .with_max_iterations(10)
                .with_min_residue(0.0);

            group.bench_with_input(
                BenchmarkId::new(rule.as_str(), format!("{}x{}_r{}", size, size, rank)),
                &(&v, &w0, &h0),
                |b, (v, w0, h0)| {
                    b.iter(|| {
                        black_box(factorize(
                            black_box(*v),
                            black_box(&config),
                            Some(*w0),
                            Some(*h0),
                        ))
                    })
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Rank scaling
// ============================================================================

fn bench_rank_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("nmf_rank_scaling");
    group.sample_size(20);

    let size = 128;
    let v = randu(size, size, 4);

    for &rank in &[4, 16, 64] {
        let config = NmfConfig::new(rank)
            .with_max_iterations(10)
            .with_min_residue(0.0)
            .with_seed(5);

        group.bench_with_input(BenchmarkId::from_parameter(rank), &rank, |b, _| {
            b.iter(|| black_box(factorize(black_box(&v), &config, None, None)))
        });
    }

    group.finish();
}

criterion_group!(nmf_benches, bench_update_rules, bench_rank_scaling);
criterion_main!(nmf_benches);
