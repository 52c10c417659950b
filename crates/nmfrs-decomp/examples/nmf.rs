//! NMF (Non-negative Matrix Factorization) Example
//!
//! This example factorizes a synthetic low-rank matrix with each update rule,
//! then shows warm starts and the effect of the stopping parameters.
//!
//! Run with:
//! ```bash
//! cargo run --example nmf
//! ```

use nmfrs_decomp::{factorize, NmfConfig, UpdateRule};
use scirs2_core::ndarray_ext::Array2;
use scirs2_core::random::{Rng, SeedableRng, StdRng};

fn randu(rows: usize, cols: usize, rng: &mut StdRng) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.random::<f64>())
}

fn main() -> anyhow::Result<()> {
    println!("{}", "=".repeat(80));
    println!("NMF Example");
    println!("{}", "=".repeat(80));
    println!();

    let mut rng = StdRng::seed_from_u64(2024);

    // ========================================================================
    // Example 1: Compare update rules on a rank-6 matrix
    // ========================================================================
    println!("Example 1: Comparing update rules");
    println!("{}", "-".repeat(80));

    let (m, n, true_rank) = (60, 40, 6);
    let w_true = randu(m, true_rank, &mut rng);
    let h_true = randu(true_rank, n, &mut rng);
    let v = w_true.dot(&h_true);

    println!("Input shape: {:?}", v.dim());
    println!("True rank: {}", true_rank);
    println!();

    for rule in UpdateRule::ALL {
        let config = NmfConfig::new(true_rank)
            .with_rule(rule)
            .with_max_iterations(500)
            .with_min_residue(1e-6)
            .with_seed(7);

        let start = std::time::Instant::now();
        let nmf = factorize(&v, &config, None, None)?;
        let elapsed = start.elapsed();

        println!(
            "  {:<9} iters={:<4} residue={:.6} rel_error={:.6} ({}) time={:.2}ms",
            rule.as_str(),
            nmf.iters,
            nmf.residue,
            nmf.relative_error(&v),
            nmf.stop_reason,
            elapsed.as_secs_f64() * 1000.0
        );
    }
    println!();

    // ========================================================================
    // Example 2: Warm start from a supplied W
    // ========================================================================
    println!("Example 2: Warm start");
    println!("{}", "-".repeat(80));

    let w0 = randu(m, true_rank, &mut rng);
    let config = NmfConfig::new(true_rank).with_max_iterations(200);
    let nmf = factorize(&v, &config, Some(&w0), None)?;

    println!("  W shape: {:?}", nmf.w.dim());
    println!("  H shape: {:?}", nmf.h.dim());
    println!("  Residue after {} iterations: {:.6}", nmf.iters, nmf.residue);
    println!();

    // ========================================================================
    // Example 3: Effect of min_residue
    // ========================================================================
    println!("Example 3: Effect of min_residue");
    println!("{}", "-".repeat(80));

    let h0 = randu(true_rank, n, &mut rng);
    for min_residue in [1.0, 1e-2, 1e-4, 1e-6] {
        let config = NmfConfig::new(true_rank)
            .with_max_iterations(2000)
            .with_min_residue(min_residue);
        let nmf = factorize(&v, &config, Some(&w0), Some(&h0))?;
        println!(
            "  min_residue={:<8e} iters={:<5} residue={:.6}",
            min_residue, nmf.iters, nmf.residue
        );
    }
    println!();

    // ========================================================================
    // Example 4: Arguments from a command-line front end
    // ========================================================================
    println!("Example 4: Untyped arguments");
    println!("{}", "-".repeat(80));

    for (rank, rule, max_iterations) in [(5, "als", 100), (0, "als", 100), (5, "svd", 100)] {
        match NmfConfig::from_raw(rank, rule, max_iterations, 1e-5) {
            Ok(config) => println!("  ({}, {:?}) -> {:?}", rank, rule, config),
            Err(e) => println!("  ({}, {:?}) -> error: {}", rank, rule, e),
        }
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("NMF Example Complete!");
    println!("{}", "=".repeat(80));

    Ok(())
}
