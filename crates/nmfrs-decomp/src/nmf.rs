//! NMF (Non-negative Matrix Factorization)
//!
//! Factorizes a non-negative matrix V (m × n) into non-negative factors
//!
//! V ≈ W H
//!
//! Where:
//! - W ∈ ℝ₊^(m×r) holds the basis vectors as columns
//! - H ∈ ℝ₊^(r×n) holds the encoding of each column of V
//! - r is the factorization rank
//!
//! Each iteration applies one [`UpdateRule`] step, then the
//! [`ConvergenceTracker`] measures ‖V − WH‖ and decides whether to stop.
//!
//! The loop runs on V divided by its largest entry, with W divided to match,
//! and scales W back before returning. All three rules are equivariant under
//! this scaling, so the result depends on the shape of V and not on its
//! magnitude, and inputs near the ends of the float range cannot overflow.
//!
//! # SciRS2 Integration
//!
//! Arrays use `scirs2_core::ndarray_ext`, random initialization uses
//! `scirs2_core::random`.

use scirs2_core::ndarray_ext::{Array2, ScalarOperand};
use scirs2_core::numeric::{Float, NumAssign};
use scirs2_core::random::{thread_rng, Rng, SeedableRng, StdRng};
use std::fmt::Display;
use std::iter::Sum;

use crate::config::NmfConfig;
use crate::convergence::{frobenius_norm, frobenius_residue, ConvergenceTracker, StopReason};
use crate::error::NmfError;
use crate::update::{scalar, UpdateRule};

/// NMF result
#[derive(Debug, Clone)]
pub struct NmfDecomp<T> {
    /// Basis factor, shape (m, r)
    pub w: Array2<T>,

    /// Encoding factor, shape (r, n)
    pub h: Array2<T>,

    /// Final residue ‖V − WH‖
    pub residue: T,

    /// Number of iterations performed
    pub iters: usize,

    /// Why the loop stopped
    pub stop_reason: StopReason,
}

impl<T> NmfDecomp<T>
where
    T: Float + ScalarOperand + 'static,
{
    /// Factorization rank r
    pub fn rank(&self) -> usize {
        self.w.ncols()
    }

    /// Reconstruct the approximation W·H
    pub fn reconstruct(&self) -> Array2<T> {
        self.w.dot(&self.h)
    }

    /// Relative error ‖V − WH‖ / ‖V‖
    ///
    /// Returns 0 when V is all zeros.
    pub fn relative_error(&self, v: &Array2<T>) -> T {
        let norm = frobenius_norm(v);
        if norm > T::zero() {
            frobenius_residue(v, &self.w, &self.h) / norm
        } else {
            T::zero()
        }
    }
}

/// Factorize `v` into non-negative `W` (m × r) and `H` (r × n)
///
/// # Arguments
///
/// * `v` - Input matrix (m × n) with finite, non-negative entries
/// * `config` - Rank, update rule, iteration bounds and seed
/// * `initial_w` - Optional starting W of shape (m, r); copied, never mutated
/// * `initial_h` - Optional starting H of shape (r, n); copied, never mutated
///
/// Factors that are not supplied are drawn uniformly from [0, 1) against V
/// normalized to a largest entry of 1; a drawn W is therefore scaled by the
/// largest entry of V in the result.
///
/// # Errors
///
/// Returns error before any iteration if:
/// - The rank is 0 ([`NmfError::InvalidRank`])
/// - `min_residue` is negative or not finite ([`NmfError::InvalidResidue`])
/// - V is empty or has a negative / non-finite entry ([`NmfError::InvalidInput`])
/// - A supplied factor has the wrong shape ([`NmfError::InvalidInitialFactorShape`])
///   or a negative / non-finite entry ([`NmfError::InvalidInput`])
///
/// # Complexity
///
/// Time: O(I × m × n × r) for the multiplicative rules, plus O(I × (m + n) × r³)
/// for ALS, where I is the number of iterations
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use nmfrs_decomp::{factorize, NmfConfig, UpdateRule};
///
/// let v = array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [3.0, 6.0, 9.0]];
/// let config = NmfConfig::new(1)
///     .with_rule(UpdateRule::AlternatingLeastSquares)
///     .with_seed(7);
///
/// let nmf = factorize(&v, &config, None, None)?;
/// assert_eq!(nmf.w.dim(), (3, 1));
/// assert_eq!(nmf.h.dim(), (1, 3));
/// assert!(nmf.relative_error(&v) < 1e-6);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn factorize<T>(
    v: &Array2<T>,
    config: &NmfConfig,
    initial_w: Option<&Array2<T>>,
    initial_h: Option<&Array2<T>>,
) -> Result<NmfDecomp<T>, NmfError>
where
    T: Float + NumAssign + Sum + ScalarOperand + Send + Sync + Display + 'static,
{
    config.validate()?;

    let (m, n) = v.dim();
    if m == 0 || n == 0 {
        return Err(NmfError::InvalidInput(format!(
            "input matrix is empty ({}x{})",
            m, n
        )));
    }
    check_nonnegative(v, "input matrix V")?;

    let rank = config.rank;
    if let Some(w0) = initial_w {
        check_shape("W", w0, (m, rank))?;
        check_nonnegative(w0, "initial W")?;
    }
    if let Some(h0) = initial_h {
        check_shape("H", h0, (rank, n))?;
        check_nonnegative(h0, "initial H")?;
    }

    let scale = input_scale(v);
    let v_unit = v.mapv(|x| x / scale);
    let initial_w_unit = initial_w.map(|w0| w0.mapv(|x| x / scale));
    let (mut w, mut h) = initialize_factors(
        initial_w_unit.as_ref(),
        initial_h,
        (m, n),
        rank,
        config.seed,
    );

    log::debug!(
        "NMF: {}x{} rank {} rule {} max_iterations {} min_residue {}",
        m,
        n,
        rank,
        config.rule,
        config.max_iterations,
        config.min_residue
    );

    let mut tracker =
        ConvergenceTracker::<T>::new(config.max_iterations, scalar(config.min_residue));
    let (residue, stop_reason) = loop {
        config.rule.step(&v_unit, &mut w, &mut h);

        let residue = tracker.evaluate(&v_unit, &w, &h) * scale;
        log::trace!("NMF iteration {}: residue {}", tracker.iterations() + 1, residue);

        if let Some(reason) = tracker.observe(residue) {
            break (residue, reason);
        }
    };

    w.mapv_inplace(|x| x * scale);

    log::info!(
        "NMF ({}) finished after {} iterations: {} (residue {})",
        config.rule,
        tracker.iterations(),
        stop_reason,
        residue
    );

    Ok(NmfDecomp {
        w,
        h,
        residue,
        iters: tracker.iterations(),
        stop_reason,
    })
}

/// Factorize `v` with random initial factors
///
/// Shorthand for [`factorize`] with a configuration built from the arguments
/// and no initial factors.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::Array2;
/// use nmfrs_decomp::{nmf, UpdateRule};
///
/// let v = Array2::from_shape_fn((8, 10), |(i, j)| ((i * 10 + j) % 7) as f64);
/// let result = nmf(&v, 5, UpdateRule::MultiplicativeDivergence, 200, 1e-5)?;
///
/// assert_eq!(result.w.dim(), (8, 5));
/// assert_eq!(result.h.dim(), (5, 10));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn nmf<T>(
    v: &Array2<T>,
    rank: usize,
    rule: UpdateRule,
    max_iterations: usize,
    min_residue: f64,
) -> Result<NmfDecomp<T>, NmfError>
where
    T: Float + NumAssign + Sum + ScalarOperand + Send + Sync + Display + 'static,
{
    let config = NmfConfig::new(rank)
        .with_rule(rule)
        .with_max_iterations(max_iterations)
        .with_min_residue(min_residue);
    factorize(v, &config, None, None)
}

fn check_shape<T>(
    factor: &'static str,
    matrix: &Array2<T>,
    expected: (usize, usize),
) -> Result<(), NmfError> {
    let actual = matrix.dim();
    if actual != expected {
        return Err(NmfError::InvalidInitialFactorShape {
            factor,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_nonnegative<T: Float>(matrix: &Array2<T>, what: &str) -> Result<(), NmfError> {
    for ((i, j), &x) in matrix.indexed_iter() {
        if !x.is_finite() || x < T::zero() {
            return Err(NmfError::InvalidInput(format!(
                "{} has a negative or non-finite entry at ({}, {})",
                what, i, j
            )));
        }
    }
    Ok(())
}

/// Largest entry of a validated V, or 1 when V is all zeros
fn input_scale<T: Float>(v: &Array2<T>) -> T {
    let max = v.iter().fold(T::zero(), |acc, &x| acc.max(x));
    if max > T::zero() {
        max
    } else {
        T::one()
    }
}

/// Copy supplied factors and draw the missing ones uniformly from [0, 1)
fn initialize_factors<T: Float>(
    initial_w: Option<&Array2<T>>,
    initial_h: Option<&Array2<T>>,
    (m, n): (usize, usize),
    rank: usize,
    seed: Option<u64>,
) -> (Array2<T>, Array2<T>) {
    if let (Some(w0), Some(h0)) = (initial_w, initial_h) {
        return (w0.to_owned(), h0.to_owned());
    }

    let seed = seed.unwrap_or_else(|| thread_rng().random::<u64>());
    let mut rng = StdRng::seed_from_u64(seed);

    let w = match initial_w {
        Some(w0) => w0.to_owned(),
        None => random_factor(&mut rng, (m, rank)),
    };
    let h = match initial_h {
        Some(h0) => h0.to_owned(),
        None => random_factor(&mut rng, (rank, n)),
    };
    (w, h)
}

fn random_factor<T: Float>(rng: &mut StdRng, shape: (usize, usize)) -> Array2<T> {
    Array2::from_shape_fn(shape, |_| scalar(rng.random::<f64>()))
}
