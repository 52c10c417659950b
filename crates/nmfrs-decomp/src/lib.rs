//! # nmfrs-decomp - Non-negative Matrix Factorization
//!
//! Iterative NMF solvers for dense, non-negative matrices.
//!
//! ## Overview
//!
//! NMF approximates a non-negative matrix V (m × n) by the product of two
//! non-negative factors:
//!
//! ```text
//! V ≈ W H,   W ∈ ℝ₊^(m×r),   H ∈ ℝ₊^(r×n)
//! ```
//!
//! **Use cases:**
//! - Topic modeling and document clustering
//! - Audio source separation (spectrogram factorization)
//! - Parts-based image representation
//! - Recommender systems on implicit feedback
//!
//! **Update rules** ([`UpdateRule`]):
//! - `multdist`: multiplicative update on the Frobenius distance ‖V − WH‖
//! - `multdiv`: multiplicative update on the generalized KL divergence
//! - `als`: alternating least squares with projection onto the non-negative orthant
//!
//! **Termination** ([`ConvergenceTracker`]): the residue ‖V − WH‖ is measured
//! after every iteration. The loop stops when it reaches `min_residue`, when its
//! relative improvement drops below `min_residue`, or after `max_iterations`
//! iterations (`0` = no cap).
//!
//! ## Quick Start
//!
//! ```
//! use scirs2_core::ndarray_ext::Array2;
//! use nmfrs_decomp::{factorize, NmfConfig, UpdateRule};
//!
//! let v = Array2::from_shape_fn((20, 12), |(i, j)| ((i + 2 * j) % 5) as f64 + 0.5);
//!
//! let config = NmfConfig::new(4)
//!     .with_rule(UpdateRule::MultiplicativeDistance)
//!     .with_max_iterations(500)
//!     .with_min_residue(1e-5)
//!     .with_seed(42);
//!
//! let nmf = factorize(&v, &config, None, None)?;
//!
//! println!("Stopped after {} iterations ({})", nmf.iters, nmf.stop_reason);
//! println!("Relative error: {:.4}", nmf.relative_error(&v));
//! assert_eq!(nmf.w.dim(), (20, 4));
//! assert_eq!(nmf.h.dim(), (4, 12));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ### Warm start
//!
//! Either factor can be supplied. Supplied factors are copied, so the caller's
//! arrays are left untouched, and the run is fully deterministic once both
//! are given.
//!
//! ```
//! use scirs2_core::ndarray_ext::Array2;
//! use nmfrs_decomp::{factorize, NmfConfig};
//!
//! let v = Array2::from_elem((6, 5), 1.0);
//! let w0 = Array2::from_elem((6, 2), 0.5);
//!
//! let nmf = factorize(&v, &NmfConfig::new(2), Some(&w0), None)?;
//! assert_eq!(nmf.h.dim(), (2, 5));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ### Untyped arguments
//!
//! [`NmfConfig::from_raw`] validates signed integers and rule names the way a
//! command-line front end receives them:
//!
//! ```
//! use nmfrs_decomp::{NmfConfig, NmfError};
//!
//! assert!(NmfConfig::from_raw(5, "als", 100, 1e-5).is_ok());
//! assert_eq!(NmfConfig::from_raw(0, "als", 100, 1e-5), Err(NmfError::InvalidRank(0)));
//! assert_eq!(
//!     NmfConfig::from_raw(5, "als", -1, 1e-5),
//!     Err(NmfError::InvalidIterationBound(-1))
//! );
//! assert!(matches!(
//!     NmfConfig::from_raw(5, "nope", 100, 1e-5),
//!     Err(NmfError::UnknownUpdateRule(_))
//! ));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`NmfConfig`], [`UpdateRule`] and [`StopReason`]
//!
//! ## SciRS2 Integration
//!
//! Dense arrays come from `scirs2_core::ndarray_ext`, least-squares solves from
//! `scirs2_linalg`, and random initialization from `scirs2_core::random`.
//! Direct use of `ndarray` or `rand` is forbidden per project policy.
//!
//! ## Logging
//!
//! Progress is reported through the `log` facade: one `debug` record per run
//! with the parameters, one `trace` record per iteration, one `info` record on
//! termination. Install any `log` backend to see them.
//!
//! ## References
//!
//! - Lee & Seung (2001), "Algorithms for Non-negative Matrix Factorization"
//! - Berry et al. (2007), "Algorithms and applications for approximate
//!   nonnegative matrix factorization"

pub mod config;
pub mod convergence;
pub mod error;
pub mod nmf;
pub mod update;


// Re-exports
pub use config::*;
pub use convergence::*;
pub use error::*;
pub use nmf::*;
pub use update::*;
