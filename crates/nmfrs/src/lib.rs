//! # nmfrs - Non-negative Matrix Factorization for Rust
//!
//! This is the **meta crate** that re-exports the nmfrs components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use nmfrs::prelude::*;
//!
//! let v = Array2::from_shape_fn((10, 10), |(i, j)| ((i * j) % 4) as f64);
//! let config = NmfConfig::new(3).with_max_iterations(100).with_seed(1);
//!
//! let nmf = factorize(&v, &config, None, None)?;
//! assert_eq!(nmf.w.dim(), (10, 3));
//! assert_eq!(nmf.h.dim(), (3, 10));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Factorization ([`decomp`])
//!
//! NMF with multiplicative (distance and divergence) and alternating least
//! squares update rules, residue-based termination and warm starts.
//!
//! ```
//! use nmfrs::decomp::{nmf, UpdateRule};
//! use nmfrs::prelude::Array2;
//!
//! let v = Array2::from_elem((6, 4), 2.0);
//! let result = nmf(&v, 1, UpdateRule::AlternatingLeastSquares, 50, 1e-8).unwrap();
//! println!("Stopped after {} iterations: {}", result.iters, result.stop_reason);
//! ```
//!
//! ## Features
//!
//! - `serde`: Serialization of configuration types

// Re-export all components
pub use nmfrs_decomp as decomp;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use nmfrs::prelude::*;
    //!
    //! let config = NmfConfig::new(4).with_rule(UpdateRule::MultiplicativeDivergence);
    //! assert_eq!(config.rule.as_str(), "multdiv");
    //! ```

    // Dense matrix type
    pub use scirs2_core::ndarray_ext::Array2;

    // Factorization
    pub use crate::decomp::{
        factorize, nmf, ConvergenceTracker, NmfConfig, NmfDecomp, NmfError, StopReason,
        UpdateRule,
    };
}
