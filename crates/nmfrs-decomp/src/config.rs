//! Factorization configuration
//!
//! [`NmfConfig`] carries the rank, update rule and iteration bounds of one
//! factorization. [`NmfConfig::from_raw`] binds loosely-typed arguments (signed
//! integers, rule names) as they arrive from a command line or a foreign
//! binding, rejecting out-of-range values with a typed [`NmfError`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::NmfError;
use crate::update::UpdateRule;

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Default residue threshold
pub const DEFAULT_MIN_RESIDUE: f64 = 1e-5;

/// Configuration for [`factorize`](crate::factorize)
///
/// # Examples
///
/// ```
/// use nmfrs_decomp::{NmfConfig, UpdateRule};
///
/// let config = NmfConfig::new(5)
///     .with_rule(UpdateRule::AlternatingLeastSquares)
///     .with_max_iterations(200)
///     .with_min_residue(1e-6)
///     .with_seed(42);
///
/// assert_eq!(config.rank, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NmfConfig {
    /// Number of components r (columns of W, rows of H)
    pub rank: usize,

    /// Update rule applied each iteration
    pub rule: UpdateRule,

    /// Iteration cap; 0 leaves the loop bounded only by the residue tests
    pub max_iterations: usize,

    /// Residue threshold, also used as the relative-improvement tolerance
    pub min_residue: f64,

    /// Seed for random initialization of factors the caller does not supply
    pub seed: Option<u64>,
}

impl NmfConfig {
    /// Configuration with the given rank and default rule and bounds
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            rule: UpdateRule::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            min_residue: DEFAULT_MIN_RESIDUE,
            seed: None,
        }
    }

    /// Set the update rule
    pub fn with_rule(mut self, rule: UpdateRule) -> Self {
        self.rule = rule;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the residue threshold
    pub fn with_min_residue(mut self, min_residue: f64) -> Self {
        self.min_residue = min_residue;
        self
    }

    /// Seed the random initialization
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a configuration from untyped arguments
    ///
    /// # Errors
    ///
    /// - [`NmfError::InvalidRank`] if `rank <= 0`
    /// - [`NmfError::InvalidIterationBound`] if `max_iterations < 0`
    /// - [`NmfError::UnknownUpdateRule`] if `rule` is not "multdist", "multdiv" or "als"
    /// - [`NmfError::InvalidResidue`] if `min_residue` is negative or not finite
    ///
    /// # Examples
    ///
    /// ```
    /// use nmfrs_decomp::{NmfConfig, NmfError};
    ///
    /// let config = NmfConfig::from_raw(5, "multdiv", 100, 1e-5).unwrap();
    /// assert_eq!(config.max_iterations, 100);
    ///
    /// assert_eq!(
    ///     NmfConfig::from_raw(-1, "multdist", 100, 1e-5),
    ///     Err(NmfError::InvalidRank(-1))
    /// );
    /// ```
    pub fn from_raw(
        rank: i64,
        rule: &str,
        max_iterations: i64,
        min_residue: f64,
    ) -> Result<Self, NmfError> {
        if rank <= 0 {
            return Err(NmfError::InvalidRank(rank));
        }
        if max_iterations < 0 {
            return Err(NmfError::InvalidIterationBound(max_iterations));
        }
        let rule: UpdateRule = rule.parse()?;

        let rank = usize::try_from(rank).map_err(|_| NmfError::InvalidRank(rank))?;
        let max_iterations = usize::try_from(max_iterations)
            .map_err(|_| NmfError::InvalidIterationBound(max_iterations))?;

        let config = Self::new(rank)
            .with_rule(rule)
            .with_max_iterations(max_iterations)
            .with_min_residue(min_residue);
        config.validate()?;
        Ok(config)
    }

    /// Check the scalar parameters
    pub fn validate(&self) -> Result<(), NmfError> {
        if self.rank == 0 {
            return Err(NmfError::InvalidRank(0));
        }
        if !self.min_residue.is_finite() || self.min_residue < 0.0 {
            return Err(NmfError::InvalidResidue(self.min_residue));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NmfConfig::new(3);
        assert_eq!(config.rank, 3);
        assert_eq!(config.rule, UpdateRule::MultiplicativeDistance);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.min_residue, DEFAULT_MIN_RESIDUE);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_from_raw_rejects_non_positive_rank() {
        assert_eq!(
            NmfConfig::from_raw(-1, "multdist", 10, 1e-5),
            Err(NmfError::InvalidRank(-1))
        );
        assert_eq!(
            NmfConfig::from_raw(0, "multdist", 10, 1e-5),
            Err(NmfError::InvalidRank(0))
        );
    }

    #[test]
    fn test_from_raw_rejects_negative_iterations() {
        assert_eq!(
            NmfConfig::from_raw(5, "multdist", -1, 1e-5),
            Err(NmfError::InvalidIterationBound(-1))
        );
    }

    #[test]
    fn test_from_raw_zero_iterations_allowed() {
        let config = NmfConfig::from_raw(5, "als", 0, 1e-5).unwrap();
        assert_eq!(config.max_iterations, 0);
        assert_eq!(config.rule, UpdateRule::AlternatingLeastSquares);
    }

    #[test]
    fn test_from_raw_rejects_unknown_rule() {
        assert_eq!(
            NmfConfig::from_raw(5, "invalid_rule", 10, 1e-5),
            Err(NmfError::UnknownUpdateRule("invalid_rule".to_string()))
        );
    }

    #[test]
    fn test_validate_residue() {
        assert_eq!(
            NmfConfig::new(2).with_min_residue(-1.0).validate(),
            Err(NmfError::InvalidResidue(-1.0))
        );
        assert!(NmfConfig::new(2)
            .with_min_residue(f64::NAN)
            .validate()
            .is_err());
        assert!(NmfConfig::new(2).with_min_residue(0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_rank() {
        assert_eq!(NmfConfig::new(0).validate(), Err(NmfError::InvalidRank(0)));
    }
}
