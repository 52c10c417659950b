//! Error types for NMF
//!
//! Every variant is raised during validation, before the first iteration runs.
//! Numerical trouble inside an update rule (zero denominators, singular
//! normal equations) is absorbed by the rule itself and never surfaces here.

use thiserror::Error;

/// Errors returned by [`factorize`](crate::factorize) and the configuration layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NmfError {
    #[error("Invalid rank: {0} (rank must be at least 1)")]
    InvalidRank(i64),

    #[error("Invalid iteration bound: {0} (max_iterations must be non-negative)")]
    InvalidIterationBound(i64),

    #[error("Unknown update rule: '{0}' (expected one of 'multdist', 'multdiv', 'als')")]
    UnknownUpdateRule(String),

    #[error("Invalid initial {factor} shape: expected {expected:?}, got {actual:?}")]
    InvalidInitialFactorShape {
        /// Which factor was rejected ("W" or "H")
        factor: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid minimum residue: {0} (must be finite and non-negative)")]
    InvalidResidue(f64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NmfError::InvalidRank(-1);
        assert!(err.to_string().contains("-1"));

        let err = NmfError::UnknownUpdateRule("foo".to_string());
        assert!(err.to_string().contains("'foo'"));

        let err = NmfError::InvalidInitialFactorShape {
            factor: "W",
            expected: (10, 5),
            actual: (10, 4),
        };
        let msg = err.to_string();
        assert!(msg.contains("initial W"));
        assert!(msg.contains("(10, 5)"));
        assert!(msg.contains("(10, 4)"));
    }
}
