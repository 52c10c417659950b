//! Residue computation and termination policy for the NMF loop
//!
//! The reported residue is the Frobenius norm ‖V − WH‖ for every update rule.
//! The divergence rule optimizes a different objective, but the Frobenius
//! residue is still the stopping metric.
//!
//! The loop stops when the first of these holds after an iteration:
//!
//! 1. residue ≤ `min_residue`
//! 2. relative improvement |prev − cur| / prev < max(`min_residue`, 10·ε)
//! 3. `max_iterations` iterations have run (`0` disables this bound)
//!
//! A residue that is not finite stops the loop immediately.

use scirs2_core::ndarray_ext::{Array2, ScalarOperand};
use scirs2_core::numeric::Float;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::update::scalar;

/// Why the factorization loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// Residue fell to or below `min_residue`
    ResidueReached,
    /// Relative improvement between consecutive iterations became negligible
    Stalled,
    /// Iteration cap reached
    MaxIterations,
    /// Residue became infinite or NaN
    NonFinite,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::ResidueReached => write!(f, "residue threshold reached"),
            StopReason::Stalled => write!(f, "stalled"),
            StopReason::MaxIterations => write!(f, "iteration limit reached"),
            StopReason::NonFinite => write!(f, "non-finite residue"),
        }
    }
}

/// Compute ‖V − WH‖ (Frobenius norm)
pub fn frobenius_residue<T>(v: &Array2<T>, w: &Array2<T>, h: &Array2<T>) -> T
where
    T: Float + ScalarOperand + 'static,
{
    let diff = v - &w.dot(h);
    frobenius_norm(&diff)
}

/// Frobenius norm computed against the largest magnitude, so squaring
/// cannot overflow or underflow for any finite input
pub fn frobenius_norm<T: Float>(m: &Array2<T>) -> T {
    let scale = m.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()));
    if scale == T::zero() || !scale.is_finite() {
        return scale;
    }
    let sum_sq = m.iter().fold(T::zero(), |acc, &x| {
        let r = x / scale;
        acc + r * r
    });
    scale * sum_sq.sqrt()
}

/// Tracks residues across iterations and decides when to stop
#[derive(Debug, Clone)]
pub struct ConvergenceTracker<T> {
    max_iterations: usize,
    min_residue: T,
    stall_tolerance: T,
    iterations: usize,
    last_residue: Option<T>,
}

impl<T> ConvergenceTracker<T>
where
    T: Float + ScalarOperand + 'static,
{
    /// Create a tracker
    ///
    /// `max_iterations = 0` means the loop is bounded only by the residue and
    /// stagnation tests.
    pub fn new(max_iterations: usize, min_residue: T) -> Self {
        let floor = T::epsilon() * scalar(10.0);
        Self {
            max_iterations,
            min_residue,
            stall_tolerance: min_residue.max(floor),
            iterations: 0,
            last_residue: None,
        }
    }

    /// Residue of the current factors
    pub fn evaluate(&self, v: &Array2<T>, w: &Array2<T>, h: &Array2<T>) -> T {
        frobenius_residue(v, w, h)
    }

    /// Record the residue of a finished iteration
    ///
    /// Returns `Some(reason)` when the loop must stop.
    pub fn observe(&mut self, residue: T) -> Option<StopReason> {
        self.iterations += 1;
        let previous = self.last_residue.replace(residue);

        if !residue.is_finite() {
            return Some(StopReason::NonFinite);
        }

        if residue <= self.min_residue {
            return Some(StopReason::ResidueReached);
        }

        if let Some(prev) = previous {
            let improvement = (prev - residue).abs() / prev.max(T::min_positive_value());
            if improvement < self.stall_tolerance {
                return Some(StopReason::Stalled);
            }
        }

        if self.max_iterations != 0 && self.iterations >= self.max_iterations {
            return Some(StopReason::MaxIterations);
        }

        None
    }

    /// Number of iterations observed so far
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Residue of the most recent iteration
    pub fn last_residue(&self) -> Option<T> {
        self.last_residue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_frobenius_residue_exact() {
        let w = array![[1.0], [2.0]];
        let h = array![[3.0, 4.0]];
        let v = w.dot(&h);
        assert!(frobenius_residue(&v, &w, &h).abs() < 1e-12);
    }

    #[test]
    fn test_frobenius_residue_value() {
        // WH = [[1, 1], [1, 1]], V - WH = [[0, 1], [2, 3]]
        let v = array![[1.0, 2.0], [3.0, 4.0]];
        let w = array![[1.0], [1.0]];
        let h = array![[1.0, 1.0]];
        let expected = (0.0f64 + 1.0 + 4.0 + 9.0).sqrt();
        assert!((frobenius_residue(&v, &w, &h) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_frobenius_norm_does_not_overflow() {
        let m = array![[3.0e200, 4.0e200]];
        let norm = frobenius_norm(&m);
        assert!(norm.is_finite());
        assert!((norm / 5.0e200 - 1.0).abs() < 1e-12);

        let tiny = array![[3.0e-200], [4.0e-200]];
        assert!((frobenius_norm(&tiny) / 5.0e-200 - 1.0).abs() < 1e-12);
        assert_eq!(frobenius_norm(&Array2::<f64>::zeros((2, 2))), 0.0);
    }

    #[test]
    fn test_large_residue_is_finite() {
        let v = array![[1.0e160, 2.0e160], [3.0e160, 4.0e160]];
        let w = array![[1.0], [1.0]];
        let h = array![[1.0, 1.0]];
        let residue = frobenius_residue(&v, &w, &h);
        assert!(residue.is_finite());
        assert!((residue / (30.0f64.sqrt() * 1.0e160) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_residue_stops_unbounded_loop() {
        let mut tracker = ConvergenceTracker::new(0, 0.0);
        assert_eq!(tracker.observe(5.0), None);
        assert_eq!(tracker.observe(f64::NAN), Some(StopReason::NonFinite));

        let mut tracker = ConvergenceTracker::new(0, 0.0);
        assert_eq!(tracker.observe(f64::INFINITY), Some(StopReason::NonFinite));
        assert_eq!(tracker.iterations(), 1);
    }

    #[test]
    fn test_stops_on_residue_threshold() {
        let mut tracker = ConvergenceTracker::new(100, 0.5);
        assert_eq!(tracker.observe(2.0), None);
        assert_eq!(tracker.observe(0.5), Some(StopReason::ResidueReached));
        assert_eq!(tracker.iterations(), 2);
        assert_eq!(tracker.last_residue(), Some(0.5));
    }

    #[test]
    fn test_stops_on_iteration_cap() {
        let mut tracker = ConvergenceTracker::new(3, 0.0);
        assert_eq!(tracker.observe(8.0), None);
        assert_eq!(tracker.observe(4.0), None);
        assert_eq!(tracker.observe(2.0), Some(StopReason::MaxIterations));
    }

    #[test]
    fn test_zero_cap_is_unbounded() {
        let mut tracker = ConvergenceTracker::new(0, 0.0);
        let mut residue = 1.0e6;
        for _ in 0..1000 {
            residue *= 0.5;
            assert_eq!(tracker.observe(residue), None);
        }
        assert_eq!(tracker.iterations(), 1000);
    }

    #[test]
    fn test_stall_uses_min_residue_as_relative_tolerance() {
        let mut tracker = ConvergenceTracker::new(0, 1e-3);
        assert_eq!(tracker.observe(10.0), None);
        // 10% improvement keeps going
        assert_eq!(tracker.observe(9.0), None);
        // 0.01% improvement stops
        assert_eq!(tracker.observe(8.9991), Some(StopReason::Stalled));
    }

    #[test]
    fn test_exact_plateau_stops_with_zero_threshold() {
        let mut tracker = ConvergenceTracker::new(0, 0.0);
        assert_eq!(tracker.observe(3.0), None);
        assert_eq!(tracker.observe(3.0), Some(StopReason::Stalled));
    }

    #[test]
    fn test_increasing_residue_is_not_a_stall() {
        let mut tracker = ConvergenceTracker::new(0, 1e-3);
        assert_eq!(tracker.observe(1.0), None);
        assert_eq!(tracker.observe(1.5), None);
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::Stalled.to_string(), "stalled");
        assert!(StopReason::MaxIterations.to_string().contains("limit"));
    }
}
