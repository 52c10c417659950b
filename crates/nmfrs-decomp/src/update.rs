//! NMF update rules
//!
//! Each rule performs one in-place iteration on the factor pair (W, H) for a
//! fixed input V:
//!
//! - **multdist**: Lee–Seung multiplicative update minimizing ‖V − WH‖²
//! - **multdiv**: Lee–Seung multiplicative update minimizing the generalized
//!   Kullback–Leibler divergence D(V ‖ WH)
//! - **als**: alternating least squares on the normal equations, with negative
//!   entries projected to zero
//!
//! All rules leave W and H finite and non-negative. Zero denominators (all-zero
//! rows or columns, vanishing reconstructions) leave the affected entry at its
//! previous value instead of producing NaN.
//!
//! # SciRS2 Integration
//!
//! Array operations use `scirs2_core::ndarray_ext`, least-squares solves use
//! `scirs2_linalg::lstsq`.

use scirs2_core::ndarray_ext::{Array2, Axis, ScalarOperand};
use scirs2_core::numeric::{Float, NumAssign, NumCast};
use scirs2_linalg::lstsq;
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::NmfError;

/// Update rule used by the factorization loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateRule {
    /// Multiplicative update on the Frobenius distance ("multdist")
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "multdist"))]
    MultiplicativeDistance,
    /// Multiplicative update on the KL divergence ("multdiv")
    #[cfg_attr(feature = "serde", serde(rename = "multdiv"))]
    MultiplicativeDivergence,
    /// Alternating least squares with non-negativity projection ("als")
    #[cfg_attr(feature = "serde", serde(rename = "als"))]
    AlternatingLeastSquares,
}

impl UpdateRule {
    /// All supported rules
    pub const ALL: [UpdateRule; 3] = [
        UpdateRule::MultiplicativeDistance,
        UpdateRule::MultiplicativeDivergence,
        UpdateRule::AlternatingLeastSquares,
    ];

    /// Short identifier accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateRule::MultiplicativeDistance => "multdist",
            UpdateRule::MultiplicativeDivergence => "multdiv",
            UpdateRule::AlternatingLeastSquares => "als",
        }
    }

    /// Run one iteration of this rule, updating `w` and `h` in place
    ///
    /// # Arguments
    ///
    /// * `v` - Input matrix (m × n), non-negative
    /// * `w` - Left factor (m × r), updated in place
    /// * `h` - Right factor (r × n), updated in place
    ///
    /// Shapes are assumed to be consistent; [`factorize`](crate::factorize)
    /// validates them before the first call.
    pub fn step<T>(&self, v: &Array2<T>, w: &mut Array2<T>, h: &mut Array2<T>)
    where
        T: Float + NumAssign + Sum + ScalarOperand + Send + Sync + 'static,
    {
        match self {
            UpdateRule::MultiplicativeDistance => multiplicative_distance_step(v, w, h),
            UpdateRule::MultiplicativeDivergence => multiplicative_divergence_step(v, w, h),
            UpdateRule::AlternatingLeastSquares => alternating_least_squares_step(v, w, h),
        }
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateRule {
    type Err = NmfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multdist" => Ok(UpdateRule::MultiplicativeDistance),
            "multdiv" => Ok(UpdateRule::MultiplicativeDivergence),
            "als" => Ok(UpdateRule::AlternatingLeastSquares),
            _ => Err(NmfError::UnknownUpdateRule(s.to_string())),
        }
    }
}

/// Convert an `f64` constant into the working float type
pub(crate) fn scalar<T: Float>(value: f64) -> T {
    <T as NumCast>::from(value).unwrap_or_else(T::zero)
}

/// Multiplicative update for the Euclidean objective
///
/// W ← W ∘ (VHᵀ) ⊘ (WHHᵀ), then H ← H ∘ (WᵀV) ⊘ (WᵀWH) using the new W.
pub fn multiplicative_distance_step<T>(v: &Array2<T>, w: &mut Array2<T>, h: &mut Array2<T>)
where
    T: Float + ScalarOperand + 'static,
{
    let numer = v.dot(&h.t());
    let denom = w.dot(&h.dot(&h.t()));
    scale_by_ratio(w, &numer, &denom);

    let numer = w.t().dot(v);
    let denom = w.t().dot(&*w).dot(&*h);
    scale_by_ratio(h, &numer, &denom);
}

/// Multiplicative update for the KL-divergence objective
///
/// W(i,a) ← W(i,a) · Σₖ H(a,k) V(i,k)/(WH)(i,k) / Σₖ H(a,k)
///
/// H(a,j) ← H(a,j) · Σᵢ W(i,a) V(i,j)/(WH)(i,j) / Σᵢ W(i,a)
pub fn multiplicative_divergence_step<T>(v: &Array2<T>, w: &mut Array2<T>, h: &mut Array2<T>)
where
    T: Float + ScalarOperand + 'static,
{
    let rank = w.ncols();

    // W update
    let ratio = divergence_ratio(v, &w.dot(&*h));
    let numer = ratio.dot(&h.t());
    let h_row_sums = h.sum_axis(Axis(1));
    for i in 0..w.nrows() {
        for a in 0..rank {
            update_entry(&mut w[[i, a]], numer[[i, a]], h_row_sums[a]);
        }
    }

    // H update against the refreshed W
    let ratio = divergence_ratio(v, &w.dot(&*h));
    let numer = w.t().dot(&ratio);
    let w_col_sums = w.sum_axis(Axis(0));
    for a in 0..rank {
        for j in 0..h.ncols() {
            update_entry(&mut h[[a, j]], numer[[a, j]], w_col_sums[a]);
        }
    }
}

/// Alternating least squares update
///
/// Solves (WᵀW) H = WᵀV for H, projects negatives to zero, then solves
/// (HHᵀ) Wᵀ = HVᵀ for W with the new H and projects again.
pub fn alternating_least_squares_step<T>(v: &Array2<T>, w: &mut Array2<T>, h: &mut Array2<T>)
where
    T: Float + NumAssign + Sum + ScalarOperand + Send + Sync + 'static,
{
    let gram = w.t().dot(&*w);
    let rhs = w.t().dot(v);
    solve_projected_columns(&gram, &rhs, h);

    let gram = h.dot(&h.t());
    let rhs = h.dot(&v.t());
    let mut w_t = w.t().to_owned();
    solve_projected_columns(&gram, &rhs, &mut w_t);
    w.assign(&w_t.t());
}

/// Multiply each entry of `factor` by numer/denom
fn scale_by_ratio<T: Float>(factor: &mut Array2<T>, numer: &Array2<T>, denom: &Array2<T>) {
    for ((x, &n), &d) in factor.iter_mut().zip(numer.iter()).zip(denom.iter()) {
        update_entry(x, n, d);
    }
}

/// x ← x · n / d when d is positive and the result is a finite non-negative
/// number; otherwise x keeps its value
///
/// The ratio is formed first so that large factors do not overflow the product.
#[inline]
fn update_entry<T: Float>(x: &mut T, n: T, d: T) {
    if d > T::zero() {
        let updated = *x * (n / d);
        if updated.is_finite() && updated >= T::zero() {
            *x = updated;
        }
    }
}

/// Elementwise V ⊘ (WH); entries with a zero or non-finite quotient contribute zero
fn divergence_ratio<T: Float>(v: &Array2<T>, wh: &Array2<T>) -> Array2<T> {
    let mut ratio = Array2::<T>::zeros(v.raw_dim());
    for ((out, &num), &den) in ratio.iter_mut().zip(v.iter()).zip(wh.iter()) {
        if den > T::zero() {
            let q = num / den;
            if q.is_finite() {
                *out = q;
            }
        }
    }
    ratio
}

/// Solve `gram · x = rhs[:, j]` for every column j and store max(x, 0) in `target[:, j]`
///
/// A solve that fails or yields non-finite values is retried once with a small
/// ridge on the diagonal. If that fails too, the column keeps its previous values.
fn solve_projected_columns<T>(gram: &Array2<T>, rhs: &Array2<T>, target: &mut Array2<T>)
where
    T: Float + NumAssign + Sum + ScalarOperand + Send + Sync + 'static,
{
    let rank = gram.nrows();
    let mut ridged: Option<Array2<T>> = None;

    for j in 0..rhs.ncols() {
        let b = rhs.column(j).to_owned();
        let solve = |system: &Array2<T>| {
            lstsq(&system.view(), &b.view(), None)
                .ok()
                .map(|solution| solution.x)
                .filter(|x| x.iter().all(|value| value.is_finite()))
        };

        let solution =
            solve(gram).or_else(|| solve(ridged.get_or_insert_with(|| with_ridge(gram))));

        match solution {
            Some(x) => {
                for a in 0..rank {
                    target[[a, j]] = x[a].max(T::zero());
                }
            }
            None => {
                log::warn!(
                    "ALS: normal equations for column {} are unsolvable, keeping previous values",
                    j
                );
            }
        }
    }
}

/// Copy of `gram` with a ridge proportional to its mean diagonal added
fn with_ridge<T: Float + NumAssign>(gram: &Array2<T>) -> Array2<T> {
    let rank = gram.nrows();
    let mut trace = T::zero();
    for k in 0..rank {
        trace += gram[[k, k]];
    }
    let mean_diag = if rank > 0 {
        trace / scalar(rank as f64)
    } else {
        T::one()
    };
    let ridge = T::epsilon().sqrt() * mean_diag.max(T::one());

    let mut ridged = gram.clone();
    for k in 0..rank {
        ridged[[k, k]] += ridge;
    }
    ridged
}
