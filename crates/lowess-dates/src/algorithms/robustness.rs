//! Robustness weight computation for outlier downweighting.
//!
//! ## Purpose
//!
//! After each pass of a robust fit, residuals on the training data are turned
//! into per-sample weights that downweight outliers in the next pass.
//!
//! ## Design notes
//!
//! * **Scale**: The 68.2nd percentile of absolute residuals, which tracks one
//!   standard deviation for normal-like residuals.
//! * **Weighting**: Bisquare (Tukey's biweight) on residuals scaled by
//!   `max_std_dev * scale` and clipped to `[-1, 1]`.
//!
//! ## Invariants
//!
//! * Robustness weights are in `[0, 1]` and finite.
//! * Residuals at or beyond `max_std_dev * scale` get weight 0.
//! * With a zero scale, exact fits keep weight 1 and everything else gets 0.
//!
//! ## Non-goals
//!
//! * This module does not perform the regression itself.
//! * This module does not decide the number of robustness iterations.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::stats::quantile_linear;

/// Default clip bound, in residual standard deviations.
pub const DEFAULT_MAX_STD_DEV: f64 = 6.0;

/// Percentile of `|residual|` used as the residual scale.
pub const RESIDUAL_SCALE_QUANTILE: f64 = 0.682;

/// Bisquare weight `(1 - u²)²` for `u` clipped to `[-1, 1]`.
#[inline]
pub fn bisquare<T: Float>(u: T) -> T {
    let c = u.max(-T::one()).min(T::one());
    let tmp = T::one() - c * c;
    tmp * tmp
}

/// Residual scale estimate, the 68.2nd percentile of absolute residuals.
pub fn residual_scale<T: Float>(residuals: &[T]) -> T {
    let abs: Vec<T> = residuals.iter().map(|r| r.abs()).collect();
    quantile_linear(&abs, RESIDUAL_SCALE_QUANTILE).unwrap_or_else(T::zero)
}

/// Robustness weights from observed and predicted responses.
pub fn robust_weights<T: Float>(y: &[T], y_pred: &[T], max_std_dev: T) -> Vec<T> {
    let residuals: Vec<T> = y.iter().zip(y_pred).map(|(&o, &p)| o - p).collect();
    let bound = max_std_dev * residual_scale(&residuals);

    if !(bound > T::zero() && bound.is_finite()) {
        return residuals
            .iter()
            .map(|r| if *r == T::zero() { T::one() } else { T::zero() })
            .collect();
    }

    residuals.iter().map(|&r| bisquare(r / bound)).collect()
}
