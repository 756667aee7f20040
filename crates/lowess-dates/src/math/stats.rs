//! Empirical statistics on residual and prediction samples.
//!
//! ## Purpose
//!
//! Interpolated percentiles for robust scales and bootstrap bands, plus the
//! population standard deviation used for residual spread.
//!
//! ## Design notes
//!
//! * **Linear interpolation**: Quantiles interpolate between order statistics
//!   at position `q * (n - 1)`.
//! * **Non-destructive**: Inputs are copied before sorting.

// External dependencies
use core::cmp::Ordering;
use num_traits::Float;

/// Empirical `q`-quantile with linear interpolation. `None` for empty input.
pub fn quantile_linear<T: Float>(values: &[T], q: f64) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = T::from(pos - lo as f64).unwrap_or_else(T::zero);

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Arithmetic mean. `None` for empty input.
pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let n = T::from(values.len())?;
    Some(values.iter().fold(T::zero(), |acc, &v| acc + v) / n)
}

/// Population (ddof = 0) standard deviation. `None` for empty input.
pub fn population_std_dev<T: Float>(values: &[T]) -> Option<T> {
    let mu = mean(values)?;
    let n = T::from(values.len())?;
    let ss = values
        .iter()
        .fold(T::zero(), |acc, &v| acc + (v - mu) * (v - mu));
    Some((ss / n).sqrt())
}
