//! Tricube kernel and distance/weight matrices for LOWESS smoothing.
//!
//! ## Purpose
//!
//! This module converts raw scalar distances into the tricube weights used as
//! the loading for every local regression, and builds the weight matrices
//! that connect anchors to samples (fit) and prediction points to anchors
//! (blend).
//!
//! ## Design notes
//!
//! * **Explicit shapes**: Every matrix is `locations × points`; the caller
//!   decides which axis holds anchors.
//! * **Per-row bandwidth**: Each location gets its own threshold, the distance
//!   to its `bandwidth_index`-th nearest point.
//! * **Finite output**: Zero thresholds are special-cased and normalization
//!   zeroes degenerate rows, so no NaN leaves this layer.
//!
//! ## Key concepts
//!
//! * **Tricube**: `w(d, t) = (1 - clip(|d|/t, 0, 1)^3)^3`.
//! * **Bandwidth index**: `ceil(n * frac) - 1`, saturated into `[0, n - 1]`.
//!
//! ## Invariants
//!
//! * Kernel values are in `[0, 1]` and non-increasing in distance.
//! * `tricube(0, t) == 1` for every `t >= 0`.
//! * Normalized rows sum to 1 or are all zero.
//!
//! ## Non-goals
//!
//! * Kernels other than tricube.

// External dependencies
use core::cmp::Ordering;
use ndarray::{Array2, Axis};
use num_traits::Float;

// ============================================================================
// Kernel Evaluation
// ============================================================================

/// Tricube weight for a distance `d` under threshold `t`.
///
/// A zero threshold maps `d == 0` to 1 and everything else to 0.
#[inline]
pub fn tricube<T: Float>(d: T, t: T) -> T {
    let abs_d = d.abs();
    if t <= T::zero() {
        return if abs_d == T::zero() {
            T::one()
        } else {
            T::zero()
        };
    }

    let u = (abs_d / t).min(T::one());
    let tmp = T::one() - u * u * u;
    tmp * tmp * tmp
}

/// Rank of the bandwidth threshold among `n` sorted distances.
#[inline]
pub fn bandwidth_index(n: usize, fraction: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let span = (n as f64 * fraction).ceil();
    if !span.is_finite() || span < 1.0 {
        return 0;
    }
    (span as usize - 1).min(n - 1)
}

// ============================================================================
// Matrices
// ============================================================================

/// Absolute distances, shape `locations × points`.
pub fn distance_matrix<T: Float>(locations: &[T], points: &[T]) -> Array2<T> {
    Array2::from_shape_fn((locations.len(), points.len()), |(i, j)| {
        (locations[i] - points[j]).abs()
    })
}

/// Per-row bandwidth thresholds of a distance matrix.
pub fn row_thresholds<T: Float>(distances: &Array2<T>, fraction: f64) -> Vec<T> {
    let k = bandwidth_index(distances.ncols(), fraction);
    distances
        .axis_iter(Axis(0))
        .map(|row| {
            let mut sorted: Vec<T> = row.to_vec();
            if sorted.is_empty() {
                return T::zero();
            }
            let (_, kth, _) =
                sorted.select_nth_unstable_by(k, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            *kth
        })
        .collect()
}

/// Un-normalized tricube weights, shape `locations × points`.
///
/// Each location's threshold is taken over its own distances to `points`.
pub fn tricube_weights<T: Float>(locations: &[T], points: &[T], fraction: f64) -> Array2<T> {
    let mut weights = distance_matrix(locations, points);
    let thresholds = row_thresholds(&weights, fraction);
    for (mut row, &threshold) in weights.axis_iter_mut(Axis(0)).zip(thresholds.iter()) {
        row.mapv_inplace(|d| tricube(d, threshold));
    }
    weights
}

/// Multiply every column `j` by `factors[j]`.
pub fn scale_columns<T: Float>(weights: &mut Array2<T>, factors: &[T]) {
    debug_assert_eq!(weights.ncols(), factors.len());
    for mut row in weights.axis_iter_mut(Axis(0)) {
        for (w, &f) in row.iter_mut().zip(factors.iter()) {
            *w = *w * f;
        }
    }
}

/// Normalize each row to sum to 1.
///
/// Rows whose sum is zero or non-finite become all-zero. Returns the number
/// of such degenerate rows.
pub fn normalize_rows<T: Float>(weights: &mut Array2<T>) -> usize {
    let mut degenerate = 0;
    for mut row in weights.axis_iter_mut(Axis(0)) {
        let sum = row.iter().fold(T::zero(), |acc, &w| acc + w);
        if sum > T::zero() && sum.is_finite() {
            row.mapv_inplace(|w| w / sum);
        } else {
            row.fill(T::zero());
            degenerate += 1;
        }
    }
    degenerate
}

/// Blend weights for prediction, shape `predictions × anchors`.
///
/// Thresholds are per anchor over the prediction points. Inactive anchors get
/// zero weight, then each prediction row is normalized across anchors.
pub fn blend_weights<T: Float>(
    anchors: &[T],
    active: &[bool],
    x_pred: &[T],
    fraction: f64,
) -> (Array2<T>, usize) {
    debug_assert_eq!(anchors.len(), active.len());
    let per_anchor = tricube_weights(anchors, x_pred, fraction);
    let mut blend = per_anchor.t().as_standard_layout().into_owned();
    for (mut column, &is_active) in blend.axis_iter_mut(Axis(1)).zip(active.iter()) {
        if !is_active {
            column.fill(T::zero());
        }
    }
    let degenerate = normalize_rows(&mut blend);
    (blend, degenerate)
}
