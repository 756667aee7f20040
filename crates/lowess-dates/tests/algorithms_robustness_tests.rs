//! Tests for robustness reweighting.
//!
//! These tests verify how residuals are turned into robustness weights:
//! - The bisquare kernel
//! - The percentile-based residual scale
//! - Clipping of large residuals and the zero-scale limit
//!
//! ## Test Organization
//!
//! 1. **Bisquare** - Values and clipping
//! 2. **Residual Scale** - 68.2nd percentile of absolute residuals
//! 3. **Robust Weights** - Outlier downweighting and degenerate scales

use approx::assert_relative_eq;

use lowess_dates::internals::algorithms::robustness::{
    bisquare, residual_scale, robust_weights, DEFAULT_MAX_STD_DEV,
};

// ============================================================================
// Bisquare Tests
// ============================================================================

/// Test bisquare values inside and beyond the unit interval.
#[test]
fn test_bisquare_values() {
    assert_relative_eq!(bisquare(0.0), 1.0);
    assert_relative_eq!(bisquare(0.5), 0.5625);
    assert_relative_eq!(bisquare(-0.5), 0.5625);
    assert_relative_eq!(bisquare(1.0), 0.0);
    assert_relative_eq!(bisquare(4.0), 0.0);
    assert_relative_eq!(bisquare(-4.0), 0.0);
}

// ============================================================================
// Residual Scale Tests
// ============================================================================

/// Test the scale is the interpolated 68.2nd percentile of |r|.
#[test]
fn test_residual_scale() {
    // |r| sorted: 0, 1, 2, ..., 10 -> position 6.82
    let residuals: Vec<f64> = (0..=10)
        .map(|i| if i % 2 == 0 { i as f64 } else { -(i as f64) })
        .collect();
    assert_relative_eq!(residual_scale(&residuals), 6.82, epsilon = 1e-12);
    assert_eq!(residual_scale::<f64>(&[]), 0.0);
}

// ============================================================================
// Robust Weight Tests
// ============================================================================

/// Test a gross outlier is weighted to zero while inliers keep the one-scale weight.
#[test]
fn test_outlier_downweighted() {
    let y_pred = vec![0.0; 20];
    let mut y: Vec<f64> = (0..20)
        .map(|i| if i % 2 == 0 { 0.1 } else { -0.1 })
        .collect();
    y[7] = 50.0;

    // Inliers sit exactly one scale out: |r| / (6 · 0.1) = 1/6.
    let inlier = (1.0 - (1.0_f64 / 6.0).powi(2)).powi(2);

    let weights = robust_weights(&y, &y_pred, DEFAULT_MAX_STD_DEV);
    assert_eq!(weights.len(), 20);
    assert_relative_eq!(weights[7], 0.0);
    for (i, &w) in weights.iter().enumerate() {
        assert!((0.0..=1.0).contains(&w));
        if i != 7 {
            assert_relative_eq!(w, inlier, epsilon = 1e-9);
        }
    }
}

/// Test a perfect fit keeps every weight at 1.
#[test]
fn test_zero_residual_scale() {
    let y = vec![1.0, 2.0, 3.0];
    let weights = robust_weights(&y, &y, 6.0);
    assert_eq!(weights, vec![1.0, 1.0, 1.0]);
}

/// Test a zero scale with a few non-zero residuals zeroes exactly those.
#[test]
fn test_zero_scale_with_outliers() {
    // 9 of 10 residuals are zero, so the 68.2nd percentile is zero
    let mut y = vec![0.0; 10];
    y[4] = 3.0;
    let weights = robust_weights(&y, &[0.0; 10], 6.0);

    assert_eq!(weights[4], 0.0);
    assert!(weights
        .iter()
        .enumerate()
        .all(|(i, &w)| i == 4 || w == 1.0));
}
