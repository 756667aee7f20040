//! Tests for the tricube kernel and the weight matrices built from it.
//!
//! These tests verify the mathematical building blocks of every fit:
//! - Tricube evaluation and its degenerate threshold
//! - Bandwidth rank selection at the fraction extremes
//! - Distance, threshold and weight matrices with their shape contracts
//! - Row normalization and the prediction blend
//! - Empirical quantiles and moments
//!
//! ## Test Organization
//!
//! 1. **Kernel Evaluation** - Values, monotonicity, degenerate thresholds
//! 2. **Bandwidth Index** - Rank clamping
//! 3. **Weight Matrices** - Shapes, bounds, normalization
//! 4. **Blend Weights** - Prediction-side weights and inactive anchors
//! 5. **Statistics** - Quantiles and standard deviation

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lowess_dates::internals::math::kernel::{
    bandwidth_index, blend_weights, distance_matrix, normalize_rows, row_thresholds,
    scale_columns, tricube, tricube_weights,
};
use lowess_dates::internals::math::stats::{mean, population_std_dev, quantile_linear};

// ============================================================================
// Kernel Evaluation Tests
// ============================================================================

/// Test tricube at the centre, inside and beyond the threshold.
#[test]
fn test_tricube_values() {
    assert_relative_eq!(tricube(0.0, 1.0), 1.0);
    assert_relative_eq!(tricube(0.5, 1.0), (1.0f64 - 0.125).powi(3), epsilon = 1e-12);
    assert_relative_eq!(tricube(1.0, 1.0), 0.0);
    assert_relative_eq!(tricube(3.0, 1.0), 0.0);

    // Symmetric in the sign of the distance
    assert_relative_eq!(tricube(-0.5, 2.0), tricube(0.5, 2.0));
}

/// Test tricube is non-increasing in distance for a fixed threshold.
#[test]
fn test_tricube_monotone() {
    for &t in &[0.1, 1.0, 7.5] {
        let mut prev = tricube(0.0, t);
        assert_relative_eq!(prev, 1.0);
        for i in 1..=200 {
            let d = t * i as f64 / 100.0;
            let w = tricube(d, t);
            assert!(w <= prev, "tricube increased at d={d}, t={t}");
            assert!((0.0..=1.0).contains(&w));
            prev = w;
        }
    }
}

/// Test a zero threshold keeps only exact matches.
#[test]
fn test_tricube_zero_threshold() {
    assert_eq!(tricube(0.0, 0.0), 1.0);
    assert_eq!(tricube(1e-9, 0.0), 0.0);
    assert_eq!(tricube(2.0, -1.0), 0.0);
}

// ============================================================================
// Bandwidth Index Tests
// ============================================================================

/// Test the bandwidth rank is `ceil(n * frac) - 1` clamped into range.
#[test]
fn test_bandwidth_index() {
    assert_eq!(bandwidth_index(10, 0.3), 2);
    assert_eq!(bandwidth_index(10, 1.0), 9);
    assert_eq!(bandwidth_index(10, 0.01), 0);
    assert_eq!(bandwidth_index(3, 0.5), 1);
    assert_eq!(bandwidth_index(1, 1.0), 0);
    assert_eq!(bandwidth_index(0, 0.5), 0);
}

// ============================================================================
// Weight Matrix Tests
// ============================================================================

/// Test distance and weight matrices have `locations × points` shape.
#[test]
fn test_matrix_shapes() {
    let locations = [0.0, 5.0];
    let points = [0.0, 1.0, 2.0, 3.0];

    let distances = distance_matrix(&locations, &points);
    assert_eq!(distances.dim(), (2, 4));
    assert_relative_eq!(distances[[1, 0]], 5.0);

    let weights = tricube_weights(&locations, &points, 0.5);
    assert_eq!(weights.dim(), (2, 4));
}

/// Test thresholds pick the bandwidth-ranked distance of each row.
#[test]
fn test_row_thresholds() {
    let points = [0.0, 1.0, 2.0, 3.0, 4.0];
    let distances = distance_matrix(&[0.0, 2.0], &points);

    // n = 5, frac = 0.6 -> rank 2
    let thresholds = row_thresholds(&distances, 0.6);
    assert_relative_eq!(thresholds[0], 2.0);
    assert_relative_eq!(thresholds[1], 1.0);
}

/// Test normalized rows are bounded and sum to 1, or are all zero.
#[test]
fn test_normalized_weights_bounded() {
    let mut rng = StdRng::seed_from_u64(7);
    let points: Vec<f64> = (0..40).map(|_| rng.random_range(0.0..10.0)).collect();
    let anchors: Vec<f64> = (0..12).map(|i| i as f64).collect();
    let scale: Vec<f64> = points
        .iter()
        .map(|&p| if p < 2.0 { 0.0 } else { 1.0 })
        .collect();

    let mut weights = tricube_weights(&anchors, &points, 0.2);
    scale_columns(&mut weights, &scale);
    normalize_rows(&mut weights);

    for row in weights.rows() {
        let sum: f64 = row.sum();
        assert!(row.iter().all(|w| w.is_finite() && (0.0..=1.0).contains(w)));
        assert!(sum == 0.0 || (sum - 1.0).abs() < 1e-10, "row sum {sum}");
    }
}

/// Test an all-zero row is reported as degenerate and stays zero.
#[test]
fn test_normalize_degenerate_rows() {
    let mut weights = tricube_weights(&[0.0, 1.0], &[0.0, 1.0, 2.0], 1.0);
    scale_columns(&mut weights, &[0.0, 0.0, 0.0]);

    let degenerate = normalize_rows(&mut weights);
    assert_eq!(degenerate, 2);
    assert!(weights.iter().all(|&w| w == 0.0));
}

// ============================================================================
// Blend Weight Tests
// ============================================================================

/// Test blend weights are `predictions × anchors` and rows sum to 1.
#[test]
fn test_blend_weights_shape() {
    let anchors: Vec<f64> = (0..5).map(|i| i as f64 * 2.0).collect();
    let x_pred: Vec<f64> = (0..21).map(|i| i as f64 * 0.5).collect();

    let (blend, degenerate) = blend_weights(&anchors, &[true; 5], &x_pred, 0.5);
    assert_eq!(blend.dim(), (21, 5));
    assert_eq!(degenerate, 0);
    for row in blend.rows() {
        assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-10);
    }
}

/// Test inactive anchors never receive blend weight.
#[test]
fn test_blend_weights_inactive() {
    let anchors = [0.0, 1.0, 2.0, 3.0];
    let x_pred: Vec<f64> = (0..31).map(|i| i as f64 * 0.1).collect();

    let (blend, _) = blend_weights(&anchors, &[true, false, true, true], &x_pred, 0.8);
    assert!(blend.column(1).iter().all(|&w| w == 0.0));
}

// ============================================================================
// Statistics Tests
// ============================================================================

/// Test linear-interpolated quantiles.
#[test]
fn test_quantile_linear() {
    let values = [4.0, 1.0, 3.0, 2.0, 5.0];
    assert_relative_eq!(quantile_linear(&values, 0.0).unwrap(), 1.0);
    assert_relative_eq!(quantile_linear(&values, 0.5).unwrap(), 3.0);
    assert_relative_eq!(quantile_linear(&values, 1.0).unwrap(), 5.0);
    assert_relative_eq!(quantile_linear(&values, 0.125).unwrap(), 1.5);
    assert!(quantile_linear::<f64>(&[], 0.5).is_none());
}

/// Test mean and population standard deviation.
#[test]
fn test_moments() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert_relative_eq!(mean(&values).unwrap(), 5.0);
    assert_relative_eq!(population_std_dev(&values).unwrap(), 2.0);
    assert!(mean::<f64>(&[]).is_none());
}
