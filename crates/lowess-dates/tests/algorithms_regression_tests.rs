//! Tests for the local regression solvers.
//!
//! These tests verify the two strategies a fit can use for each anchor row:
//! - Weighted least squares with its SIMD accumulation
//! - The least-squares fallback for singular normal equations
//! - Weighted quantile regression by Nelder-Mead minimization
//! - The serializable strategy enum
//!
//! ## Test Organization
//!
//! 1. **Accumulation** - SIMD and scalar weighted sums agree
//! 2. **Linear Solver** - Exact recovery, weighting, degenerate rows
//! 3. **Quantile Solver** - Loss, ordering of quantiles, zero weights
//! 4. **Strategy Enum** - Validation, dispatch and serde

use approx::assert_relative_eq;

use lowess_dates::internals::algorithms::regression::{
    accumulate_wls_scalar, accumulate_wls_simd_f32, accumulate_wls_simd_f64, solve_linear,
    solve_quantile, Coefficients, LocalRegression, QuantileLoss, RegressionMethod, SolveStatus,
};
use lowess_dates::prelude::LowessError;

fn line_data(n: usize) -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
    let y = x.iter().map(|v| 1.0 + 2.0 * v).collect();
    (x, y)
}

// ============================================================================
// Accumulation Tests
// ============================================================================

/// Test SIMD accumulation matches the scalar path on lengths with remainders.
#[test]
fn test_simd_matches_scalar() {
    for n in [1usize, 2, 7, 16, 37] {
        let x: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).sin()).collect();
        let y: Vec<f64> = (0..n).map(|i| (i as f64 * 0.3).cos()).collect();
        let w: Vec<f64> = (0..n).map(|i| 1.0 / (1.0 + i as f64)).collect();

        let simd = accumulate_wls_simd_f64(&x, &y, &w);
        let scalar = accumulate_wls_scalar(&x, &y, &w);
        assert_relative_eq!(simd.0, scalar.0, epsilon = 1e-12);
        assert_relative_eq!(simd.1, scalar.1, epsilon = 1e-12);
        assert_relative_eq!(simd.2, scalar.2, epsilon = 1e-12);
        assert_relative_eq!(simd.3, scalar.3, epsilon = 1e-12);
        assert_relative_eq!(simd.4, scalar.4, epsilon = 1e-12);

        let xf: Vec<f32> = x.iter().map(|&v| v as f32).collect();
        let yf: Vec<f32> = y.iter().map(|&v| v as f32).collect();
        let wf: Vec<f32> = w.iter().map(|&v| v as f32).collect();
        let simd32 = accumulate_wls_simd_f32(&xf, &yf, &wf);
        assert_relative_eq!(simd32.0 as f64, scalar.0, epsilon = 1e-4);
        assert_relative_eq!(simd32.4 as f64, scalar.4, epsilon = 1e-4);
    }
}

// ============================================================================
// Linear Solver Tests
// ============================================================================

/// Test an exact line is recovered under uniform weights.
#[test]
fn test_linear_recovers_line() {
    let (x, y) = line_data(20);
    let w = vec![1.0; 20];

    let sol = solve_linear(&x, &y, &w);
    assert_eq!(sol.status, SolveStatus::Solved);
    assert_relative_eq!(sol.coefficients.intercept, 1.0, epsilon = 1e-9);
    assert_relative_eq!(sol.coefficients.slope, 2.0, epsilon = 1e-9);
}

/// Test zero-weight samples do not influence the fit.
#[test]
fn test_linear_ignores_zero_weights() {
    let (x, mut y) = line_data(10);
    let mut w = vec![1.0; 10];
    y[3] = 100.0;
    w[3] = 0.0;

    let sol = solve_linear(&x, &y, &w);
    assert_relative_eq!(sol.coefficients.intercept, 1.0, epsilon = 1e-9);
    assert_relative_eq!(sol.coefficients.slope, 2.0, epsilon = 1e-9);
}

/// Test an all-zero weight row yields a zero line.
#[test]
fn test_linear_zero_weights() {
    let (x, y) = line_data(5);
    let sol = solve_linear(&x, &y, &[0.0; 5]);

    assert_eq!(sol.status, SolveStatus::ZeroWeights);
    assert_eq!(sol.coefficients, Coefficients::zero());
}

/// Test a single distinct x falls back to least squares through the mean.
#[test]
fn test_linear_singular_fallback() {
    let x = vec![3.0_f64; 6];
    let y = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let w = vec![1.0; 6];

    let sol = solve_linear(&x, &y, &w);
    assert_eq!(sol.status, SolveStatus::LeastSquares);
    assert!(sol.coefficients.intercept.is_finite());
    assert!(sol.coefficients.slope.is_finite());
    assert_relative_eq!(sol.coefficients.evaluate(3.0), 3.5, epsilon = 1e-8);
}

/// Test the f32 solver agrees with f64.
#[test]
fn test_linear_f32() {
    let x: Vec<f32> = (0..12).map(|i| i as f32).collect();
    let y: Vec<f32> = x.iter().map(|v| 0.5 - 1.5 * v).collect();
    let w = vec![1.0f32; 12];

    let sol = solve_linear(&x, &y, &w);
    assert_relative_eq!(sol.coefficients.intercept, 0.5, epsilon = 1e-3);
    assert_relative_eq!(sol.coefficients.slope, -1.5, epsilon = 1e-3);
}

// ============================================================================
// Quantile Solver Tests
// ============================================================================

/// Test the pinball loss on hand-computed residuals.
#[test]
fn test_quantile_loss_value() {
    let x = [0.0, 1.0];
    let y = [1.0, -1.0];
    let w = [1.0, 2.0];
    let loss = QuantileLoss::new(&x, &y, &w, 0.25);

    // r = [1, -2]: 0.25 * 1 + 0.75 * 2
    assert_relative_eq!(loss.value(0.0, 0.0), 1.75, epsilon = 1e-12);
}

/// Test the minimizer never ends worse than its starting point.
#[test]
fn test_quantile_improves_on_start() {
    let (x, y) = line_data(30);
    let w = vec![1.0; 30];
    let loss = QuantileLoss::new(&x, &y, &w, 0.5);

    let sol = solve_quantile(&x, &y, &w, 0.5, 400).unwrap();
    let fitted = loss.value(sol.coefficients.intercept, sol.coefficients.slope);
    assert!(fitted <= loss.value(0.0, 0.0));
    assert!(sol.coefficients.intercept.is_finite());
}

/// Test upper quantile lines sit above lower quantile lines.
#[test]
fn test_quantile_ordering() {
    let x: Vec<f64> = (0..60).map(|i| i as f64 * 0.1).collect();
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, v)| v + if i % 2 == 0 { 10.0 } else { -10.0 })
        .collect();
    let w = vec![1.0; 60];

    let low = solve_quantile(&x, &y, &w, 0.1, 400).unwrap();
    let high = solve_quantile(&x, &y, &w, 0.9, 400).unwrap();
    let mid = 3.0;
    assert!(high.coefficients.evaluate(mid) > low.coefficients.evaluate(mid));
}

/// Test an all-zero weight row skips the minimizer.
#[test]
fn test_quantile_zero_weights() {
    let (x, y) = line_data(5);
    let sol = solve_quantile(&x, &y, &[0.0; 5], 0.5, 400).unwrap();

    assert_eq!(sol.status, SolveStatus::ZeroWeights);
    assert_eq!(sol.coefficients, Coefficients::zero());
}

// ============================================================================
// Strategy Enum Tests
// ============================================================================

/// Test strategy validation.
#[test]
fn test_method_validation() {
    assert!(RegressionMethod::Linear.validate().is_ok());
    assert!(RegressionMethod::quantile(0.5).validate().is_ok());
    assert_eq!(
        RegressionMethod::quantile(1.0).validate(),
        Err(LowessError::InvalidQuantile(1.0))
    );
    assert!(RegressionMethod::Quantile {
        quantile: 0.5,
        max_iters: 0
    }
    .validate()
    .is_err());
}

/// Test dispatch through the strategy trait.
#[test]
fn test_method_dispatch() {
    let (x, y) = line_data(10);
    let w = vec![1.0; 10];

    let sol = RegressionMethod::Linear.solve_row(&x, &y, &w).unwrap();
    assert_relative_eq!(sol.coefficients.slope, 2.0, epsilon = 1e-9);
    assert_eq!(RegressionMethod::Linear.name(), "Linear");
    assert_eq!(RegressionMethod::quantile(0.3).name(), "Quantile");
}

/// Test the strategy serializes as a tagged enum.
#[test]
fn test_method_serde() {
    let json = serde_json::to_value(RegressionMethod::quantile(0.9)).unwrap();
    assert_eq!(json["kind"], "quantile");
    assert_eq!(json["quantile"], 0.9);

    let back: RegressionMethod =
        serde_json::from_str(r#"{"kind":"quantile","quantile":0.9,"max_iters":400}"#).unwrap();
    assert_eq!(back, RegressionMethod::quantile(0.9));

    let linear: RegressionMethod = serde_json::from_str(r#"{"kind":"linear"}"#).unwrap();
    assert_eq!(linear, RegressionMethod::Linear);
}
