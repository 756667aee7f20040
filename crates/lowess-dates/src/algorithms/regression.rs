//! Local regression solvers.
//!
//! ## Purpose
//!
//! This module solves one local regression per anchor: given the samples and
//! that anchor's weight row, it returns the `(intercept, slope)` of the local
//! line. Two strategies are provided, weighted least squares and weighted
//! quantile (pinball) loss minimization.
//!
//! ## Design notes
//!
//! * **Strategy as data**: [`RegressionMethod`] is a tagged, serializable enum,
//!   so fitted models stay portable. Custom solvers plug in through
//!   [`LocalRegression`].
//! * **SIMD accumulation**: Weighted sums use `wide` lanes for f64/f32.
//! * **Least-squares fallback**: Ill-conditioned normal equations are solved
//!   by SVD (minimum-norm solution) instead of failing.
//!
//! ## Key concepts
//!
//! * **Normal equations**: `[[Σw, Σwx], [Σwx, Σwx²]] · β = [Σwy, Σwxy]`.
//! * **Pinball loss**: `Σ max(q·r, (q-1)·r)` over weighted residuals
//!   `r = w·(y - β0 - β1·x)`, minimized by Nelder-Mead from `(0, 0)`.
//!
//! ## Invariants
//!
//! * Solutions are finite for finite inputs.
//! * An all-zero weight row yields `(0, 0)`.

// External dependencies
use argmin::core::{CostFunction, Error as ArgminError, Executor, State};
use argmin::solver::neldermead::NelderMead;
use nalgebra::{Matrix2, Vector2};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use wide::{f32x8, f64x2};

// Internal dependencies
use crate::primitives::errors::LowessError;

/// Default iteration cap for the quantile solver (200 per parameter).
pub const DEFAULT_QUANTILE_MAX_ITERS: u64 = 400;

/// Function-value spread at which the simplex is considered converged.
const QUANTILE_SD_TOLERANCE: f64 = 1e-12;

/// Relative conditioning threshold below which the direct 2×2 solve is skipped.
const CONDITION_TOLERANCE: f64 = 1e-12;

// ============================================================================
// Coefficients
// ============================================================================

/// Intercept and slope of one local line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients<T> {
    /// Intercept (beta_0).
    pub intercept: T,

    /// Slope (beta_1).
    pub slope: T,
}

impl<T: Float> Coefficients<T> {
    /// Both coefficients zero.
    pub fn zero() -> Self {
        Self {
            intercept: T::zero(),
            slope: T::zero(),
        }
    }

    /// Evaluate the line at `x`.
    #[inline]
    pub fn evaluate(&self, x: T) -> T {
        self.intercept + self.slope * x
    }
}

/// How a row was solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Direct solve or converged minimization.
    Solved,

    /// Normal equations were ill-conditioned; least-squares fallback used.
    LeastSquares,

    /// The weight row was all zero.
    ZeroWeights,

    /// The minimizer stopped at its iteration cap.
    IterationCap,
}

/// Result of one local regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSolution<T> {
    /// Fitted line.
    pub coefficients: Coefficients<T>,

    /// Solve outcome, used for diagnostics.
    pub status: SolveStatus,
}

impl<T: Float> RowSolution<T> {
    fn zero_weights() -> Self {
        Self {
            coefficients: Coefficients::zero(),
            status: SolveStatus::ZeroWeights,
        }
    }
}

// ============================================================================
// Weighted Sum Accumulation
// ============================================================================

/// Weighted sums `(Σw, Σwx, Σwy, Σwxx, Σwxy)`, scalar path.
#[inline]
pub fn accumulate_wls_scalar<T: Float>(x: &[T], y: &[T], weights: &[T]) -> (T, T, T, T, T) {
    let zero = T::zero();
    x.iter().zip(y).zip(weights).fold(
        (zero, zero, zero, zero, zero),
        |(sw, swx, swy, swxx, swxy), ((&xv, &yv), &w)| {
            let wx = w * xv;
            (sw + w, swx + wx, swy + w * yv, swxx + wx * xv, swxy + wx * yv)
        },
    )
}

/// SIMD-optimized weighted sums (f64).
#[inline]
pub fn accumulate_wls_simd_f64(x: &[f64], y: &[f64], weights: &[f64]) -> (f64, f64, f64, f64, f64) {
    let n = x.len().min(y.len()).min(weights.len());
    let (x, y, weights) = (&x[..n], &y[..n], &weights[..n]);

    let mut s_w = f64x2::splat(0.0);
    let mut s_wx = f64x2::splat(0.0);
    let mut s_wy = f64x2::splat(0.0);
    let mut s_wxx = f64x2::splat(0.0);
    let mut s_wxy = f64x2::splat(0.0);

    let xc = x.chunks_exact(2);
    let yc = y.chunks_exact(2);
    let wc = weights.chunks_exact(2);
    let tail = n - xc.remainder().len();

    for ((xs, ys), ws) in xc.zip(yc).zip(wc) {
        let w = f64x2::new([ws[0], ws[1]]);
        let xv = f64x2::new([xs[0], xs[1]]);
        let yv = f64x2::new([ys[0], ys[1]]);
        let wx = w * xv;

        s_w += w;
        s_wx += wx;
        s_wy += w * yv;
        s_wxx += wx * xv;
        s_wxy += wx * yv;
    }

    let (r_w, r_wx, r_wy, r_wxx, r_wxy) =
        accumulate_wls_scalar(&x[tail..], &y[tail..], &weights[tail..]);

    (
        s_w.reduce_add() + r_w,
        s_wx.reduce_add() + r_wx,
        s_wy.reduce_add() + r_wy,
        s_wxx.reduce_add() + r_wxx,
        s_wxy.reduce_add() + r_wxy,
    )
}

/// SIMD-optimized weighted sums (f32).
#[inline]
pub fn accumulate_wls_simd_f32(x: &[f32], y: &[f32], weights: &[f32]) -> (f32, f32, f32, f32, f32) {
    let n = x.len().min(y.len()).min(weights.len());
    let (x, y, weights) = (&x[..n], &y[..n], &weights[..n]);

    let mut s_w = f32x8::splat(0.0);
    let mut s_wx = f32x8::splat(0.0);
    let mut s_wy = f32x8::splat(0.0);
    let mut s_wxx = f32x8::splat(0.0);
    let mut s_wxy = f32x8::splat(0.0);

    let lanes = |s: &[f32]| f32x8::new([s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]]);

    let xc = x.chunks_exact(8);
    let yc = y.chunks_exact(8);
    let wc = weights.chunks_exact(8);
    let tail = n - xc.remainder().len();

    for ((xs, ys), ws) in xc.zip(yc).zip(wc) {
        let w = lanes(ws);
        let xv = lanes(xs);
        let yv = lanes(ys);
        let wx = w * xv;

        s_w += w;
        s_wx += wx;
        s_wy += w * yv;
        s_wxx += wx * xv;
        s_wxy += wx * yv;
    }

    let (r_w, r_wx, r_wy, r_wxx, r_wxy) =
        accumulate_wls_scalar(&x[tail..], &y[tail..], &weights[tail..]);

    (
        s_w.reduce_add() + r_w,
        s_wx.reduce_add() + r_wx,
        s_wy.reduce_add() + r_wy,
        s_wxx.reduce_add() + r_wxx,
        s_wxy.reduce_add() + r_wxy,
    )
}

// ============================================================================
// Solver Trait
// ============================================================================

/// Type-specific weighted least squares accumulation.
pub trait WLSSolver: Float + Send + Sync + 'static {
    /// Accumulate weighted statistics.
    #[inline]
    fn accumulate_wls(x: &[Self], y: &[Self], weights: &[Self]) -> (Self, Self, Self, Self, Self) {
        accumulate_wls_scalar(x, y, weights)
    }
}

impl WLSSolver for f64 {
    #[inline]
    fn accumulate_wls(x: &[f64], y: &[f64], weights: &[f64]) -> (f64, f64, f64, f64, f64) {
        accumulate_wls_simd_f64(x, y, weights)
    }
}

impl WLSSolver for f32 {
    #[inline]
    fn accumulate_wls(x: &[f32], y: &[f32], weights: &[f32]) -> (f32, f32, f32, f32, f32) {
        accumulate_wls_simd_f32(x, y, weights)
    }
}

// ============================================================================
// Linear Solver
// ============================================================================

/// Weighted least squares line for one weight row.
pub fn solve_linear<T: WLSSolver>(x: &[T], y: &[T], weights: &[T]) -> RowSolution<T> {
    let (sw, swx, swy, swxx, swxy) = T::accumulate_wls(x, y, weights);
    if sw <= T::zero() || !sw.is_finite() {
        return RowSolution::zero_weights();
    }

    let det = sw * swxx - swx * swx;
    let scale = (sw * swxx).abs();
    let tol = T::from(CONDITION_TOLERANCE).unwrap_or_else(T::epsilon);

    if det.is_finite() && det > tol * scale {
        let slope = (sw * swxy - swx * swy) / det;
        let intercept = (swxx * swy - swx * swxy) / det;
        return RowSolution {
            coefficients: Coefficients { intercept, slope },
            status: SolveStatus::Solved,
        };
    }

    RowSolution {
        coefficients: least_squares_2x2(sw, swx, swy, swxx, swxy),
        status: SolveStatus::LeastSquares,
    }
}

/// Minimum-norm least-squares solution of the normal equations via SVD.
fn least_squares_2x2<T: Float>(sw: T, swx: T, swy: T, swxx: T, swxy: T) -> Coefficients<T> {
    let f = |v: T| v.to_f64().unwrap_or(0.0);
    let a = Matrix2::new(f(sw), f(swx), f(swx), f(swxx));
    let b = Vector2::new(f(swy), f(swxy));
    let eps = f64::EPSILON * 100.0 * a.amax().max(1.0);

    match a.svd(true, true).solve(&b, eps) {
        Ok(beta) => Coefficients {
            intercept: T::from(beta[0]).unwrap_or_else(T::zero),
            slope: T::from(beta[1]).unwrap_or_else(T::zero),
        },
        // Only reachable when the SVD factors were not computed; use the weighted mean.
        Err(_) => Coefficients {
            intercept: swy / sw,
            slope: T::zero(),
        },
    }
}

// ============================================================================
// Quantile Solver
// ============================================================================

/// Weighted pinball loss of a line `(β0, β1)`.
#[derive(Debug, Clone)]
pub struct QuantileLoss {
    x: Vec<f64>,
    y: Vec<f64>,
    weights: Vec<f64>,
    quantile: f64,
}

impl QuantileLoss {
    /// Build the loss over the samples with non-zero weight.
    pub fn new<T: Float>(x: &[T], y: &[T], weights: &[T], quantile: f64) -> Self {
        let f = |v: &T| v.to_f64().unwrap_or(f64::NAN);
        let mut loss = Self {
            x: Vec::new(),
            y: Vec::new(),
            weights: Vec::new(),
            quantile,
        };
        for ((xv, yv), wv) in x.iter().zip(y).zip(weights) {
            let w = f(wv);
            if w != 0.0 {
                loss.x.push(f(xv));
                loss.y.push(f(yv));
                loss.weights.push(w);
            }
        }
        loss
    }

    /// Loss value at `(intercept, slope)`.
    pub fn value(&self, intercept: f64, slope: f64) -> f64 {
        let q = self.quantile;
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.weights)
            .map(|((&x, &y), &w)| {
                let r = w * (y - (intercept + slope * x));
                (q * r).max((q - 1.0) * r)
            })
            .sum()
    }

    fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Initial simplex around `(0, 0)`, scaled to the data.
    fn initial_simplex(&self) -> Vec<Vec<f64>> {
        let y_scale = self.y.iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(1e-3);
        let x_scale = self.x.iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(1.0);
        let step = 0.05 * y_scale;
        vec![vec![0.0, 0.0], vec![step, 0.0], vec![0.0, step / x_scale]]
    }
}

impl CostFunction for QuantileLoss {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok(self.value(param[0], param[1]))
    }
}

/// Weighted quantile regression line for one weight row.
pub fn solve_quantile<T: Float>(
    x: &[T],
    y: &[T],
    weights: &[T],
    quantile: f64,
    max_iters: u64,
) -> Result<RowSolution<T>, LowessError> {
    let loss = QuantileLoss::new(x, y, weights, quantile);
    if loss.is_empty() {
        return Ok(RowSolution::zero_weights());
    }

    let solver = NelderMead::new(loss.initial_simplex()).with_sd_tolerance(QUANTILE_SD_TOLERANCE)?;
    let result = Executor::new(loss, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()?;

    let state = result.state();
    let status = if state.get_iter() >= state.get_max_iters() {
        SolveStatus::IterationCap
    } else {
        SolveStatus::Solved
    };
    let best = state.get_best_param().cloned().ok_or_else(|| {
        LowessError::SolverFailure("minimizer returned no parameters".to_string())
    })?;

    Ok(RowSolution {
        coefficients: Coefficients {
            intercept: T::from(best[0]).unwrap_or_else(T::zero),
            slope: T::from(best[1]).unwrap_or_else(T::zero),
        },
        status,
    })
}

// ============================================================================
// Strategies
// ============================================================================

/// A local regression strategy: one weight row in, one line out.
pub trait LocalRegression<T: WLSSolver>: Sync {
    /// Solve the regression for one anchor's weight row.
    fn solve_row(&self, x: &[T], y: &[T], weights: &[T]) -> Result<RowSolution<T>, LowessError>;
}

/// Built-in regression strategies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressionMethod {
    /// Weighted least squares (default).
    #[default]
    Linear,

    /// Weighted quantile regression.
    Quantile {
        /// Target quantile in (0, 1).
        quantile: f64,

        /// Nelder-Mead iteration cap.
        max_iters: u64,
    },
}

impl RegressionMethod {
    /// Quantile regression at `q` with the default iteration cap.
    pub fn quantile(q: f64) -> Self {
        RegressionMethod::Quantile {
            quantile: q,
            max_iters: DEFAULT_QUANTILE_MAX_ITERS,
        }
    }

    /// Check method parameters.
    pub fn validate(&self) -> Result<(), LowessError> {
        match *self {
            RegressionMethod::Linear => Ok(()),
            RegressionMethod::Quantile {
                quantile,
                max_iters,
            } => {
                if !(quantile > 0.0 && quantile < 1.0) {
                    return Err(LowessError::InvalidQuantile(quantile));
                }
                if max_iters == 0 {
                    return Err(LowessError::InvalidInput(
                        "quantile solver max_iters must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            RegressionMethod::Linear => "Linear",
            RegressionMethod::Quantile { .. } => "Quantile",
        }
    }
}

impl<T: WLSSolver> LocalRegression<T> for RegressionMethod {
    fn solve_row(&self, x: &[T], y: &[T], weights: &[T]) -> Result<RowSolution<T>, LowessError> {
        match *self {
            RegressionMethod::Linear => Ok(solve_linear(x, y, weights)),
            RegressionMethod::Quantile {
                quantile,
                max_iters,
            } => solve_quantile(x, y, weights, quantile, max_iters),
        }
    }
}
