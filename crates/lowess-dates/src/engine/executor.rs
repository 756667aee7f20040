//! Execution engine for LOWESS fits and predictions.
//!
//! ## Purpose
//!
//! This module orchestrates one LOWESS fit: it resolves anchors, builds the
//! tricube loading weights, applies external and robustness weights, solves
//! one local regression per anchor and runs the robust reweighting loop. It
//! also implements prediction by kernel-blending the fitted anchor lines.
//!
//! ## Design notes
//!
//! * **Explicit loop**: Robust iterations run in a bounded loop; only the last
//!   pass's loading weights and design matrix are kept.
//! * **Pluggable solver**: The per-anchor pass is generic over
//!   [`LocalRegression`], so custom strategies reuse the whole engine.
//! * **Parallel rows**: Anchor rows are independent and run through the
//!   configured [`Backend`].
//!
//! ## Key concepts
//!
//! * **Loading weights** (`anchors × samples`): tricube weights scaled by
//!   `external × robust` per sample, then normalized per anchor row.
//! * **Design matrix** (`anchors × 2`): intercept and slope per anchor.
//! * **Blend** (`predictions × anchors`): tricube weights between prediction
//!   points and anchors, normalized per prediction point.
//!
//! ## Invariants
//!
//! * Loading weight rows sum to 1 or are all zero.
//! * The same inputs always produce a bit-identical design matrix.
//!
//! ## Non-goals
//!
//! * This module does not validate builder duplicates (handled by `api`).

// External dependencies
use std::borrow::Cow;

use ndarray::{Array2, ArrayView1, Axis};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

// Internal dependencies
use crate::algorithms::regression::{LocalRegression, RegressionMethod, SolveStatus, WLSSolver};
use crate::algorithms::robustness::{robust_weights, DEFAULT_MAX_STD_DEV};
use crate::engine::output::FittedLowess;
use crate::engine::validator::Validator;
use crate::math::kernel::{blend_weights, normalize_rows, scale_columns, tricube_weights};
use crate::primitives::anchors::AnchorSpec;
use crate::primitives::backend::Backend;
use crate::primitives::errors::LowessError;

/// Default bandwidth fraction for a plain LOWESS fit.
pub const DEFAULT_FRACTION: f64 = 0.4;

/// Default number of fit passes (one plain fit plus two robust refits).
pub const DEFAULT_ROBUST_ITERS: usize = 3;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for one LOWESS fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowessConfig<T> {
    /// Bandwidth fraction in (0, 1].
    pub fraction: f64,

    /// Anchor derivation.
    pub anchors: AnchorSpec<T>,

    /// Number of fit passes in [1, 1000]; passes after the first are robust refits.
    pub robust_iters: usize,

    /// Residual clip bound for robustness weights, in residual standard deviations.
    pub max_std_dev: T,

    /// Local regression strategy.
    pub method: RegressionMethod,

    /// Execution backend for anchor rows.
    pub backend: Backend,
}

impl<T: Float> Default for LowessConfig<T> {
    fn default() -> Self {
        Self {
            fraction: DEFAULT_FRACTION,
            anchors: AnchorSpec::Samples,
            robust_iters: DEFAULT_ROBUST_ITERS,
            max_std_dev: T::from(DEFAULT_MAX_STD_DEV).unwrap_or_else(T::one),
            method: RegressionMethod::Linear,
            backend: Backend::default(),
        }
    }
}

impl<T: Float> LowessConfig<T> {
    /// Validate every configuration field.
    pub fn validate(&self) -> Result<(), LowessError> {
        Validator::validate_fraction(self.fraction)?;
        Validator::validate_iterations(self.robust_iters)?;
        Validator::validate_max_std_dev(self.max_std_dev)?;
        self.anchors.validate()?;
        self.method.validate()
    }
}

/// Per-sample weights supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct SampleWeights<'a, T> {
    /// Caller bias per sample (e.g. recency); all ones when absent.
    pub external: Option<&'a [T]>,

    /// Robustness weights for the first pass; all ones when absent.
    pub robust: Option<&'a [T]>,
}

impl<T> Default for SampleWeights<'_, T> {
    fn default() -> Self {
        Self {
            external: None,
            robust: None,
        }
    }
}

/// Output of one fit pass.
#[derive(Debug, Clone)]
pub struct FitPass<T> {
    /// Normalized loading weights, `anchors × samples`.
    pub loading_weights: Array2<T>,

    /// Coefficients, `anchors × 2`.
    pub design: Array2<T>,

    /// Whether each anchor had any positive weight.
    pub active: Vec<bool>,
}

// ============================================================================
// Executor
// ============================================================================

/// Stateless LOWESS fit/predict engine.
pub struct LowessExecutor;

impl LowessExecutor {
    // ========================================================================
    // Fit
    // ========================================================================

    /// Fit a LOWESS model.
    pub fn fit<T: WLSSolver>(
        config: &LowessConfig<T>,
        x: &[T],
        y: &[T],
        weights: SampleWeights<'_, T>,
    ) -> Result<FittedLowess<T>, LowessError> {
        config.validate()?;
        Validator::validate_inputs(x, y)?;
        let n = x.len();

        let external = resolve_weights(weights.external, n, "external_weights")?;
        let mut robust = resolve_weights(weights.robust, n, "robust_weights")?.into_owned();

        let anchors = config.anchors.resolve(x)?;
        let base = tricube_weights(&anchors, x, config.fraction);

        debug!(
            samples = n,
            anchors = anchors.len(),
            fraction = config.fraction,
            robust_iters = config.robust_iters,
            method = config.method.name(),
            "fitting lowess"
        );

        let mut pass = None;
        for iteration in 0..config.robust_iters {
            let sample_weights: Vec<T> = external
                .iter()
                .zip(robust.iter())
                .map(|(&e, &r)| e * r)
                .collect();

            let current = Self::fit_pass(&config.method, x, y, &base, &sample_weights, config.backend)?;
            trace!(iteration, "lowess pass complete");

            if iteration + 1 < config.robust_iters {
                let y_fit = Self::predict_blend(
                    &anchors,
                    &current.active,
                    &current.design,
                    config.fraction,
                    x,
                );
                robust = robust_weights(y, &y_fit, config.max_std_dev);
            }
            pass = Some(current);
        }

        // robust_iters >= 1 is validated above
        let pass = pass.ok_or(LowessError::InvalidIterations(config.robust_iters))?;

        Ok(FittedLowess {
            fraction: config.fraction,
            anchors,
            loading_weights: pass.loading_weights,
            design: pass.design,
            active: pass.active,
            method: config.method,
            robustness_weights: robust,
            iterations: config.robust_iters,
        })
    }

    /// One pass: weight, normalize and solve every anchor row.
    ///
    /// `base` holds un-normalized tricube weights (`anchors × samples`) and
    /// `sample_weights` the combined per-sample multipliers.
    pub fn fit_pass<T, R>(
        solver: &R,
        x: &[T],
        y: &[T],
        base: &Array2<T>,
        sample_weights: &[T],
        backend: Backend,
    ) -> Result<FitPass<T>, LowessError>
    where
        T: WLSSolver,
        R: LocalRegression<T> + ?Sized,
    {
        let mut loading_weights = base.clone();
        scale_columns(&mut loading_weights, sample_weights);
        let degenerate = normalize_rows(&mut loading_weights);
        if degenerate > 0 {
            warn!(rows = degenerate, "anchor rows with no positive weight");
        }

        let active: Vec<bool> = loading_weights
            .axis_iter(Axis(0))
            .map(|row| row.iter().any(|&w| w > T::zero()))
            .collect();

        let lw = &loading_weights;
        let solutions = backend.try_map_indexed(lw.nrows(), |a| {
            let row = row_slice(lw.row(a));
            solver.solve_row(x, y, &row)
        })?;

        let mut design = Array2::zeros((solutions.len(), 2));
        let (mut least_squares, mut capped) = (0usize, 0usize);
        for (a, solution) in solutions.iter().enumerate() {
            design[[a, 0]] = solution.coefficients.intercept;
            design[[a, 1]] = solution.coefficients.slope;
            match solution.status {
                SolveStatus::LeastSquares => least_squares += 1,
                SolveStatus::IterationCap => capped += 1,
                SolveStatus::Solved | SolveStatus::ZeroWeights => {}
            }
        }
        if least_squares > 0 {
            warn!(rows = least_squares, "singular normal equations, used least squares");
        }
        if capped > 0 {
            warn!(rows = capped, "quantile solver stopped at its iteration cap");
        }

        Ok(FitPass {
            loading_weights,
            design,
            active,
        })
    }

    // ========================================================================
    // Predict
    // ========================================================================

    /// Blend the anchor lines at every prediction point.
    ///
    /// Inactive anchors (no positive loading weight) never contribute. A
    /// prediction point with no active anchor inside the bandwidth uses the
    /// line of its nearest active anchor.
    pub fn predict_blend<T: Float>(
        anchors: &[T],
        active: &[bool],
        design: &Array2<T>,
        fraction: f64,
        x_pred: &[T],
    ) -> Vec<T> {
        let (blend, degenerate) = blend_weights(anchors, active, x_pred, fraction);
        if degenerate > 0 {
            trace!(points = degenerate, "prediction points outside every anchor bandwidth");
        }

        let line = |a: usize, xp: T| design[[a, 0]] + design[[a, 1]] * xp;

        x_pred
            .iter()
            .enumerate()
            .map(|(p, &xp)| {
                let weights = blend.row(p);
                let total = weights.iter().fold(T::zero(), |acc, &w| acc + w);
                if total > T::zero() {
                    weights
                        .iter()
                        .enumerate()
                        .fold(T::zero(), |acc, (a, &w)| acc + w * line(a, xp))
                } else {
                    nearest_active(anchors, active, xp).map_or_else(T::zero, |a| line(a, xp))
                }
            })
            .collect()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn resolve_weights<'a, T: Float>(
    weights: Option<&'a [T]>,
    n: usize,
    name: &'static str,
) -> Result<Cow<'a, [T]>, LowessError> {
    match weights {
        Some(w) => {
            Validator::validate_sample_weights(w, n, name)?;
            Ok(Cow::Borrowed(w))
        }
        None => Ok(Cow::Owned(vec![T::one(); n])),
    }
}

fn row_slice<T: Float>(row: ArrayView1<'_, T>) -> Cow<'_, [T]> {
    match row.to_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(row.to_vec()),
    }
}

fn nearest_active<T: Float>(anchors: &[T], active: &[bool], x: T) -> Option<usize> {
    anchors
        .iter()
        .enumerate()
        .filter(|(i, _)| active.get(*i).copied().unwrap_or(false))
        .min_by(|(_, a), (_, b)| {
            (**a - x)
                .abs()
                .partial_cmp(&(**b - x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}
