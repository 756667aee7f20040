//! Fitted model snapshots and result tables.
//!
//! ## Purpose
//!
//! This module defines [`FittedLowess`], the immutable snapshot produced by a
//! fit, and the shared table formatting used by every printable result.
//!
//! ## Design notes
//!
//! * **Snapshot**: A fit returns a new value; predicting is only possible on a
//!   snapshot, so predict-before-fit cannot be expressed.
//! * **Serializable**: Snapshots derive `serde` so applications can persist them.
//! * **Ergonomics**: Implements `Display` for human-readable output.
//!
//! ## Invariants
//!
//! * `design.nrows() == anchors.len() == loading_weights.nrows()`.
//! * `loading_weights.ncols() == robustness_weights.len()` (training samples).
//!
//! ## Non-goals
//!
//! * This module does not perform fitting (responsibility of the executor).

// External dependencies
use core::fmt::{self, Display, Formatter};
use ndarray::{Array2, ArrayView2};
use num_traits::Float;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::algorithms::regression::{Coefficients, RegressionMethod};
use crate::engine::executor::LowessExecutor;
use crate::engine::validator::Validator;
use crate::primitives::errors::LowessError;
use crate::primitives::input::LowessInput;

// ============================================================================
// Fitted Model
// ============================================================================

/// Immutable result of a LOWESS fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedLowess<T> {
    pub(crate) fraction: f64,
    pub(crate) anchors: Vec<T>,
    pub(crate) loading_weights: Array2<T>,
    pub(crate) design: Array2<T>,
    pub(crate) active: Vec<bool>,
    pub(crate) method: RegressionMethod,
    pub(crate) robustness_weights: Vec<T>,
    pub(crate) iterations: usize,
}

impl<T: Float> FittedLowess<T> {
    // ========================================================================
    // Prediction
    // ========================================================================

    /// Predict at `x_pred` by blending the fitted anchor lines.
    pub fn predict<I>(&self, x_pred: &I) -> Result<Vec<T>, LowessError>
    where
        I: LowessInput<T> + ?Sized,
    {
        let x_pred = x_pred.as_lowess_slice()?;
        Validator::validate_prediction_points(x_pred)?;
        Ok(LowessExecutor::predict_blend(
            &self.anchors,
            &self.active,
            &self.design,
            self.fraction,
            x_pred,
        ))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Bandwidth fraction used for the fit.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Anchor locations.
    pub fn anchors(&self) -> &[T] {
        &self.anchors
    }

    /// Loading weights of the final pass, `anchors × samples`.
    pub fn loading_weights(&self) -> ArrayView2<'_, T> {
        self.loading_weights.view()
    }

    /// Design matrix, `anchors × 2` (intercept, slope).
    pub fn design_matrix(&self) -> ArrayView2<'_, T> {
        self.design.view()
    }

    /// Coefficients of anchor `index`.
    pub fn coefficients(&self, index: usize) -> Option<Coefficients<T>> {
        (index < self.design.nrows()).then(|| Coefficients {
            intercept: self.design[[index, 0]],
            slope: self.design[[index, 1]],
        })
    }

    /// Whether each anchor received any positive loading weight.
    ///
    /// Inactive anchors have zero coefficients and are left out of predictions.
    pub fn active_anchors(&self) -> &[bool] {
        &self.active
    }

    /// Regression strategy used for the fit.
    pub fn method(&self) -> RegressionMethod {
        self.method
    }

    /// Robustness weights used in the final pass.
    pub fn robustness_weights(&self) -> &[T] {
        &self.robustness_weights
    }

    /// Number of fit passes performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl<T: Float + Display> Display for FittedLowess<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Anchors:     {}", self.anchors.len())?;
        writeln!(f, "  Samples:     {}", self.robustness_weights.len())?;
        writeln!(f, "  Fraction:    {}", self.fraction)?;
        writeln!(f, "  Iterations:  {}", self.iterations)?;
        writeln!(f, "  Method:      {}", self.method.name())?;
        writeln!(f)?;

        writeln!(f, "Local Regressions:")?;
        write_table(
            f,
            &["Anchor", "Intercept", "Slope"],
            self.anchors.len(),
            |f, i| {
                write!(
                    f,
                    "{:>8.2} {:>12.6} {:>12.6}",
                    self.anchors[i],
                    self.design[[i, 0]],
                    self.design[[i, 1]]
                )
            },
        )
    }
}

/// Write a right-aligned table, eliding the middle when longer than 20 rows.
///
/// The first header is 8 wide and the rest 12 wide, matching the row writer.
pub(crate) fn write_table<F>(
    f: &mut Formatter<'_>,
    headers: &[&str],
    n: usize,
    mut row: F,
) -> fmt::Result
where
    F: FnMut(&mut Formatter<'_>, usize) -> fmt::Result,
{
    let mut width = 0;
    for (i, h) in headers.iter().enumerate() {
        if i == 0 {
            write!(f, "{:>8}", h)?;
            width += 8;
        } else {
            write!(f, " {:>12}", h)?;
            width += 13;
        }
    }
    writeln!(f)?;
    writeln!(f, "{:-<width$}", "", width = width)?;

    let rows: Vec<usize> = if n <= 20 {
        (0..n).collect()
    } else {
        (0..10).chain(n - 10..n).collect()
    };

    let mut prev = 0;
    for (i, &idx) in rows.iter().enumerate() {
        if i > 0 && idx != prev + 1 {
            writeln!(f, "{:>8}", "...")?;
        }
        prev = idx;
        row(f, idx)?;
        writeln!(f)?;
    }

    Ok(())
}
