//! Input validation for LOWESS, bootstrap and date-ensemble settings.
//!
//! ## Purpose
//!
//! Static checks shared by every configuration type and by the fit entry
//! points: sample arrays, per-sample weights, prediction locations, and the
//! numeric parameters of the builders (fraction, passes, quantiles, runs,
//! date thresholds).
//!
//! ## Design notes
//!
//! * **Fail-Fast**: The first violation is returned.
//! * **Cheap first**: Length checks run before per-element scans.
//!
//! ## Key concepts
//!
//! * **Open and half-open bounds**: fraction in (0, 1], quantiles and interval
//!   levels in (0, 1), thresholds strictly positive.
//! * **Two points minimum**: a local line needs at least two samples overall.
//!
//! ## Non-goals
//!
//! * Inputs are never sorted, deduplicated or repaired here.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::LowessError;

/// Maximum number of robust iterations accepted.
pub const MAX_ROBUST_ITERATIONS: usize = 1000;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for LOWESS configuration and input data.
///
/// Provides static methods that return `Result<(), LowessError>` and fail
/// fast upon identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Core Input Validation
    // ========================================================================

    /// Validate training arrays for a LOWESS fit.
    pub fn validate_inputs<T: Float>(x: &[T], y: &[T]) -> Result<(), LowessError> {
        if x.is_empty() || y.is_empty() {
            return Err(LowessError::EmptyInput);
        }

        let n = x.len();
        if n != y.len() {
            return Err(LowessError::MismatchedInputs {
                x_len: n,
                y_len: y.len(),
            });
        }

        if n < 2 {
            return Err(LowessError::TooFewPoints { got: n, min: 2 });
        }

        for (i, (&xv, &yv)) in x.iter().zip(y).enumerate() {
            if !xv.is_finite() {
                return Err(LowessError::InvalidNumericValue(format!(
                    "x[{}]={}",
                    i,
                    xv.to_f64().unwrap_or(f64::NAN)
                )));
            }
            if !yv.is_finite() {
                return Err(LowessError::InvalidNumericValue(format!(
                    "y[{}]={}",
                    i,
                    yv.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        Ok(())
    }

    /// Validate a per-sample weight vector (external or robust weights).
    pub fn validate_sample_weights<T: Float>(
        weights: &[T],
        n: usize,
        name: &'static str,
    ) -> Result<(), LowessError> {
        if weights.len() != n {
            return Err(LowessError::MismatchedLength {
                name,
                expected: n,
                got: weights.len(),
            });
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < T::zero())
        {
            return Err(LowessError::InvalidNumericValue(format!(
                "{}[{}]={} (weights must be finite and non-negative)",
                name,
                i,
                w.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }

    /// Validate prediction locations.
    pub fn validate_prediction_points<T: Float>(x_pred: &[T]) -> Result<(), LowessError> {
        if x_pred.is_empty() {
            return Err(LowessError::EmptyInput);
        }
        for (i, &v) in x_pred.iter().enumerate() {
            if !v.is_finite() {
                return Err(LowessError::InvalidNumericValue(format!(
                    "x_pred[{}]={}",
                    i,
                    v.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }
        Ok(())
    }

    /// Validate a single numeric value for finiteness.
    pub fn validate_scalar<T: Float>(val: T, name: &str) -> Result<(), LowessError> {
        if !val.is_finite() {
            return Err(LowessError::InvalidNumericValue(format!(
                "{}={}",
                name,
                val.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the smoothing fraction (bandwidth) parameter.
    pub fn validate_fraction(fraction: f64) -> Result<(), LowessError> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(LowessError::InvalidFraction(fraction));
        }
        Ok(())
    }

    /// Validate the number of robust iterations.
    ///
    /// One pass is a plain fit; at most [`MAX_ROBUST_ITERATIONS`] passes.
    pub fn validate_iterations(iterations: usize) -> Result<(), LowessError> {
        if iterations == 0 || iterations > MAX_ROBUST_ITERATIONS {
            return Err(LowessError::InvalidIterations(iterations));
        }
        Ok(())
    }

    /// Validate the robust residual clip bound.
    pub fn validate_max_std_dev<T: Float>(max_std_dev: T) -> Result<(), LowessError> {
        if !max_std_dev.is_finite() || max_std_dev <= T::zero() {
            return Err(LowessError::InvalidInput(format!(
                "max_std_dev must be positive and finite, got {}",
                max_std_dev.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }

    /// Validate the confidence interval level.
    pub fn validate_interval_level(level: f64) -> Result<(), LowessError> {
        if !level.is_finite() || level <= 0.0 || level >= 1.0 {
            return Err(LowessError::InvalidIntervals(level));
        }
        Ok(())
    }

    /// Validate a regression quantile.
    pub fn validate_quantile(q: f64) -> Result<(), LowessError> {
        if !q.is_finite() || q <= 0.0 || q >= 1.0 {
            return Err(LowessError::InvalidQuantile(q));
        }
        Ok(())
    }

    /// Validate a list of regression quantiles.
    pub fn validate_quantiles(qs: &[f64]) -> Result<(), LowessError> {
        if qs.is_empty() {
            return Err(LowessError::InvalidInput(
                "at least one quantile is required".to_string(),
            ));
        }
        qs.iter().try_for_each(|&q| Self::validate_quantile(q))
    }

    /// Validate the number of bootstrap runs.
    pub fn validate_runs(runs: usize) -> Result<(), LowessError> {
        if runs == 0 {
            return Err(LowessError::InvalidRuns(runs));
        }
        Ok(())
    }

    /// Validate a date smoothing threshold value.
    pub fn validate_threshold(value: f64) -> Result<(), LowessError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(LowessError::InvalidThreshold(value));
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), LowessError> {
        if let Some(param) = duplicate_param {
            return Err(LowessError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
