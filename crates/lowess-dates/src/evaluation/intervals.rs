//! Empirical confidence intervals from bootstrap predictions.
//!
//! ## Purpose
//!
//! This module turns a `points × runs` matrix of bootstrap predictions into a
//! pointwise `(lower, upper)` band.
//!
//! ## Key concepts
//!
//! * **Band**: For coverage `c`, the `(1 - c) / 2` and `1 - (1 - c) / 2`
//!   quantiles across runs at every point.
//!
//! ## Invariants
//!
//! * Coverage levels must satisfy 0 < level < 1.
//! * `lower <= upper` at every point.
//! * A point with zero spread across runs has `lower == upper`.
//!
//! ## Non-goals
//!
//! * This module does not provide analytic (leverage-based) intervals.
//! * This module does not handle simultaneous confidence bands.

// External dependencies
use core::fmt::{self, Display, Formatter};
use ndarray::{Array2, Axis};
use num_traits::Float;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::engine::output::write_table;
use crate::engine::validator::Validator;
use crate::math::stats::quantile_linear;
use crate::primitives::errors::LowessError;

/// Default interval coverage.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Pointwise empirical confidence band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval<T> {
    /// Coverage level.
    pub level: f64,

    /// Prediction locations.
    pub x: Vec<T>,

    /// Lower bound per location.
    pub lower: Vec<T>,

    /// Upper bound per location.
    pub upper: Vec<T>,
}

impl<T: Float> ConfidenceInterval<T> {
    /// Build the band from a `points × runs` prediction matrix.
    pub fn from_runs(x: &[T], runs: &Array2<T>, level: f64) -> Result<Self, LowessError> {
        Validator::validate_interval_level(level)?;
        if runs.nrows() != x.len() {
            return Err(LowessError::MismatchedLength {
                name: "bootstrap predictions",
                expected: x.len(),
                got: runs.nrows(),
            });
        }
        if runs.ncols() == 0 {
            return Err(LowessError::EmptyInput);
        }

        let tail = (1.0 - level) / 2.0;
        let (mut lower, mut upper) = (Vec::with_capacity(x.len()), Vec::with_capacity(x.len()));
        for row in runs.axis_iter(Axis(0)) {
            let values = row.to_vec();
            lower.push(quantile_linear(&values, tail).unwrap_or_else(T::nan));
            upper.push(quantile_linear(&values, 1.0 - tail).unwrap_or_else(T::nan));
        }

        Ok(Self {
            level,
            x: x.to_vec(),
            lower,
            upper,
        })
    }

    /// Band width at every location.
    pub fn widths(&self) -> Vec<T> {
        self.upper
            .iter()
            .zip(&self.lower)
            .map(|(&u, &l)| u - l)
            .collect()
    }
}

impl<T: Float + Display> Display for ConfidenceInterval<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Points:      {}", self.x.len())?;
        writeln!(f, "  Level:       {}", self.level)?;
        writeln!(f)?;

        writeln!(f, "Confidence Interval:")?;
        write_table(f, &["X", "Lower", "Upper"], self.x.len(), |f, i| {
            write!(
                f,
                "{:>8.2} {:>12.6} {:>12.6}",
                self.x[i], self.lower[i], self.upper[i]
            )
        })
    }
}
