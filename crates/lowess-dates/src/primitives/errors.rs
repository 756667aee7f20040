//! Error types for LOWESS operations.
//!
//! ## Purpose
//!
//! This module defines error conditions that can occur while fitting and
//! predicting with LOWESS models, bootstrapping them, or blending the
//! time-adaptive ensemble.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors include relevant values (e.g., actual vs. expected lengths).
//! * **Deferred**: Builder misuse is recorded during configuration and reported by `build()`.
//! * **Trait Implementation**: Implements `Display` and `std::error::Error`.
//!
//! ## Key concepts
//!
//! 1. **Input validation**: Empty arrays, mismatched lengths, non-finite values.
//! 2. **Parameter validation**: Invalid fraction, iterations, quantiles, bag sizes or thresholds.
//! 3. **Solver failures**: Errors raised by the numerical minimizer are wrapped, not swallowed.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * Numerical degeneracy (singular systems, zero-weight rows) is never an error;
//!   it is resolved where it occurs.

// External dependencies
use std::error::Error;
use std::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for LOWESS operations.
#[derive(Debug, Clone, PartialEq)]
pub enum LowessError {
    /// Input arrays are empty.
    EmptyInput,

    /// Generic invalid input error with a descriptive message.
    InvalidInput(String),

    /// `x` and `y` arrays must have the same number of elements.
    MismatchedInputs {
        /// Number of elements in the `x` array.
        x_len: usize,
        /// Number of elements in the `y` array.
        y_len: usize,
    },

    /// An auxiliary per-sample array (weights, dates) does not match the sample count.
    MismatchedLength {
        /// Name of the offending array.
        name: &'static str,
        /// Number of samples.
        expected: usize,
        /// Number of elements provided.
        got: usize,
    },

    /// Input data contains NaN or infinite values.
    InvalidNumericValue(String),

    /// Number of points is below the minimum requirement.
    TooFewPoints {
        /// Number of points provided.
        got: usize,
        /// Minimum required points.
        min: usize,
    },

    /// Bandwidth fraction must be in the range (0, 1].
    InvalidFraction(f64),

    /// Robust iterations must be in the range [1, 1000].
    InvalidIterations(usize),

    /// Number of evenly spaced anchors must be at least 1.
    InvalidNumFits(usize),

    /// Quantile must be strictly between 0 and 1.
    InvalidQuantile(f64),

    /// Interval coverage level must be strictly between 0 and 1.
    InvalidIntervals(f64),

    /// Bootstrap bag size must be a fraction in (0, 1] or a positive integer count.
    InvalidBagSize(f64),

    /// Number of bootstrap runs must be at least 1.
    InvalidRuns(usize),

    /// Date smoothing threshold must be positive and finite.
    InvalidThreshold(f64),

    /// Unrecognised date unit code.
    InvalidDateUnit(String),

    /// The same regression date was supplied more than once.
    DuplicateRegressionDate(String),

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },

    /// The numerical minimizer behind quantile regression failed.
    SolverFailure(String),
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for LowessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::EmptyInput => write!(f, "Input arrays are empty"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::MismatchedInputs { x_len, y_len } => {
                write!(f, "Length mismatch: x has {x_len} points, y has {y_len}")
            }
            Self::MismatchedLength {
                name,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Length mismatch: {name} has {got} elements, expected {expected}"
                )
            }
            Self::InvalidNumericValue(s) => write!(f, "Invalid numeric value: {s}"),
            Self::TooFewPoints { got, min } => {
                write!(f, "Too few points: got {got}, need at least {min}")
            }
            Self::InvalidFraction(frac) => {
                write!(f, "Invalid fraction: {frac} (must be > 0 and <= 1)")
            }
            Self::InvalidIterations(iter) => {
                write!(f, "Invalid robust iterations: {iter} (must be in [1, 1000])")
            }
            Self::InvalidNumFits(num) => {
                write!(f, "Invalid num_fits: {num} (must be at least 1)")
            }
            Self::InvalidQuantile(q) => {
                write!(f, "Invalid quantile: {q} (must be > 0 and < 1)")
            }
            Self::InvalidIntervals(level) => {
                write!(f, "Invalid interval level: {level} (must be > 0 and < 1)")
            }
            Self::InvalidBagSize(size) => {
                write!(
                    f,
                    "Invalid bag size: {size} (must be a fraction in (0, 1] or a positive integer)"
                )
            }
            Self::InvalidRuns(runs) => {
                write!(f, "Invalid number of bootstrap runs: {runs} (must be >= 1)")
            }
            Self::InvalidThreshold(value) => {
                write!(f, "Invalid date threshold: {value} (must be > 0 and finite)")
            }
            Self::InvalidDateUnit(unit) => {
                write!(
                    f,
                    "Invalid date unit: '{unit}' (expected one of s, min, h, D, W)"
                )
            }
            Self::DuplicateRegressionDate(date) => {
                write!(f, "Regression date {date} was supplied more than once")
            }
            Self::DuplicateParameter { parameter } => {
                write!(
                    f,
                    "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
                )
            }
            Self::SolverFailure(msg) => write!(f, "Quantile solver failed: {msg}"),
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

impl Error for LowessError {}

impl From<argmin::core::Error> for LowessError {
    fn from(err: argmin::core::Error) -> Self {
        Self::SolverFailure(err.to_string())
    }
}
