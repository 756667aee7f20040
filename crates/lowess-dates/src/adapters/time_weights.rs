//! Temporal tricube weighting around regression dates.
//!
//! ## Purpose
//!
//! This module maps dates to weights reflecting their proximity to a central
//! regression date. Offsets are measured in units of a threshold duration and
//! fed through the same tricube kernel as the x-axis weights.
//!
//! ## Key concepts
//!
//! * **Threshold**: A value and a unit (e.g. 52 weeks); dates at least one
//!   threshold away from the centre get weight 0.
//! * **Date units**: Parsed from compact codes (`s`, `min`/`T`, `h`/`H`, `D`, `W`).
//!
//! ## Invariants
//!
//! * Weights are in [0, 1], equal to 1 at the centre and symmetric in time.

// External dependencies
use chrono::{DateTime, Duration, Utc};
use core::fmt::{self, Display, Formatter};
use core::str::FromStr;
use num_traits::Float;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::engine::validator::Validator;
use crate::math::kernel::tricube;
use crate::primitives::errors::LowessError;

// ============================================================================
// Units and Thresholds
// ============================================================================

/// Time unit of a date threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateUnit {
    /// Seconds (`s`).
    Seconds,

    /// Minutes (`min`, `T`).
    Minutes,

    /// Hours (`h`, `H`).
    Hours,

    /// Calendar days (`D`).
    Days,

    /// Weeks (`W`).
    Weeks,
}

impl DateUnit {
    /// Length of one unit in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            DateUnit::Seconds => 1,
            DateUnit::Minutes => 60,
            DateUnit::Hours => 3_600,
            DateUnit::Days => 86_400,
            DateUnit::Weeks => 604_800,
        }
    }

    /// Canonical unit code.
    pub fn code(&self) -> &'static str {
        match self {
            DateUnit::Seconds => "s",
            DateUnit::Minutes => "min",
            DateUnit::Hours => "h",
            DateUnit::Days => "D",
            DateUnit::Weeks => "W",
        }
    }

    /// Duration of `count` units.
    pub fn duration(&self, count: i64) -> Result<Duration, LowessError> {
        count
            .checked_mul(self.seconds())
            .and_then(Duration::try_seconds)
            .ok_or_else(|| LowessError::InvalidInput(format!("{count}{} is out of range", self.code())))
    }
}

impl FromStr for DateUnit {
    type Err = LowessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" | "S" => Ok(DateUnit::Seconds),
            "min" | "T" => Ok(DateUnit::Minutes),
            "h" | "H" => Ok(DateUnit::Hours),
            "D" | "d" => Ok(DateUnit::Days),
            "W" | "w" => Ok(DateUnit::Weeks),
            other => Err(LowessError::InvalidDateUnit(other.to_string())),
        }
    }
}

impl Display for DateUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Temporal bandwidth: dates this far from the centre get zero weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateThreshold {
    /// Number of units.
    pub value: f64,

    /// Unit of `value`.
    pub unit: DateUnit,
}

impl Default for DateThreshold {
    fn default() -> Self {
        Self {
            value: 52.0,
            unit: DateUnit::Weeks,
        }
    }
}

impl DateThreshold {
    /// Threshold of `value` units.
    pub fn new(value: f64, unit: DateUnit) -> Self {
        Self { value, unit }
    }

    /// Parse the unit from a code such as `"W"`.
    pub fn parse(value: f64, unit: &str) -> Result<Self, LowessError> {
        let threshold = Self::new(value, unit.parse()?);
        threshold.validate()?;
        Ok(threshold)
    }

    /// Check the threshold is positive and finite.
    pub fn validate(&self) -> Result<(), LowessError> {
        Validator::validate_threshold(self.value)
    }

    /// Threshold length in seconds.
    pub fn as_seconds(&self) -> f64 {
        self.value * self.unit.seconds() as f64
    }
}

impl Display for DateThreshold {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

// ============================================================================
// Distances and Weights
// ============================================================================

/// Signed offset of `date` from `central`, in thresholds.
#[inline]
pub fn timedelta_distance(date: DateTime<Utc>, central: DateTime<Utc>, threshold: &DateThreshold) -> f64 {
    let offset = (date - central).num_milliseconds() as f64 / 1_000.0;
    offset / threshold.as_seconds()
}

/// Signed offsets of every date from `central`, in thresholds.
pub fn timedelta_distances(
    dates: &[DateTime<Utc>],
    central: DateTime<Utc>,
    threshold: &DateThreshold,
) -> Vec<f64> {
    dates
        .iter()
        .map(|&d| timedelta_distance(d, central, threshold))
        .collect()
}

/// Tricube weight of every date around `central`.
pub fn date_weights<T: Float>(
    dates: &[DateTime<Utc>],
    central: DateTime<Utc>,
    threshold: &DateThreshold,
) -> Vec<T> {
    timedelta_distances(dates, central, threshold)
        .into_iter()
        .map(|d| T::from(tricube(d, 1.0)).unwrap_or_else(T::zero))
        .collect()
}

// ============================================================================
// Date Grids
// ============================================================================

/// Regular dates from `start` to `end` inclusive, `step` apart.
pub fn date_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Result<Vec<DateTime<Utc>>, LowessError> {
    if step <= Duration::zero() {
        return Err(LowessError::InvalidInput(format!(
            "date_range step must be positive, got {step}"
        )));
    }
    if end < start {
        return Err(LowessError::InvalidInput(format!(
            "date_range end {end} precedes start {start}"
        )));
    }

    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current = match current.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(dates)
}

/// Index of the date closest to `target`. `None` for an empty list.
pub fn nearest_date_index(dates: &[DateTime<Utc>], target: DateTime<Utc>) -> Option<usize> {
    dates
        .iter()
        .enumerate()
        .min_by_key(|(_, d)| (**d - target).num_milliseconds().unsigned_abs())
        .map(|(i, _)| i)
}
