//! Point predictions from the time-adaptive surface (lowess dates).
//!
//! ## Purpose
//!
//! [`FittedLowessDates`] wraps a fitted ensemble and maps irregular observed
//! `(x, date)` pairs onto its smoothed surface, reconstructing a single
//! series of smoothed estimates.
//!
//! ## Key concepts
//!
//! * **Grid**: x values `round(arange(floor(min) - 5, ceil(max) + 5, 10^-dec), dec)`
//!   over the observed x, evaluated at the prediction regression dates.
//! * **Lookup**: Every observation reads the surface at its rounded x and its
//!   nearest grid date.
//!
//! ## Invariants
//!
//! * The output has one value per observed pair, in input order.

// External dependencies
use chrono::{DateTime, Utc};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Internal dependencies
use crate::adapters::smooth_dates::{fit_smooth_dates, FittedSmoothDates, SmoothDatesConfig};
use crate::adapters::surface::Surface;
use crate::adapters::time_weights::nearest_date_index;
use crate::algorithms::regression::WLSSolver;
use crate::engine::validator::Validator;
use crate::primitives::errors::LowessError;

/// Default number of decimals the x grid is rounded to.
pub const DEFAULT_ROUNDING_DEC: u32 = 1;

/// Padding added on either side of the observed x range, in x units.
const GRID_PADDING: f64 = 5.0;

/// Largest supported rounding precision.
const MAX_ROUNDING_DEC: u32 = 9;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration of the point-prediction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowessDatesConfig<T> {
    /// Underlying ensemble configuration.
    pub smooth: SmoothDatesConfig<T>,

    /// Dates of the evaluation grid; the fitted regression dates when absent.
    pub pred_reg_dates: Option<Vec<DateTime<Utc>>>,

    /// Decimals of the x grid.
    pub rounding_dec: u32,
}

impl<T: Float> Default for LowessDatesConfig<T> {
    fn default() -> Self {
        Self {
            smooth: SmoothDatesConfig::default(),
            pred_reg_dates: None,
            rounding_dec: DEFAULT_ROUNDING_DEC,
        }
    }
}

impl<T: Float> LowessDatesConfig<T> {
    /// Validate every configuration field.
    pub fn validate(&self) -> Result<(), LowessError> {
        self.smooth.validate()?;
        if self.rounding_dec > MAX_ROUNDING_DEC {
            return Err(LowessError::InvalidInput(format!(
                "rounding_dec must be at most {MAX_ROUNDING_DEC}, got {}",
                self.rounding_dec
            )));
        }
        if let Some(dates) = &self.pred_reg_dates {
            if dates.is_empty() {
                return Err(LowessError::InvalidInput(
                    "pred_reg_dates must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Grid
// ============================================================================

/// x grid covering `values` padded by 5 on each side, `10^-dec` apart.
pub fn prediction_grid<T: Float>(values: &[T], rounding_dec: u32) -> Vec<T> {
    let Some((start, stop)) = grid_bounds(values) else {
        return Vec::new();
    };
    let scale = 10f64.powi(rounding_dec as i32);
    let count = ((stop - start) * scale).round() as usize;
    (0..count)
        .map(|i| T::from(((start * scale).round() + i as f64) / scale).unwrap_or_else(T::zero))
        .collect()
}

fn grid_bounds<T: Float>(values: &[T]) -> Option<(f64, f64)> {
    let (min, max) = values.iter().filter_map(|v| v.to_f64()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    })?;
    Some((min.floor() - GRID_PADDING, max.ceil() + GRID_PADDING))
}

// ============================================================================
// Fitted Model
// ============================================================================

/// Fitted point-prediction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedLowessDates<T> {
    ensemble: FittedSmoothDates<T>,
    pred_reg_dates: Vec<DateTime<Utc>>,
    rounding_dec: u32,
}

impl<T: Float + 'static> FittedLowessDates<T> {
    /// Underlying ensemble.
    pub fn ensemble(&self) -> &FittedSmoothDates<T> {
        &self.ensemble
    }

    /// Dates of the evaluation grid.
    pub fn pred_reg_dates(&self) -> &[DateTime<Utc>] {
        &self.pred_reg_dates
    }

    /// Decimals of the x grid.
    pub fn rounding_dec(&self) -> u32 {
        self.rounding_dec
    }

    /// Surface on the x grid built around `x_obs`.
    pub fn grid_surface(&self, x_obs: &[T]) -> Result<Surface<T>, LowessError> {
        Validator::validate_prediction_points(x_obs)?;
        let grid = prediction_grid(x_obs, self.rounding_dec);
        self.ensemble.predict(&grid, Some(&self.pred_reg_dates[..]))
    }

    /// Smoothed estimate at every observed `(x, date)` pair.
    pub fn predict(&self, x_obs: &[T], dates: &[DateTime<Utc>]) -> Result<Vec<T>, LowessError> {
        if dates.len() != x_obs.len() {
            return Err(LowessError::MismatchedLength {
                name: "dates",
                expected: x_obs.len(),
                got: dates.len(),
            });
        }
        let surface = self.grid_surface(x_obs)?;
        debug!(
            grid_points = surface.x().len(),
            grid_dates = surface.dates().len(),
            observations = x_obs.len(),
            "looking up lowess dates surface"
        );

        let Some((start, _)) = grid_bounds(x_obs) else {
            return Err(LowessError::EmptyInput);
        };
        let scale = 10f64.powi(self.rounding_dec as i32);
        let last_x = surface.x().len().saturating_sub(1);

        x_obs
            .iter()
            .zip(dates)
            .map(|(&x, &date)| {
                let xf = x.to_f64().unwrap_or(start);
                let x_index = (((xf - start) * scale).round().max(0.0) as usize).min(last_x);
                let date_index = nearest_date_index(surface.dates(), date).ok_or(LowessError::EmptyInput)?;
                surface
                    .value_at(date_index, x_index)
                    .ok_or(LowessError::EmptyInput)
            })
            .collect()
    }
}

/// Fit the ensemble backing a point-prediction model.
pub fn fit_lowess_dates<T: WLSSolver>(
    config: &LowessDatesConfig<T>,
    x: &[T],
    y: &[T],
    dt_idx: &[DateTime<Utc>],
    reg_dates: Option<&[DateTime<Utc>]>,
) -> Result<FittedLowessDates<T>, LowessError> {
    config.validate()?;
    let ensemble = fit_smooth_dates(&config.smooth, x, y, dt_idx, reg_dates)?;
    let pred_reg_dates = config
        .pred_reg_dates
        .clone()
        .unwrap_or_else(|| ensemble.reg_dates());

    Ok(FittedLowessDates {
        ensemble,
        pred_reg_dates,
        rounding_dec: config.rounding_dec,
    })
}
