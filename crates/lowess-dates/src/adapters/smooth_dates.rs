//! Time-adaptive LOWESS ensemble (smooth dates).
//!
//! ## Purpose
//!
//! This module fits one LOWESS model per regression date, each over the full
//! sample set but weighted in time by a tricube kernel around its date, and
//! blends the members' curves into a smoothed `dates × x` surface.
//!
//! ## Design notes
//!
//! * **Independent members**: Member fits share only read-only inputs and run
//!   through [`Backend`]; inner fits then run sequentially.
//! * **Ordered members**: Members keep the order of the regression dates.
//! * **Blend**: Prediction dates are weighted against regression dates with
//!   the model's own threshold, normalized per prediction date.
//!
//! ## Key concepts
//!
//! * **Member predictions** (`regression dates × x`).
//! * **Blend weights** (`prediction dates × regression dates`).
//! * **Surface** = blend · member predictions (`prediction dates × x`).
//!
//! ## Invariants
//!
//! * Regression dates are unique. Explicit duplicates are rejected; repeated
//!   sample dates collapse to one member when they serve as the default.
//! * A prediction date with no regression date inside the threshold gets an
//!   all-zero surface row.

// External dependencies
use chrono::{DateTime, Utc};
use ndarray::{Array2, Axis};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

// Internal dependencies
use crate::adapters::surface::Surface;
use crate::adapters::time_weights::{date_weights, DateThreshold};
use crate::algorithms::regression::WLSSolver;
use crate::engine::executor::{LowessConfig, LowessExecutor, SampleWeights};
use crate::engine::output::FittedLowess;
use crate::engine::validator::Validator;
use crate::math::kernel::normalize_rows;
use crate::primitives::backend::Backend;
use crate::primitives::errors::LowessError;

/// Default bandwidth fraction for the time-adaptive models.
pub const DEFAULT_DATES_FRACTION: f64 = 0.3;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration of a time-adaptive ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothDatesConfig<T> {
    /// Per-member LOWESS configuration.
    pub lowess: LowessConfig<T>,

    /// Temporal bandwidth.
    pub threshold: DateThreshold,

    /// Backend used across members.
    pub backend: Backend,
}

impl<T: Float> Default for SmoothDatesConfig<T> {
    fn default() -> Self {
        Self {
            lowess: LowessConfig {
                fraction: DEFAULT_DATES_FRACTION,
                ..LowessConfig::default()
            },
            threshold: DateThreshold::default(),
            backend: Backend::default(),
        }
    }
}

impl<T: Float> SmoothDatesConfig<T> {
    /// Validate every configuration field.
    pub fn validate(&self) -> Result<(), LowessError> {
        self.lowess.validate()?;
        self.threshold.validate()
    }
}

// ============================================================================
// Fitted Ensemble
// ============================================================================

/// One regression date with its temporal weights and fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleMember<T> {
    /// Regression date the member is centred on.
    pub date: DateTime<Utc>,

    /// Temporal weight of every training sample.
    pub weights: Vec<T>,

    /// LOWESS fit under those weights.
    pub model: FittedLowess<T>,
}

/// Fitted time-adaptive ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedSmoothDates<T> {
    fraction: f64,
    threshold: DateThreshold,
    members: Vec<EnsembleMember<T>>,
}

impl<T: Float + 'static> FittedSmoothDates<T> {
    /// Bandwidth fraction of every member.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Temporal bandwidth.
    pub fn threshold(&self) -> DateThreshold {
        self.threshold
    }

    /// Members in regression-date order.
    pub fn members(&self) -> &[EnsembleMember<T>] {
        &self.members
    }

    /// Regression dates in fit order.
    pub fn reg_dates(&self) -> Vec<DateTime<Utc>> {
        self.members.iter().map(|m| m.date).collect()
    }

    /// Member centred on `date`.
    pub fn member(&self, date: DateTime<Utc>) -> Option<&EnsembleMember<T>> {
        self.members.iter().find(|m| m.date == date)
    }

    /// Every member's curve at `x_pred`, `regression dates × x`.
    pub fn member_predictions(&self, x_pred: &[T]) -> Result<Array2<T>, LowessError> {
        Validator::validate_prediction_points(x_pred)?;
        let mut values = Array2::zeros((self.members.len(), x_pred.len()));
        for (mut row, member) in values.axis_iter_mut(Axis(0)).zip(&self.members) {
            for (v, p) in row.iter_mut().zip(member.model.predict(x_pred)?) {
                *v = p;
            }
        }
        Ok(values)
    }

    /// Blend weights, `prediction dates × regression dates`, rows summing to 1 or 0.
    pub fn blend_weights(&self, dt_pred: &[DateTime<Utc>]) -> Array2<T> {
        let mut weights = Array2::zeros((dt_pred.len(), self.members.len()));
        for (mut column, member) in weights.axis_iter_mut(Axis(1)).zip(&self.members) {
            let w: Vec<T> = date_weights(dt_pred, member.date, &self.threshold);
            for (c, v) in column.iter_mut().zip(w) {
                *c = v;
            }
        }
        let degenerate = normalize_rows(&mut weights);
        if degenerate > 0 {
            warn!(dates = degenerate, "prediction dates beyond every regression date threshold");
        }
        weights
    }

    /// Surface matrix, `prediction dates × x`.
    ///
    /// `dt_pred` defaults to the regression dates.
    pub fn predict_matrix(
        &self,
        x_pred: &[T],
        dt_pred: Option<&[DateTime<Utc>]>,
    ) -> Result<Array2<T>, LowessError> {
        let reg_dates;
        let dt_pred = match dt_pred {
            Some(dates) => dates,
            None => {
                reg_dates = self.reg_dates();
                &reg_dates
            }
        };
        if dt_pred.is_empty() {
            return Err(LowessError::EmptyInput);
        }

        let member_values = self.member_predictions(x_pred)?;
        let blend = self.blend_weights(dt_pred);
        Ok(blend.dot(&member_values))
    }

    /// Labelled surface over `x_pred` and `dt_pred` (defaults to the regression dates).
    pub fn predict(
        &self,
        x_pred: &[T],
        dt_pred: Option<&[DateTime<Utc>]>,
    ) -> Result<Surface<T>, LowessError> {
        let values = self.predict_matrix(x_pred, dt_pred)?;
        Ok(Surface {
            x: x_pred.to_vec(),
            dates: dt_pred.map_or_else(|| self.reg_dates(), <[_]>::to_vec),
            values,
        })
    }
}

// ============================================================================
// Fit
// ============================================================================

/// Distinct dates in first-seen order.
pub fn unique_dates(dates: &[DateTime<Utc>]) -> Vec<DateTime<Utc>> {
    let mut seen = HashSet::with_capacity(dates.len());
    dates.iter().copied().filter(|d| seen.insert(*d)).collect()
}

/// Fit one member per regression date (defaults to the distinct sample dates).
pub fn fit_smooth_dates<T: WLSSolver>(
    config: &SmoothDatesConfig<T>,
    x: &[T],
    y: &[T],
    dt_idx: &[DateTime<Utc>],
    reg_dates: Option<&[DateTime<Utc>]>,
) -> Result<FittedSmoothDates<T>, LowessError> {
    config.validate()?;
    Validator::validate_inputs(x, y)?;
    if dt_idx.len() != x.len() {
        return Err(LowessError::MismatchedLength {
            name: "dt_idx",
            expected: x.len(),
            got: dt_idx.len(),
        });
    }

    let reg_dates = match reg_dates {
        Some(dates) => {
            let mut seen = HashSet::with_capacity(dates.len());
            if let Some(dup) = dates.iter().find(|d| !seen.insert(**d)) {
                return Err(LowessError::DuplicateRegressionDate(dup.to_rfc3339()));
            }
            dates.to_vec()
        }
        None => unique_dates(dt_idx),
    };
    if reg_dates.is_empty() {
        return Err(LowessError::EmptyInput);
    }

    debug!(
        members = reg_dates.len(),
        samples = x.len(),
        threshold = %config.threshold,
        "fitting smooth dates ensemble"
    );

    let mut inner = config.lowess.clone();
    if config.backend.is_parallel() {
        inner.backend = Backend::Sequential;
    }

    let members = config.backend.try_map_indexed(reg_dates.len(), |i| {
        let date = reg_dates[i];
        let weights: Vec<T> = date_weights(dt_idx, date, &config.threshold);
        let model = LowessExecutor::fit(
            &inner,
            x,
            y,
            SampleWeights {
                external: Some(&weights[..]),
                robust: None,
            },
        )?;
        Ok::<_, LowessError>(EnsembleMember {
            date,
            weights,
            model,
        })
    })?;

    Ok(FittedSmoothDates {
        fraction: config.lowess.fraction,
        threshold: config.threshold,
        members,
    })
}
