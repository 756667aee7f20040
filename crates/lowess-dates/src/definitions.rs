//! Model-definition records for batches of time-adaptive fits.
//!
//! ## Purpose
//!
//! A model definition names the regression-date grid, the bandwidths and the
//! set of fit variants (quantiles plus the linear average) to run over one
//! dataset. [`fit_model_definition`] turns a definition into one fitted
//! [`FittedSmoothDates`] per variant, named `{name}_{variant}`.
//!
//! Persisting the fitted models is left to the caller; every record and
//! fitted type is `serde`-serializable.

// External dependencies
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// Internal dependencies
use crate::adapters::smooth_dates::{
    fit_smooth_dates, FittedSmoothDates, SmoothDatesConfig, DEFAULT_DATES_FRACTION,
};
use crate::adapters::time_weights::{date_range, DateThreshold, DateUnit};
use crate::algorithms::regression::{RegressionMethod, WLSSolver};
use crate::engine::executor::{LowessConfig, DEFAULT_ROBUST_ITERS};
use crate::primitives::anchors::{linspace, AnchorSpec};
use crate::primitives::backend::Backend;
use crate::primitives::errors::LowessError;

// ============================================================================
// Records
// ============================================================================

/// One fit run within a model definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitVariant {
    /// Suffix of the fitted model's name.
    pub name: String,

    /// Quantile for quantile regression; linear regression when `None`.
    pub quantile: Option<f64>,
}

impl FitVariant {
    /// Linear (mean) variant.
    pub fn linear(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantile: None,
        }
    }

    /// Quantile variant named `p{100 q}`.
    pub fn quantile(q: f64) -> Self {
        Self {
            name: format!("p{}", (q * 100.0).round() as i64),
            quantile: Some(q),
        }
    }

    /// Regression method this variant fits with.
    pub fn method(&self) -> RegressionMethod {
        self.quantile
            .map_or(RegressionMethod::Linear, RegressionMethod::quantile)
    }
}

/// Quantile variants `p10` to `p90` followed by the linear `average`.
pub fn default_fit_variants() -> Vec<FitVariant> {
    linspace(0.1_f64, 0.9, 9)
        .into_iter()
        .map(FitVariant::quantile)
        .chain(std::iter::once(FitVariant::linear("average")))
        .collect()
}

/// Definition of a batch of time-adaptive fits over one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Bandwidth fraction of every member.
    pub frac: f64,

    /// Number of evenly spaced anchors; the sample `x` values when `None`.
    pub num_fits: Option<usize>,

    /// First regression date.
    pub reg_dates_start: DateTime<Utc>,

    /// Last regression date (inclusive).
    pub reg_dates_end: DateTime<Utc>,

    /// Number of `reg_dates_unit` between regression dates.
    pub reg_dates_step: i64,

    /// Unit of `reg_dates_step`.
    pub reg_dates_unit: DateUnit,

    /// Temporal bandwidth.
    pub dates_smoothing: DateThreshold,

    /// Number of fit passes per member.
    pub robust_iters: usize,

    /// Fit runs to produce.
    pub fit_variants: Vec<FitVariant>,
}

impl ModelDefinition {
    /// Definition with weekly regression dates and default bandwidths.
    pub fn new(reg_dates_start: DateTime<Utc>, reg_dates_end: DateTime<Utc>) -> Self {
        Self {
            frac: DEFAULT_DATES_FRACTION,
            num_fits: None,
            reg_dates_start,
            reg_dates_end,
            reg_dates_step: 1,
            reg_dates_unit: DateUnit::Weeks,
            dates_smoothing: DateThreshold::default(),
            robust_iters: DEFAULT_ROBUST_ITERS,
            fit_variants: default_fit_variants(),
        }
    }

    /// Regression dates from start to end inclusive.
    pub fn reg_dates(&self) -> Result<Vec<DateTime<Utc>>, LowessError> {
        let step = self.reg_dates_unit.duration(self.reg_dates_step)?;
        date_range(self.reg_dates_start, self.reg_dates_end, step)
    }

    /// Ensemble configuration for one variant.
    pub fn smooth_dates_config<T: WLSSolver>(&self, variant: &FitVariant) -> SmoothDatesConfig<T> {
        SmoothDatesConfig {
            lowess: LowessConfig {
                fraction: self.frac,
                anchors: AnchorSpec::from_parts(None, self.num_fits),
                robust_iters: self.robust_iters,
                method: variant.method(),
                ..LowessConfig::default()
            },
            threshold: self.dates_smoothing,
            backend: Backend::default(),
        }
    }
}

// ============================================================================
// Fit
// ============================================================================

/// Fit every variant of `definition`, returning `({name}_{variant}, model)` pairs.
pub fn fit_model_definition<T: WLSSolver>(
    name: &str,
    definition: &ModelDefinition,
    x: &[T],
    y: &[T],
    dt_idx: &[DateTime<Utc>],
) -> Result<Vec<(String, FittedSmoothDates<T>)>, LowessError> {
    if definition.fit_variants.is_empty() {
        return Err(LowessError::InvalidInput(format!(
            "model definition '{name}' has no fit variants"
        )));
    }
    let reg_dates = definition.reg_dates()?;

    definition
        .fit_variants
        .iter()
        .map(|variant| {
            let model_name = format!("{name}_{}", variant.name);
            debug!(model = %model_name, reg_dates = reg_dates.len(), "fitting model definition variant");
            let config = definition.smooth_dates_config(variant);
            let fitted = fit_smooth_dates(&config, x, y, dt_idx, Some(&reg_dates[..]))?;
            Ok((model_name, fitted))
        })
        .collect()
}
