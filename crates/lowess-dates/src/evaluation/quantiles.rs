//! Quantile curves from repeated quantile LOWESS fits.
//!
//! ## Purpose
//!
//! This module fits the LOWESS model once per requested quantile, using the
//! quantile regression strategy, and collects one prediction curve per
//! quantile.
//!
//! ## Invariants
//!
//! * Curve `j` is the fit at `quantiles[j]`.
//! * Default prediction locations are the sorted unique training `x`.

// External dependencies
use core::cmp::Ordering;
use core::fmt::{self, Display, Formatter};
use ndarray::{Array2, ArrayView1, Axis};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Internal dependencies
use crate::algorithms::regression::{RegressionMethod, WLSSolver, DEFAULT_QUANTILE_MAX_ITERS};
use crate::engine::executor::{LowessConfig, LowessExecutor, SampleWeights};
use crate::engine::output::write_table;
use crate::engine::validator::Validator;
use crate::primitives::anchors::linspace;
use crate::primitives::errors::LowessError;

/// Nine quantiles evenly spaced over [0.1, 0.9].
pub fn default_quantiles() -> Vec<f64> {
    linspace(0.1, 0.9, 9)
}

/// Configuration of a quantile-curve experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileConfig<T> {
    /// Base model; its regression method is replaced per quantile.
    pub lowess: LowessConfig<T>,

    /// Quantiles to fit, each in (0, 1).
    pub quantiles: Vec<f64>,

    /// Nelder-Mead iteration cap per local regression.
    pub max_iters: u64,
}

impl<T: Float> Default for QuantileConfig<T> {
    fn default() -> Self {
        Self {
            lowess: LowessConfig::default(),
            quantiles: default_quantiles(),
            max_iters: DEFAULT_QUANTILE_MAX_ITERS,
        }
    }
}

impl<T: Float> QuantileConfig<T> {
    /// Validate every configuration field.
    pub fn validate(&self) -> Result<(), LowessError> {
        Validator::validate_quantiles(&self.quantiles)?;
        self.lowess.validate()?;
        self.method_for(0.5).validate()
    }

    fn method_for(&self, quantile: f64) -> RegressionMethod {
        RegressionMethod::Quantile {
            quantile,
            max_iters: self.max_iters,
        }
    }
}

/// One prediction curve per quantile, `points × quantiles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileCurves<T> {
    x: Vec<T>,
    quantiles: Vec<f64>,
    values: Array2<T>,
}

impl<T: Float> QuantileCurves<T> {
    /// Prediction locations.
    pub fn x(&self) -> &[T] {
        &self.x
    }

    /// Fitted quantiles.
    pub fn quantiles(&self) -> &[f64] {
        &self.quantiles
    }

    /// Prediction matrix, `points × quantiles`.
    pub fn values(&self) -> &Array2<T> {
        &self.values
    }

    /// Curve of the quantile at `index`.
    pub fn curve(&self, index: usize) -> Option<ArrayView1<'_, T>> {
        (index < self.values.ncols()).then(|| self.values.column(index))
    }

    /// Curve of the quantile closest to `q`.
    pub fn curve_for(&self, q: f64) -> Option<ArrayView1<'_, T>> {
        let index = self
            .quantiles
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - q)
                    .abs()
                    .partial_cmp(&(*b - q).abs())
                    .unwrap_or(Ordering::Equal)
            })
            .map(|(i, _)| i)?;
        self.curve(index)
    }
}

/// Sorted unique values.
pub fn sorted_unique<T: Float>(values: &[T]) -> Vec<T> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted.dedup();
    sorted
}

/// Fit every quantile and predict at `x_pred` (sorted unique `x` when absent).
pub fn quantile_curves<T: WLSSolver>(
    config: &QuantileConfig<T>,
    x: &[T],
    y: &[T],
    x_pred: Option<&[T]>,
) -> Result<QuantileCurves<T>, LowessError> {
    config.validate()?;
    Validator::validate_inputs(x, y)?;
    let x_pred = match x_pred {
        Some(points) => {
            Validator::validate_prediction_points(points)?;
            points.to_vec()
        }
        None => sorted_unique(x),
    };

    let mut values = Array2::zeros((x_pred.len(), config.quantiles.len()));
    for (&q, mut column) in config.quantiles.iter().zip(values.axis_iter_mut(Axis(1))) {
        debug!(quantile = q, "fitting quantile curve");
        let mut lowess = config.lowess.clone();
        lowess.method = config.method_for(q);

        let fitted = LowessExecutor::fit(&lowess, x, y, SampleWeights::default())?;
        for (v, p) in column.iter_mut().zip(fitted.predict(x_pred.as_slice())?) {
            *v = p;
        }
    }

    Ok(QuantileCurves {
        x: x_pred,
        quantiles: config.quantiles.clone(),
        values,
    })
}

impl<T: Float + Display> Display for QuantileCurves<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Points:      {}", self.x.len())?;
        writeln!(f, "  Quantiles:   {}", self.quantiles.len())?;
        writeln!(f)?;

        let labels: Vec<String> = self.quantiles.iter().map(|q| format!("q={q:.2}")).collect();
        let mut headers: Vec<&str> = vec!["X"];
        headers.extend(labels.iter().map(String::as_str));

        writeln!(f, "Quantile Curves:")?;
        write_table(f, &headers, self.x.len(), |f, i| {
            write!(f, "{:>8.2}", self.x[i])?;
            for j in 0..self.values.ncols() {
                write!(f, " {:>12.6}", self.values[[i, j]])?;
            }
            Ok(())
        })
    }
}
