//! High-level API for LOWESS smoothing and its time-adaptive extensions.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder pattern for configuring the local regressions and choosing
//! what to build from them: a plain model, a time-adaptive ensemble, a
//! point-prediction model, a bootstrap experiment or quantile curves.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Polymorphic**: Marker types transition to specialized builders.
//! * **Validated**: Parameters are validated when `.build()` is called.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`LowessBuilder`] via `Lowess::new()`.
//! 2. Chain configuration methods (`.fraction()`, `.robust_iters()`, etc.).
//! 3. Either `.build()` a plain model, or select a specialized builder via
//!    `.adapter(SmoothDates)` (or `SmoothDates::new()` directly), then `.build()`.

// External dependencies
use chrono::{DateTime, Utc};
use num_traits::Float;

// Internal dependencies
use crate::adapters::lowess_dates::{fit_lowess_dates, LowessDatesConfig, DEFAULT_ROUNDING_DEC};
use crate::adapters::smooth_dates::{fit_smooth_dates, SmoothDatesConfig, DEFAULT_DATES_FRACTION};
use crate::adapters::time_weights::DateThreshold;
use crate::algorithms::regression::{RegressionMethod, WLSSolver, DEFAULT_QUANTILE_MAX_ITERS};
use crate::algorithms::robustness::DEFAULT_MAX_STD_DEV;
use crate::engine::executor::{
    LowessConfig, LowessExecutor, SampleWeights, DEFAULT_FRACTION, DEFAULT_ROBUST_ITERS,
};
use crate::engine::validator::Validator;
use crate::evaluation::bootstrap::{
    bootstrap_residual_std_devs, run_bootstrap, BootstrapConfig, ResidualStdDevs, DEFAULT_NUM_RUNS,
};
use crate::evaluation::intervals::DEFAULT_CONFIDENCE_LEVEL;
use crate::evaluation::quantiles::{default_quantiles, quantile_curves, QuantileConfig};
use crate::primitives::anchors::AnchorSpec;
use crate::primitives::backend::Backend;
use crate::primitives::input::LowessInput;

// Publicly re-exported types
pub use crate::adapters::lowess_dates::FittedLowessDates;
pub use crate::adapters::smooth_dates::{EnsembleMember, FittedSmoothDates};
pub use crate::adapters::surface::Surface;
pub use crate::adapters::time_weights::{date_range, DateUnit};
pub use crate::algorithms::regression::Coefficients;
pub use crate::engine::output::FittedLowess;
pub use crate::evaluation::bootstrap::{BagSize, BootstrapPredictions};
pub use crate::evaluation::intervals::ConfidenceInterval;
pub use crate::evaluation::quantiles::QuantileCurves;
pub use crate::primitives::errors::LowessError;

/// Marker types for selecting specialized builders.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Bootstrap, LowessDates, QuantileModel, SmoothDates};
}

// ============================================================================
// Base Builder
// ============================================================================

/// Fluent builder for the local regression parameters shared by every model.
#[derive(Debug, Clone)]
pub struct LowessBuilder<T> {
    /// Bandwidth fraction (0..1].
    pub fraction: Option<f64>,

    /// Explicit anchor locations.
    pub anchors: Option<Vec<T>>,

    /// Number of evenly spaced anchors.
    pub num_fits: Option<usize>,

    /// Number of fit passes (1 = no robust refits).
    pub robust_iters: Option<usize>,

    /// Residual clip bound for robustness weights.
    pub max_std_dev: Option<T>,

    /// Local regression strategy.
    pub method: Option<RegressionMethod>,

    /// Parallel execution hint.
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for LowessBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> LowessBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            fraction: None,
            anchors: None,
            num_fits: None,
            robust_iters: None,
            max_std_dev: None,
            method: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Select a specialized builder.
    pub fn adapter<A>(self, _adapter: A) -> A::Output
    where
        A: LowessAdapter<T>,
    {
        A::convert(self)
    }

    /// Set the bandwidth fraction.
    pub fn fraction(mut self, fraction: f64) -> Self {
        if self.fraction.is_some() {
            self.duplicate_param = Some("fraction");
        }
        self.fraction = Some(fraction);
        self
    }

    /// Center the local regressions on explicit locations (overrides `num_fits`).
    pub fn anchors(mut self, anchors: Vec<T>) -> Self {
        if self.anchors.is_some() {
            self.duplicate_param = Some("anchors");
        }
        self.anchors = Some(anchors);
        self
    }

    /// Center the local regressions on `num_fits` evenly spaced locations.
    pub fn num_fits(mut self, num_fits: usize) -> Self {
        if self.num_fits.is_some() {
            self.duplicate_param = Some("num_fits");
        }
        self.num_fits = Some(num_fits);
        self
    }

    /// Set the number of fit passes (1 disables robust reweighting).
    pub fn robust_iters(mut self, iterations: usize) -> Self {
        if self.robust_iters.is_some() {
            self.duplicate_param = Some("robust_iters");
        }
        self.robust_iters = Some(iterations);
        self
    }

    /// Set the residual clip bound, in residual standard deviations.
    pub fn max_std_dev(mut self, max_std_dev: T) -> Self {
        if self.max_std_dev.is_some() {
            self.duplicate_param = Some("max_std_dev");
        }
        self.max_std_dev = Some(max_std_dev);
        self
    }

    /// Set the local regression strategy.
    pub fn method(mut self, method: RegressionMethod) -> Self {
        if self.method.is_some() {
            self.duplicate_param = Some("method");
        }
        self.method = Some(method);
        self
    }

    /// Use quantile regression at `q` (shorthand for `.method(...)`).
    pub fn quantile(self, q: f64) -> Self {
        self.method(RegressionMethod::quantile(q))
    }

    /// Set parallel execution mode (requires the `cpu` feature).
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }

    fn backend(&self) -> Backend {
        Backend::from_parallel(self.parallel.unwrap_or(true))
    }

    /// Resolve into an engine configuration using `default_fraction` when unset.
    pub fn to_config(&self, default_fraction: f64) -> LowessConfig<T> {
        LowessConfig {
            fraction: self.fraction.unwrap_or(default_fraction),
            anchors: AnchorSpec::from_parts(self.anchors.clone(), self.num_fits),
            robust_iters: self.robust_iters.unwrap_or(DEFAULT_ROBUST_ITERS),
            max_std_dev: self
                .max_std_dev
                .unwrap_or_else(|| T::from(DEFAULT_MAX_STD_DEV).unwrap_or_else(T::one)),
            method: self.method.unwrap_or_default(),
            backend: self.backend(),
        }
    }

    fn validated_config(&self, default_fraction: f64) -> Result<LowessConfig<T>, LowessError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let config = self.to_config(default_fraction);
        config.validate()?;
        Ok(config)
    }

    /// Build a plain LOWESS model.
    pub fn build(self) -> Result<LowessModel<T>, LowessError> {
        Ok(LowessModel {
            config: self.validated_config(DEFAULT_FRACTION)?,
        })
    }
}

/// Configured plain LOWESS model.
#[derive(Debug, Clone, PartialEq)]
pub struct LowessModel<T> {
    config: LowessConfig<T>,
}

impl<T: WLSSolver> LowessModel<T> {
    /// Engine configuration.
    pub fn config(&self) -> &LowessConfig<T> {
        &self.config
    }

    /// Fit on `(x, y)`.
    pub fn fit<X, Y>(&self, x: &X, y: &Y) -> Result<FittedLowess<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
    {
        self.fit_weighted(x, y, None, None)
    }

    /// Fit with optional external (caller bias) and initial robustness weights.
    pub fn fit_weighted<X, Y>(
        &self,
        x: &X,
        y: &Y,
        external_weights: Option<&[T]>,
        robust_weights: Option<&[T]>,
    ) -> Result<FittedLowess<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
    {
        LowessExecutor::fit(
            &self.config,
            x.as_lowess_slice()?,
            y.as_lowess_slice()?,
            SampleWeights {
                external: external_weights,
                robust: robust_weights,
            },
        )
    }

    /// Fit, then predict at `x_pred` (the training `x` when absent).
    pub fn fit_predict<X, Y>(&self, x: &X, y: &Y, x_pred: Option<&[T]>) -> Result<Vec<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
    {
        let x = x.as_lowess_slice()?;
        let fitted = self.fit(x, y)?;
        fitted.predict(x_pred.unwrap_or(x))
    }
}

// ============================================================================
// Adapter Conversion
// ============================================================================

/// Conversion from the base builder into a specialized builder.
pub trait LowessAdapter<T: Float> {
    /// The specialized builder type.
    type Output;

    /// Convert a generic [`LowessBuilder`] into a specialized builder.
    fn convert(builder: LowessBuilder<T>) -> Self::Output;
}

/// Forward the shared local regression setters to the wrapped base builder.
macro_rules! forward_lowess_setters {
    () => {
        /// Set the bandwidth fraction.
        pub fn fraction(mut self, fraction: f64) -> Self {
            self.base = self.base.fraction(fraction);
            self
        }

        /// Center the local regressions on explicit locations.
        pub fn anchors(mut self, anchors: Vec<T>) -> Self {
            self.base = self.base.anchors(anchors);
            self
        }

        /// Center the local regressions on evenly spaced locations.
        pub fn num_fits(mut self, num_fits: usize) -> Self {
            self.base = self.base.num_fits(num_fits);
            self
        }

        /// Set the number of fit passes.
        pub fn robust_iters(mut self, iterations: usize) -> Self {
            self.base = self.base.robust_iters(iterations);
            self
        }

        /// Set the residual clip bound.
        pub fn max_std_dev(mut self, max_std_dev: T) -> Self {
            self.base = self.base.max_std_dev(max_std_dev);
            self
        }

        /// Set parallel execution mode.
        pub fn parallel(mut self, parallel: bool) -> Self {
            self.base = self.base.parallel(parallel);
            self
        }
    };
}

/// Record a duplicate on a specialized builder's own parameter.
fn mark_duplicate<V>(slot: &Option<V>, name: &'static str, duplicate: &mut Option<&'static str>) {
    if slot.is_some() {
        *duplicate = Some(name);
    }
}

// ============================================================================
// Smooth Dates
// ============================================================================

/// Marker for the time-adaptive ensemble.
#[derive(Debug, Clone, Copy)]
pub struct SmoothDates;

impl SmoothDates {
    /// Start a time-adaptive ensemble builder.
    #[allow(clippy::new_ret_no_self)]
    pub fn new<T: Float>() -> SmoothDatesBuilder<T> {
        LowessBuilder::new().adapter(SmoothDates)
    }
}

impl<T: Float> LowessAdapter<T> for SmoothDates {
    type Output = SmoothDatesBuilder<T>;

    fn convert(builder: LowessBuilder<T>) -> Self::Output {
        SmoothDatesBuilder {
            base: builder,
            threshold: None,
        }
    }
}

/// Builder for the time-adaptive ensemble.
#[derive(Debug, Clone)]
pub struct SmoothDatesBuilder<T> {
    base: LowessBuilder<T>,
    threshold: Option<DateThreshold>,
}

impl<T: Float> SmoothDatesBuilder<T> {
    forward_lowess_setters!();

    /// Set the temporal bandwidth (default 52 weeks).
    pub fn threshold(mut self, value: f64, unit: DateUnit) -> Self {
        mark_duplicate(&self.threshold, "threshold", &mut self.base.duplicate_param);
        self.threshold = Some(DateThreshold::new(value, unit));
        self
    }

    fn to_config(&self) -> Result<SmoothDatesConfig<T>, LowessError> {
        let config = SmoothDatesConfig {
            lowess: self.base.validated_config(DEFAULT_DATES_FRACTION)?,
            threshold: self.threshold.unwrap_or_default(),
            backend: self.base.backend(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build the model.
    pub fn build(self) -> Result<SmoothDatesModel<T>, LowessError> {
        Ok(SmoothDatesModel {
            config: self.to_config()?,
        })
    }
}

/// Configured time-adaptive ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothDatesModel<T> {
    config: SmoothDatesConfig<T>,
}

impl<T: WLSSolver> SmoothDatesModel<T> {
    /// Ensemble configuration.
    pub fn config(&self) -> &SmoothDatesConfig<T> {
        &self.config
    }

    /// Fit one member per regression date (every sample date when absent).
    pub fn fit<X, Y>(
        &self,
        x: &X,
        y: &Y,
        dt_idx: &[DateTime<Utc>],
        reg_dates: Option<&[DateTime<Utc>]>,
    ) -> Result<FittedSmoothDates<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
    {
        fit_smooth_dates(
            &self.config,
            x.as_lowess_slice()?,
            y.as_lowess_slice()?,
            dt_idx,
            reg_dates,
        )
    }
}

// ============================================================================
// Lowess Dates
// ============================================================================

/// Marker for point predictions on the time-adaptive surface.
#[derive(Debug, Clone, Copy)]
pub struct LowessDates;

impl LowessDates {
    /// Start a point-prediction builder.
    #[allow(clippy::new_ret_no_self)]
    pub fn new<T: Float>() -> LowessDatesBuilder<T> {
        LowessBuilder::new().adapter(LowessDates)
    }
}

impl<T: Float> LowessAdapter<T> for LowessDates {
    type Output = LowessDatesBuilder<T>;

    fn convert(builder: LowessBuilder<T>) -> Self::Output {
        LowessDatesBuilder {
            base: builder,
            threshold: None,
            pred_reg_dates: None,
            rounding_dec: None,
        }
    }
}

/// Builder for point predictions on the time-adaptive surface.
#[derive(Debug, Clone)]
pub struct LowessDatesBuilder<T> {
    base: LowessBuilder<T>,
    threshold: Option<DateThreshold>,
    pred_reg_dates: Option<Vec<DateTime<Utc>>>,
    rounding_dec: Option<u32>,
}

impl<T: Float> LowessDatesBuilder<T> {
    forward_lowess_setters!();

    /// Set the temporal bandwidth (default 52 weeks).
    pub fn threshold(mut self, value: f64, unit: DateUnit) -> Self {
        mark_duplicate(&self.threshold, "threshold", &mut self.base.duplicate_param);
        self.threshold = Some(DateThreshold::new(value, unit));
        self
    }

    /// Dates of the evaluation grid (defaults to the fitted regression dates).
    pub fn pred_reg_dates(mut self, dates: Vec<DateTime<Utc>>) -> Self {
        mark_duplicate(&self.pred_reg_dates, "pred_reg_dates", &mut self.base.duplicate_param);
        self.pred_reg_dates = Some(dates);
        self
    }

    /// Decimals of the x grid (default 1).
    pub fn rounding_dec(mut self, decimals: u32) -> Self {
        mark_duplicate(&self.rounding_dec, "rounding_dec", &mut self.base.duplicate_param);
        self.rounding_dec = Some(decimals);
        self
    }

    /// Build the model.
    pub fn build(self) -> Result<LowessDatesModel<T>, LowessError> {
        let config = LowessDatesConfig {
            smooth: SmoothDatesConfig {
                lowess: self.base.validated_config(DEFAULT_DATES_FRACTION)?,
                threshold: self.threshold.unwrap_or_default(),
                backend: self.base.backend(),
            },
            pred_reg_dates: self.pred_reg_dates,
            rounding_dec: self.rounding_dec.unwrap_or(DEFAULT_ROUNDING_DEC),
        };
        config.validate()?;
        Ok(LowessDatesModel { config })
    }
}

/// Configured point-prediction model.
#[derive(Debug, Clone, PartialEq)]
pub struct LowessDatesModel<T> {
    config: LowessDatesConfig<T>,
}

impl<T: WLSSolver> LowessDatesModel<T> {
    /// Model configuration.
    pub fn config(&self) -> &LowessDatesConfig<T> {
        &self.config
    }

    /// Fit the backing ensemble.
    pub fn fit<X, Y>(
        &self,
        x: &X,
        y: &Y,
        dt_idx: &[DateTime<Utc>],
        reg_dates: Option<&[DateTime<Utc>]>,
    ) -> Result<FittedLowessDates<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
    {
        fit_lowess_dates(
            &self.config,
            x.as_lowess_slice()?,
            y.as_lowess_slice()?,
            dt_idx,
            reg_dates,
        )
    }
}

// ============================================================================
// Bootstrap
// ============================================================================

/// Marker for bootstrap experiments.
#[derive(Debug, Clone, Copy)]
pub struct Bootstrap;

impl Bootstrap {
    /// Start a bootstrap builder.
    #[allow(clippy::new_ret_no_self)]
    pub fn new<T: Float>() -> BootstrapBuilder<T> {
        LowessBuilder::new().adapter(Bootstrap)
    }
}

impl<T: Float> LowessAdapter<T> for Bootstrap {
    type Output = BootstrapBuilder<T>;

    fn convert(builder: LowessBuilder<T>) -> Self::Output {
        BootstrapBuilder {
            base: builder,
            bag_size: None,
            num_runs: None,
            seed: None,
        }
    }
}

/// Builder for bootstrap experiments.
#[derive(Debug, Clone)]
pub struct BootstrapBuilder<T> {
    base: LowessBuilder<T>,
    bag_size: Option<BagSize>,
    num_runs: Option<usize>,
    seed: Option<u64>,
}

impl<T: Float> BootstrapBuilder<T> {
    forward_lowess_setters!();

    /// Set the in-bag sample size (default half the data).
    pub fn bag_size(mut self, bag_size: BagSize) -> Self {
        mark_duplicate(&self.bag_size, "bag_size", &mut self.base.duplicate_param);
        self.bag_size = Some(bag_size);
        self
    }

    /// Set the number of runs (default 1000).
    pub fn num_runs(mut self, runs: usize) -> Self {
        mark_duplicate(&self.num_runs, "num_runs", &mut self.base.duplicate_param);
        self.num_runs = Some(runs);
        self
    }

    /// Set the base seed for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        mark_duplicate(&self.seed, "seed", &mut self.base.duplicate_param);
        self.seed = Some(seed);
        self
    }

    /// Build the experiment.
    pub fn build(self) -> Result<BootstrapModel<T>, LowessError> {
        let config = BootstrapConfig {
            lowess: self.base.validated_config(DEFAULT_FRACTION)?,
            bag_size: self.bag_size.unwrap_or_default(),
            num_runs: self.num_runs.unwrap_or(DEFAULT_NUM_RUNS),
            seed: self.seed,
            backend: self.base.backend(),
        };
        config.validate()?;
        Ok(BootstrapModel { config })
    }
}

/// Configured bootstrap experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapModel<T> {
    config: BootstrapConfig<T>,
}

impl<T: WLSSolver> BootstrapModel<T> {
    /// Experiment configuration.
    pub fn config(&self) -> &BootstrapConfig<T> {
        &self.config
    }

    /// Refit on every bootstrap sample and predict at `x_pred`.
    pub fn run<X, Y, P>(&self, x: &X, y: &Y, x_pred: &P) -> Result<BootstrapPredictions<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
        P: LowessInput<T> + ?Sized,
    {
        run_bootstrap(
            &self.config,
            x.as_lowess_slice()?,
            y.as_lowess_slice()?,
            x_pred.as_lowess_slice()?,
        )
    }

    /// Run the bootstrap and reduce it to a confidence band (default level 0.95).
    pub fn confidence_interval<X, Y, P>(
        &self,
        x: &X,
        y: &Y,
        x_pred: &P,
        level: Option<f64>,
    ) -> Result<ConfidenceInterval<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
        P: LowessInput<T> + ?Sized,
    {
        let level = level.unwrap_or(DEFAULT_CONFIDENCE_LEVEL);
        Validator::validate_interval_level(level)?;
        self.run(x, y, x_pred)?.confidence_interval(level)
    }

    /// Residual spread in and out of one bootstrap sample.
    pub fn residual_std_devs<X, Y>(&self, x: &X, y: &Y) -> Result<ResidualStdDevs<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
    {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        bootstrap_residual_std_devs(
            &self.config.lowess,
            x.as_lowess_slice()?,
            y.as_lowess_slice()?,
            self.config.bag_size,
            &mut rng,
        )
    }
}

// ============================================================================
// Quantile Curves
// ============================================================================

/// Marker for quantile curves.
#[derive(Debug, Clone, Copy)]
pub struct QuantileModel;

impl QuantileModel {
    /// Start a quantile-curve builder.
    #[allow(clippy::new_ret_no_self)]
    pub fn new<T: Float>() -> QuantileBuilder<T> {
        LowessBuilder::new().adapter(QuantileModel)
    }
}

impl<T: Float> LowessAdapter<T> for QuantileModel {
    type Output = QuantileBuilder<T>;

    fn convert(builder: LowessBuilder<T>) -> Self::Output {
        QuantileBuilder {
            base: builder,
            quantiles: None,
            max_iters: None,
        }
    }
}

/// Builder for quantile curves.
#[derive(Debug, Clone)]
pub struct QuantileBuilder<T> {
    base: LowessBuilder<T>,
    quantiles: Option<Vec<f64>>,
    max_iters: Option<u64>,
}

impl<T: Float> QuantileBuilder<T> {
    forward_lowess_setters!();

    /// Quantiles to fit (default 0.1, 0.2, ..., 0.9).
    pub fn quantiles(mut self, quantiles: Vec<f64>) -> Self {
        mark_duplicate(&self.quantiles, "quantiles", &mut self.base.duplicate_param);
        self.quantiles = Some(quantiles);
        self
    }

    /// Nelder-Mead iteration cap per local regression.
    pub fn max_iters(mut self, max_iters: u64) -> Self {
        mark_duplicate(&self.max_iters, "max_iters", &mut self.base.duplicate_param);
        self.max_iters = Some(max_iters);
        self
    }

    /// Build the experiment.
    pub fn build(self) -> Result<QuantileCurvesModel<T>, LowessError> {
        let config = QuantileConfig {
            lowess: self.base.validated_config(DEFAULT_FRACTION)?,
            quantiles: self.quantiles.unwrap_or_else(default_quantiles),
            max_iters: self.max_iters.unwrap_or(DEFAULT_QUANTILE_MAX_ITERS),
        };
        config.validate()?;
        Ok(QuantileCurvesModel { config })
    }
}

/// Configured quantile-curve experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileCurvesModel<T> {
    config: QuantileConfig<T>,
}

impl<T: WLSSolver> QuantileCurvesModel<T> {
    /// Experiment configuration.
    pub fn config(&self) -> &QuantileConfig<T> {
        &self.config
    }

    /// Fit every quantile and predict at `x_pred` (sorted unique `x` when absent).
    pub fn fit_predict<X, Y>(
        &self,
        x: &X,
        y: &Y,
        x_pred: Option<&[T]>,
    ) -> Result<QuantileCurves<T>, LowessError>
    where
        X: LowessInput<T> + ?Sized,
        Y: LowessInput<T> + ?Sized,
    {
        quantile_curves(&self.config, x.as_lowess_slice()?, y.as_lowess_slice()?, x_pred)
    }
}
