//! # lowess-dates: robust and time-adaptive LOWESS for Rust
//!
//! Locally weighted scatterplot smoothing built around explicit anchor
//! regressions, with bootstrap confidence bands, quantile curves and a
//! time-adaptive ensemble that produces a smoothed `dates × x` surface.
//!
//! ## What is LOWESS?
//!
//! LOWESS (Locally Weighted Scatterplot Smoothing) is a nonparametric regression
//! method that fits smooth curves through scatter plots. Around each anchor
//! location it fits a weighted straight line using nearby data points, with
//! tricube weights decreasing smoothly with distance, then blends the anchor
//! lines into one curve.
//!
//! ## Quick Start
//!
//! ### Typical Use
//!
//! ```rust
//! use lowess_dates::prelude::*;
//!
//! let x: Vec<f64> = (0..50).map(f64::from).collect();
//! let y: Vec<f64> = x.iter().map(|v| (v / 5.0).sin()).collect();
//!
//! let model = Lowess::new()
//!     .fraction(0.3)      // 30% of the data in each local fit
//!     .robust_iters(1)    // one pass, no robust reweighting
//!     .build()?;
//!
//! let fitted = model.fit(&x, &y)?;
//! let smoothed = fitted.predict(&x)?;
//! assert_eq!(smoothed.len(), x.len());
//! # Result::<(), LowessError>::Ok(())
//! ```
//!
//! ### Time-Adaptive Surface
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use lowess_dates::prelude::*;
//!
//! let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! let dt_idx: Vec<_> = (0..60).map(|i| start + Duration::days(i)).collect();
//! let x: Vec<f64> = (0..60).map(|i| f64::from(i % 20)).collect();
//! let y: Vec<f64> = x.iter().enumerate().map(|(i, v)| 2.0 * v + i as f64 * 0.1).collect();
//!
//! let model = SmoothDates::new()
//!     .fraction(0.5)
//!     .robust_iters(1)
//!     .threshold(30.0, DateUnit::Days)
//!     .build()?;
//!
//! let reg_dates = date_range(start, start + Duration::days(56), Duration::days(14))?;
//! let fitted = model.fit(&x, &y, &dt_idx, Some(&reg_dates[..]))?;
//!
//! let surface = fitted.predict(&[0.0, 5.0, 10.0], None)?;
//! assert_eq!(surface.values().dim(), (reg_dates.len(), 3));
//! println!("{}", surface);
//! # Result::<(), LowessError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! Every fallible call returns `Result<_, LowessError>`. Configuration is
//! validated by `build()`; data is validated by `fit`. Fitting returns an
//! immutable snapshot (`FittedLowess`, `FittedSmoothDates`,
//! `FittedLowessDates`), so predicting before fitting cannot be expressed.
//!
//! ```rust
//! use lowess_dates::prelude::*;
//!
//! let err = Lowess::<f64>::new().fraction(1.5).build().unwrap_err();
//! assert_eq!(err, LowessError::InvalidFraction(1.5));
//! ```
//!
//! ## Parameters
//!
//! | Parameter        | Default          | Applies to                    |
//! |------------------|------------------|-------------------------------|
//! | `fraction`       | 0.4 (0.3 dates)  | all builders                  |
//! | `anchors`        | sample `x`       | all builders                  |
//! | `num_fits`       | unset            | all builders                  |
//! | `robust_iters`   | 3                | all builders                  |
//! | `max_std_dev`    | 6                | all builders                  |
//! | `parallel`       | true             | all builders (`cpu` feature)  |
//! | `threshold`      | 52 W             | `SmoothDates`, `LowessDates`  |
//! | `rounding_dec`   | 1                | `LowessDates`                 |
//! | `bag_size`       | 0.5              | `Bootstrap`                   |
//! | `num_runs`       | 1000             | `Bootstrap`                   |
//! | `quantiles`      | 0.1, ..., 0.9    | `QuantileModel`               |
//!
//! ## Feature Flags
//!
//! * `cpu` (default): runs anchor rows, bootstrap runs and ensemble members
//!   on the rayon thread pool.
//!
//! ## Logging
//!
//! Fits emit `tracing` events (`debug` per fit, `trace` per robust pass,
//! `warn` for locally resolved degeneracies). The crate never installs a
//! subscriber.

// Layer 1: Primitives - errors, inputs, anchors and the execution backend.
mod primitives;

// Layer 2: Math - tricube kernel, distance and weight matrices, statistics.
mod math;

// Layer 3: Algorithms - local regression solvers and robustness weights.
mod algorithms;

// Layer 4: Engine - validation, fit/predict orchestration, fitted models.
mod engine;

// Layer 5: Evaluation - bootstrap, confidence intervals, quantile curves.
mod evaluation;

// Layer 6: Adapters - time-adaptive ensembles.
mod adapters;

// High-level fluent API.
mod api;

// Model-definition records.
mod definitions;

/// Standard LOWESS prelude.
pub mod prelude {
    pub use crate::api::{
        date_range, Adapter, BagSize, Bootstrap, BootstrapBuilder, BootstrapModel,
        BootstrapPredictions, Coefficients, ConfidenceInterval, DateUnit, EnsembleMember,
        FittedLowess, FittedLowessDates, FittedSmoothDates, LowessAdapter,
        LowessBuilder as Lowess, LowessDates, LowessDatesBuilder, LowessDatesModel, LowessError,
        LowessModel, QuantileBuilder, QuantileCurves, QuantileCurvesModel, QuantileModel,
        SmoothDates, SmoothDatesBuilder, SmoothDatesModel, Surface,
    };
    pub use crate::adapters::time_weights::DateThreshold;
    pub use crate::algorithms::regression::RegressionMethod;
    pub use crate::definitions::{
        default_fit_variants, fit_model_definition, FitVariant, ModelDefinition,
    };
}

// Internal modules for testing and benchmarking.
//
// Re-exports every layer so integration tests can exercise them directly.
#[doc(hidden)]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
    pub mod definitions {
        pub use crate::definitions::*;
    }
}
