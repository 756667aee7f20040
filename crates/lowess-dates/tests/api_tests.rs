//! Tests for the high-level fluent API.
//!
//! These tests verify the user-facing builders:
//! - Defaults and resolved engine configurations
//! - Validation at `build()` and duplicate parameter detection
//! - Specialized builders reached by marker `new()` and by `.adapter(..)`
//! - End-to-end fits through the prelude
//!
//! ## Test Organization
//!
//! 1. **Base Builder** - Defaults, setters, validation, duplicates
//! 2. **Plain Model** - Fit, weighted fit, ndarray inputs, fit_predict
//! 3. **Smooth Dates** - Ensemble builder and surface
//! 4. **Lowess Dates** - Point-prediction builder
//! 5. **Bootstrap** - Seeded bands and residual spread
//! 6. **Quantile Curves** - Curve builder

use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use ndarray::{s, Array1};

use lowess_dates::internals::primitives::anchors::AnchorSpec;
use lowess_dates::internals::primitives::backend::Backend;
use lowess_dates::prelude::*;

fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap() + Duration::days(offset)
}

/// 120 daily samples whose level rises by 1 every 10 days.
fn drifting_data() -> (Vec<f64>, Vec<f64>, Vec<DateTime<Utc>>) {
    let x: Vec<f64> = (0..120).map(|i| (i % 10) as f64).collect();
    let y = x
        .iter()
        .enumerate()
        .map(|(i, v)| v + i as f64 / 10.0)
        .collect();
    let dates = (0..120).map(day).collect();
    (x, y, dates)
}

// ============================================================================
// Base Builder Tests
// ============================================================================

/// Test unset parameters resolve to the documented defaults.
#[test]
fn test_builder_defaults() {
    let model = Lowess::<f64>::new().build().unwrap();
    let config = model.config();

    assert_relative_eq!(config.fraction, 0.4);
    assert_eq!(config.anchors, AnchorSpec::Samples);
    assert_eq!(config.robust_iters, 3);
    assert_relative_eq!(config.max_std_dev, 6.0);
    assert_eq!(config.method, RegressionMethod::Linear);
    assert_eq!(config.backend, Backend::CPU);
}

/// Test setters land in the resolved configuration.
#[test]
fn test_builder_setters() {
    let model = Lowess::<f64>::new()
        .fraction(0.25)
        .num_fits(7)
        .robust_iters(2)
        .max_std_dev(4.0)
        .quantile(0.3)
        .parallel(false)
        .build()
        .unwrap();
    let config = model.config();

    assert_relative_eq!(config.fraction, 0.25);
    assert_eq!(config.anchors, AnchorSpec::Count(7));
    assert_eq!(config.robust_iters, 2);
    assert_relative_eq!(config.max_std_dev, 4.0);
    assert_eq!(config.method, RegressionMethod::quantile(0.3));
    assert_eq!(config.backend, Backend::Sequential);

    let explicit = Lowess::<f64>::new()
        .num_fits(3)
        .anchors(vec![1.0, 2.0])
        .build()
        .unwrap();
    assert_eq!(explicit.config().anchors, AnchorSpec::Explicit(vec![1.0, 2.0]));
}

/// Test invalid parameters are rejected by `build()`.
#[test]
fn test_builder_validation() {
    assert_eq!(
        Lowess::<f64>::new().fraction(0.0).build().unwrap_err(),
        LowessError::InvalidFraction(0.0)
    );
    assert_eq!(
        Lowess::<f64>::new().robust_iters(0).build().unwrap_err(),
        LowessError::InvalidIterations(0)
    );
    assert_eq!(
        Lowess::<f64>::new().num_fits(0).build().unwrap_err(),
        LowessError::InvalidNumFits(0)
    );
    assert_eq!(
        Lowess::<f64>::new().quantile(1.0).build().unwrap_err(),
        LowessError::InvalidQuantile(1.0)
    );
}

/// Test setting a parameter twice is an error.
#[test]
fn test_duplicate_parameters() {
    assert_eq!(
        Lowess::<f64>::new()
            .fraction(0.3)
            .fraction(0.5)
            .build()
            .unwrap_err(),
        LowessError::DuplicateParameter {
            parameter: "fraction"
        }
    );
    assert_eq!(
        Lowess::<f64>::new()
            .method(RegressionMethod::Linear)
            .quantile(0.5)
            .build()
            .unwrap_err(),
        LowessError::DuplicateParameter { parameter: "method" }
    );
    assert_eq!(
        SmoothDates::new::<f64>()
            .threshold(4.0, DateUnit::Weeks)
            .threshold(5.0, DateUnit::Weeks)
            .build()
            .unwrap_err(),
        LowessError::DuplicateParameter {
            parameter: "threshold"
        }
    );
    assert_eq!(
        Bootstrap::new::<f64>()
            .robust_iters(1)
            .robust_iters(2)
            .build()
            .unwrap_err(),
        LowessError::DuplicateParameter {
            parameter: "robust_iters"
        }
    );
}

// ============================================================================
// Plain Model Tests
// ============================================================================

/// Test a straight line passes through the plain model unchanged.
#[test]
fn test_plain_fit_predict() {
    let x: Vec<f64> = (0..30).map(f64::from).collect();
    let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 2.0).collect();
    let model = Lowess::new().fraction(0.5).robust_iters(1).build().unwrap();

    let smoothed = model.fit_predict(&x, &y, None).unwrap();
    assert_eq!(smoothed.len(), 30);
    for (s, t) in smoothed.iter().zip(&y) {
        assert_relative_eq!(*s, *t, epsilon = 1e-8);
    }

    let between = model.fit_predict(&x, &y, Some(&[2.5, 10.25][..])).unwrap();
    assert_relative_eq!(between[0], 5.5, epsilon = 1e-8);
    assert_relative_eq!(between[1], 28.75, epsilon = 1e-8);
}

/// Test external weights reach the engine.
#[test]
fn test_plain_fit_weighted() {
    let x: Vec<f64> = (0..20).map(f64::from).collect();
    let y: Vec<f64> = x.iter().map(|v| v + 1.0).collect();
    let model = Lowess::new().fraction(0.6).robust_iters(1).build().unwrap();

    let fitted = model.fit_weighted(&x, &y, Some(&vec![1.0; 20][..]), None).unwrap();
    assert_eq!(fitted.anchors().len(), 20);
    assert_eq!(
        model.fit_weighted(&x, &y, Some(&[1.0; 3][..]), None).unwrap_err(),
        LowessError::MismatchedLength {
            name: "external_weights",
            expected: 20,
            got: 3
        }
    );
}

/// Test ndarray inputs fit like slices and strided views are rejected.
#[test]
fn test_plain_fit_ndarray() {
    let x: Vec<f64> = (0..20).map(f64::from).collect();
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
    let model = Lowess::new().fraction(0.5).robust_iters(1).build().unwrap();

    let from_slices = model.fit(&x, &y).unwrap();
    let from_arrays = model
        .fit(&Array1::from(x.clone()), &Array1::from(y.clone()))
        .unwrap();
    assert_eq!(from_slices, from_arrays);

    let wide = Array1::from((0..40).map(f64::from).collect::<Vec<_>>());
    let strided = wide.slice(s![..;2]);
    assert!(matches!(
        model.fit(&strided, &y),
        Err(LowessError::InvalidInput(_))
    ));
}

// ============================================================================
// Smooth Dates Tests
// ============================================================================

/// Test the ensemble builder defaults and both ways of reaching it.
#[test]
fn test_smooth_dates_builder() {
    let by_marker = SmoothDates::new::<f64>().build().unwrap();
    assert_relative_eq!(by_marker.config().lowess.fraction, 0.3);
    assert_eq!(by_marker.config().threshold, DateThreshold::default());

    let by_adapter = Lowess::<f64>::new()
        .fraction(0.6)
        .adapter(Adapter::SmoothDates)
        .threshold(30.0, DateUnit::Days)
        .build()
        .unwrap();
    assert_relative_eq!(by_adapter.config().lowess.fraction, 0.6);
    assert_eq!(
        by_adapter.config().threshold,
        DateThreshold::new(30.0, DateUnit::Days)
    );

    assert_eq!(
        SmoothDates::new::<f64>()
            .threshold(-1.0, DateUnit::Days)
            .build()
            .unwrap_err(),
        LowessError::InvalidThreshold(-1.0)
    );
}

/// Test an ensemble fit through the builder yields a `dates × x` surface.
#[test]
fn test_smooth_dates_fit() {
    let (x, y, dates) = drifting_data();
    let model = SmoothDates::new()
        .fraction(0.6)
        .robust_iters(1)
        .threshold(30.0, DateUnit::Days)
        .build()
        .unwrap();

    let reg_dates = date_range(day(0), day(119), Duration::days(30)).unwrap();
    let fitted = model.fit(&x, &y, &dates, Some(&reg_dates[..])).unwrap();
    assert_eq!(fitted.members().len(), 4);

    let surface = fitted.predict(&[2.0, 7.0], None).unwrap();
    assert_eq!(surface.values().dim(), (4, 2));
    let first = surface.value_at(0, 0).unwrap();
    let last = surface.value_at(3, 0).unwrap();
    assert!(last > first, "surface does not rise: {first} -> {last}");
}

// ============================================================================
// Lowess Dates Tests
// ============================================================================

/// Test the point-prediction builder and its validation.
#[test]
fn test_lowess_dates_builder() {
    let model = LowessDates::new::<f64>().build().unwrap();
    assert_eq!(model.config().rounding_dec, 1);
    assert!(model.config().pred_reg_dates.is_none());

    assert!(LowessDates::new::<f64>().rounding_dec(12).build().is_err());
    assert_eq!(
        LowessDates::new::<f64>()
            .rounding_dec(1)
            .rounding_dec(2)
            .build()
            .unwrap_err(),
        LowessError::DuplicateParameter {
            parameter: "rounding_dec"
        }
    );
}

/// Test point predictions use the configured evaluation dates.
#[test]
fn test_lowess_dates_fit_predict() {
    let (x, y, dates) = drifting_data();
    let pred_dates = vec![day(10), day(60), day(110)];
    let model = Lowess::<f64>::new()
        .fraction(0.6)
        .robust_iters(1)
        .parallel(false)
        .adapter(Adapter::LowessDates)
        .threshold(30.0, DateUnit::Days)
        .pred_reg_dates(pred_dates.clone())
        .build()
        .unwrap();

    let fitted = model.fit(&x, &y, &dates, None).unwrap();
    assert_eq!(fitted.pred_reg_dates(), pred_dates.as_slice());
    assert_eq!(fitted.ensemble().members().len(), 120);

    let preds = fitted.predict(&[5.0, 5.0], &[day(10), day(110)]).unwrap();
    assert!(preds[1] > preds[0] + 5.0, "{preds:?}");
}

// ============================================================================
// Bootstrap Tests
// ============================================================================

/// Test bootstrap defaults and a seeded constant-signal band.
#[test]
fn test_bootstrap_builder() {
    let defaults = Bootstrap::new::<f64>().build().unwrap();
    assert_eq!(defaults.config().num_runs, 1000);
    assert_eq!(defaults.config().bag_size, BagSize::Fraction(0.5));
    assert!(defaults.config().seed.is_none());

    let x: Vec<f64> = (0..25).map(f64::from).collect();
    let y = vec![5.0; 25];
    let model = Lowess::<f64>::new()
        .fraction(0.9)
        .robust_iters(1)
        .adapter(Adapter::Bootstrap)
        .bag_size(BagSize::Fraction(0.8))
        .num_runs(20)
        .seed(17)
        .build()
        .unwrap();

    let ci = model.confidence_interval(&x, &y, &[3.0, 12.0], None).unwrap();
    for (lo, hi) in ci.lower.iter().zip(&ci.upper) {
        assert_relative_eq!(*lo, 5.0, epsilon = 1e-9);
        assert_relative_eq!(*hi, 5.0, epsilon = 1e-9);
    }
    assert_eq!(
        model
            .confidence_interval(&x, &y, &[3.0], Some(1.5))
            .unwrap_err(),
        LowessError::InvalidIntervals(1.5)
    );

    let spread = model.residual_std_devs(&x, &y).unwrap();
    assert_relative_eq!(spread.in_bag, 0.0, epsilon = 1e-9);
    assert_eq!(model.run(&x, &y, &[3.0]).unwrap().num_runs(), 20);
}

// ============================================================================
// Quantile Curve Tests
// ============================================================================

/// Test the curve builder defaults and ordered curves.
#[test]
fn test_quantile_builder() {
    let defaults = QuantileModel::new::<f64>().build().unwrap();
    assert_eq!(defaults.config().quantiles.len(), 9);

    let x: Vec<f64> = (0..60).map(|i| (i / 2) as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, v)| v + if i % 2 == 0 { 10.0 } else { -10.0 })
        .collect();

    let model = Lowess::<f64>::new()
        .fraction(0.5)
        .robust_iters(1)
        .adapter(Adapter::QuantileModel)
        .quantiles(vec![0.1, 0.9])
        .build()
        .unwrap();
    let curves = model.fit_predict(&x, &y, None).unwrap();

    assert_eq!(curves.values().dim(), (30, 2));
    let low = curves.curve(0).unwrap();
    let high = curves.curve(1).unwrap();
    assert!(low.iter().zip(high.iter()).all(|(l, h)| h >= l));

    assert_eq!(
        QuantileModel::new::<f64>()
            .quantiles(vec![0.0])
            .build()
            .unwrap_err(),
        LowessError::InvalidQuantile(0.0)
    );
}
