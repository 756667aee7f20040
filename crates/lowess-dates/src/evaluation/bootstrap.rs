//! Bootstrap resampling of LOWESS fits.
//!
//! ## Purpose
//!
//! This module draws in-bag/out-of-bag samples, refits a LOWESS model on each
//! in-bag sample and collects the predictions, giving an empirical
//! distribution of the smoothed curve.
//!
//! ## Design notes
//!
//! * **Reproducible**: Run `i` uses its own `StdRng` seeded from
//!   `base_seed + i`, so results do not depend on scheduling.
//! * **Parallel runs**: Runs are independent and go through [`Backend`];
//!   the inner fits then run sequentially.
//!
//! ## Key concepts
//!
//! * **Bag size**: A fraction of `n` in (0, 1] (resolved as `ceil(f·n)`) or a
//!   positive integer count.
//! * **In-bag**: Indices drawn with replacement, sorted.
//! * **Out-of-bag**: Indices never drawn.
//!
//! ## Invariants
//!
//! * `in_bag.len()` equals the resolved bag size.
//! * `in_bag ∪ out_of_bag` covers `0..n` as sets and the two never intersect.

// External dependencies
use ndarray::{Array2, ArrayView1, Axis};
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

// Internal dependencies
use crate::algorithms::regression::WLSSolver;
use crate::engine::executor::{LowessConfig, LowessExecutor, SampleWeights};
use crate::engine::output::FittedLowess;
use crate::engine::validator::Validator;
use crate::evaluation::intervals::ConfidenceInterval;
use crate::math::stats::population_std_dev;
use crate::primitives::backend::Backend;
use crate::primitives::errors::LowessError;

/// Default number of bootstrap runs.
pub const DEFAULT_NUM_RUNS: usize = 1000;

/// Smallest bag a bootstrap fit accepts.
pub const MIN_BAG_DRAWS: usize = 2;

// ============================================================================
// Bag Size
// ============================================================================

/// Size of each bootstrap sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BagSize {
    /// Fraction of the sample count, in (0, 1].
    Fraction(f64),

    /// Absolute number of draws.
    Count(usize),
}

impl Default for BagSize {
    fn default() -> Self {
        BagSize::Fraction(0.5)
    }
}

impl BagSize {
    /// Interpret a plain number: values in (0, 1] are fractions, larger
    /// integral values are counts.
    pub fn from_value(value: f64) -> Result<Self, LowessError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(BagSize::Fraction(value))
        } else if value.is_finite() && value > 1.0 && value.fract() == 0.0 {
            Ok(BagSize::Count(value as usize))
        } else {
            Err(LowessError::InvalidBagSize(value))
        }
    }

    /// Check the bag size without reference to data.
    pub fn validate(&self) -> Result<(), LowessError> {
        match *self {
            BagSize::Fraction(f) if f.is_finite() && f > 0.0 && f <= 1.0 => Ok(()),
            BagSize::Fraction(f) => Err(LowessError::InvalidBagSize(f)),
            BagSize::Count(0) => Err(LowessError::InvalidBagSize(0.0)),
            BagSize::Count(_) => Ok(()),
        }
    }

    /// Number of draws for `n` samples.
    pub fn resolve(&self, n: usize) -> Result<usize, LowessError> {
        self.validate()?;
        Ok(match *self {
            BagSize::Fraction(f) => ((f * n as f64).ceil() as usize).max(1),
            BagSize::Count(c) => c,
        })
    }

    /// The configured number, fraction or count.
    pub fn value(&self) -> f64 {
        match *self {
            BagSize::Fraction(f) => f,
            BagSize::Count(c) => c as f64,
        }
    }

    /// Number of draws for `n` samples, at least the two a local line needs.
    pub fn resolve_for_fit(&self, n: usize) -> Result<usize, LowessError> {
        match self.resolve(n)? {
            draws if draws < MIN_BAG_DRAWS => Err(LowessError::InvalidBagSize(self.value())),
            draws => Ok(draws),
        }
    }
}

// ============================================================================
// Sampling
// ============================================================================

/// One bootstrap draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSample {
    /// Sorted in-bag indices, with repeats.
    pub in_bag: Vec<usize>,

    /// Sorted indices never drawn.
    pub out_of_bag: Vec<usize>,
}

/// Draw in-bag and out-of-bag indices for `n` samples.
pub fn bootstrap_indices<R: Rng + ?Sized>(
    n: usize,
    bag_size: BagSize,
    rng: &mut R,
) -> Result<BootstrapSample, LowessError> {
    if n == 0 {
        return Err(LowessError::EmptyInput);
    }
    let draws = bag_size.resolve(n)?;

    let mut in_bag: Vec<usize> = (0..draws).map(|_| rng.random_range(0..n)).collect();
    in_bag.sort_unstable();

    let mut drawn = vec![false; n];
    for &i in &in_bag {
        drawn[i] = true;
    }
    let out_of_bag = (0..n).filter(|&i| !drawn[i]).collect();

    Ok(BootstrapSample { in_bag, out_of_bag })
}

fn gather<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i]).collect()
}

// ============================================================================
// Bootstrap Runs
// ============================================================================

/// Configuration of a bootstrap experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig<T> {
    /// Model refit on every in-bag sample.
    pub lowess: LowessConfig<T>,

    /// Size of each in-bag sample.
    pub bag_size: BagSize,

    /// Number of runs.
    pub num_runs: usize,

    /// Base seed; a random one is drawn when absent.
    pub seed: Option<u64>,

    /// Backend used across runs.
    pub backend: Backend,
}

impl<T: Float> Default for BootstrapConfig<T> {
    fn default() -> Self {
        Self {
            lowess: LowessConfig::default(),
            bag_size: BagSize::default(),
            num_runs: DEFAULT_NUM_RUNS,
            seed: None,
            backend: Backend::default(),
        }
    }
}

impl<T: Float> BootstrapConfig<T> {
    /// Validate every configuration field.
    pub fn validate(&self) -> Result<(), LowessError> {
        self.lowess.validate()?;
        self.bag_size.validate()?;
        Validator::validate_runs(self.num_runs)
    }
}

/// Predictions from every bootstrap run, `points × runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapPredictions<T> {
    x: Vec<T>,
    values: Array2<T>,
}

impl<T: Float> BootstrapPredictions<T> {
    /// Prediction locations.
    pub fn x(&self) -> &[T] {
        &self.x
    }

    /// Prediction matrix, `points × runs`.
    pub fn values(&self) -> &Array2<T> {
        &self.values
    }

    /// Number of runs.
    pub fn num_runs(&self) -> usize {
        self.values.ncols()
    }

    /// Predictions of one run.
    pub fn run(&self, index: usize) -> Option<ArrayView1<'_, T>> {
        (index < self.values.ncols()).then(|| self.values.column(index))
    }

    /// Empirical confidence band across runs.
    pub fn confidence_interval(&self, level: f64) -> Result<ConfidenceInterval<T>, LowessError> {
        ConfidenceInterval::from_runs(&self.x, &self.values, level)
    }
}

/// Seed for run `run` given a base seed.
#[inline]
pub fn run_seed(base: u64, run: usize) -> u64 {
    base.wrapping_add(run as u64)
}

/// Refit on `num_runs` bootstrap samples and predict at `x_pred`.
pub fn run_bootstrap<T: WLSSolver>(
    config: &BootstrapConfig<T>,
    x: &[T],
    y: &[T],
    x_pred: &[T],
) -> Result<BootstrapPredictions<T>, LowessError> {
    config.validate()?;
    Validator::validate_inputs(x, y)?;
    Validator::validate_prediction_points(x_pred)?;
    config.bag_size.resolve_for_fit(x.len())?;

    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random::<u64>());
    let mut inner = config.lowess.clone();
    if config.backend.is_parallel() {
        inner.backend = Backend::Sequential;
    }

    debug!(
        runs = config.num_runs,
        samples = x.len(),
        points = x_pred.len(),
        seed = base_seed,
        "running bootstrap"
    );

    let columns = config.backend.try_map_indexed(config.num_runs, |run| {
        let mut rng = StdRng::seed_from_u64(run_seed(base_seed, run));
        let sample = bootstrap_indices(x.len(), config.bag_size, &mut rng)?;
        let fitted = LowessExecutor::fit(
            &inner,
            &gather(x, &sample.in_bag),
            &gather(y, &sample.in_bag),
            SampleWeights::default(),
        )?;
        fitted.predict(x_pred)
    })?;

    let mut values = Array2::zeros((x_pred.len(), config.num_runs));
    for (mut column, predictions) in values.axis_iter_mut(Axis(1)).zip(columns) {
        for (v, p) in column.iter_mut().zip(predictions) {
            *v = p;
        }
    }

    Ok(BootstrapPredictions {
        x: x_pred.to_vec(),
        values,
    })
}

// ============================================================================
// Residual Spread
// ============================================================================

/// Spread of absolute residuals inside and outside one bootstrap sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualStdDevs<T> {
    /// Population std. dev. of `|residual|` on the in-bag samples.
    pub in_bag: T,

    /// Same on the out-of-bag samples; `None` when every sample was drawn.
    pub out_of_bag: Option<T>,
}

/// Fit on one in-bag sample and measure residual spread in and out of bag.
pub fn bootstrap_residual_std_devs<T: WLSSolver, R: Rng + ?Sized>(
    config: &LowessConfig<T>,
    x: &[T],
    y: &[T],
    bag_size: BagSize,
    rng: &mut R,
) -> Result<ResidualStdDevs<T>, LowessError> {
    Validator::validate_inputs(x, y)?;
    bag_size.resolve_for_fit(x.len())?;
    let sample = bootstrap_indices(x.len(), bag_size, rng)?;

    let x_in = gather(x, &sample.in_bag);
    let y_in = gather(y, &sample.in_bag);
    let fitted = LowessExecutor::fit(config, &x_in, &y_in, SampleWeights::default())?;

    let abs_residuals = |fitted: &FittedLowess<T>, xs: &[T], ys: &[T]| -> Result<Vec<T>, LowessError> {
        let pred = fitted.predict(xs)?;
        Ok(ys.iter().zip(pred).map(|(&o, p)| (o - p).abs()).collect())
    };

    let in_bag = population_std_dev(&abs_residuals(&fitted, &x_in, &y_in)?).unwrap_or_else(T::zero);
    let out_of_bag = if sample.out_of_bag.is_empty() {
        None
    } else {
        let x_out = gather(x, &sample.out_of_bag);
        let y_out = gather(y, &sample.out_of_bag);
        population_std_dev(&abs_residuals(&fitted, &x_out, &y_out)?)
    };

    Ok(ResidualStdDevs { in_bag, out_of_bag })
}
