//! Anchor (weighting location) resolution.
//!
//! ## Purpose
//!
//! Local regressions are centred on anchors. This module turns the caller's
//! anchor configuration into the concrete list of locations for one fit.
//!
//! ## Key concepts
//!
//! * **Explicit**: Caller-supplied locations, used as given.
//! * **Count**: `num_fits` evenly spaced locations spanning `[min(x), max(x)]`.
//! * **Samples**: One anchor per training sample (the default).
//!
//! ## Invariants
//!
//! * Explicit anchors take precedence over a count.
//! * Resolved anchors are always non-empty and finite.

// External dependencies
use num_traits::Float;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::primitives::errors::LowessError;

// ============================================================================
// Anchor Specification
// ============================================================================

/// How anchor locations are derived for a fit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum AnchorSpec<T> {
    /// Use the training `x` values.
    #[default]
    Samples,

    /// Evenly spaced anchors over the range of `x`.
    Count(usize),

    /// Caller-supplied anchor locations.
    Explicit(Vec<T>),
}

impl<T: Float> AnchorSpec<T> {
    /// Combine optional builder settings, explicit anchors winning over a count.
    pub fn from_parts(anchors: Option<Vec<T>>, num_fits: Option<usize>) -> Self {
        match (anchors, num_fits) {
            (Some(locations), _) => AnchorSpec::Explicit(locations),
            (None, Some(count)) => AnchorSpec::Count(count),
            (None, None) => AnchorSpec::Samples,
        }
    }

    /// Check the anchor settings without reference to data.
    pub fn validate(&self) -> Result<(), LowessError> {
        match self {
            AnchorSpec::Samples => Ok(()),
            AnchorSpec::Count(0) => Err(LowessError::InvalidNumFits(0)),
            AnchorSpec::Count(_) => Ok(()),
            AnchorSpec::Explicit(locations) => {
                if locations.is_empty() {
                    return Err(LowessError::InvalidInput(
                        "explicit anchor list is empty".to_string(),
                    ));
                }
                if let Some(bad) = locations.iter().find(|v| !v.is_finite()) {
                    return Err(LowessError::InvalidNumericValue(format!(
                        "anchor location {:?} is not finite",
                        bad.to_f64()
                    )));
                }
                Ok(())
            }
        }
    }

    /// Resolve to concrete anchor locations for the sample `x`.
    pub fn resolve(&self, x: &[T]) -> Result<Vec<T>, LowessError> {
        self.validate()?;
        match self {
            AnchorSpec::Samples => Ok(x.to_vec()),
            AnchorSpec::Explicit(locations) => Ok(locations.clone()),
            AnchorSpec::Count(count) => {
                let (min, max) = x
                    .iter()
                    .fold(None, |acc: Option<(T, T)>, &v| match acc {
                        None => Some((v, v)),
                        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                    })
                    .ok_or(LowessError::EmptyInput)?;
                Ok(linspace(min, max, *count))
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// `num` evenly spaced values from `start` to `end` inclusive.
///
/// A single value yields `[start]`; the final value is exactly `end`.
pub fn linspace<T: Float>(start: T, end: T, num: usize) -> Vec<T> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = num - 1;
            let steps = T::from(last).unwrap_or_else(T::one);
            let step = (end - start) / steps;
            (0..num)
                .map(|i| {
                    if i == last {
                        end
                    } else {
                        start + step * T::from(i).unwrap_or_else(T::zero)
                    }
                })
                .collect()
        }
    }
}
