//! Input abstractions for LOWESS fitting and prediction.
//!
//! ## Purpose
//!
//! This module provides a unified abstraction for numeric inputs, allowing
//! `fit` and `predict` to accept slices, vectors and `ndarray` arrays through
//! a single interface.
//!
//! ## Design notes
//!
//! * **Zero-copy where possible**: Provides direct slice access to underlying data buffers.
//! * **Fail-fast validation**: Non-contiguous `ndarray` views are rejected instead of copied.
//!
//! ## Invariants
//!
//! * Returned slices represent all elements in the input container, in order.

// External dependencies
use ndarray::{ArrayBase, Data, Ix1};
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::LowessError;

/// Trait for types that can be used as numeric input for LOWESS models.
pub trait LowessInput<T: Float> {
    /// Convert the input to a contiguous slice.
    fn as_lowess_slice(&self) -> Result<&[T], LowessError>;
}

impl<T: Float> LowessInput<T> for [T] {
    fn as_lowess_slice(&self) -> Result<&[T], LowessError> {
        Ok(self)
    }
}

impl<T: Float, const N: usize> LowessInput<T> for [T; N] {
    fn as_lowess_slice(&self) -> Result<&[T], LowessError> {
        Ok(self.as_slice())
    }
}

impl<T: Float> LowessInput<T> for Vec<T> {
    fn as_lowess_slice(&self) -> Result<&[T], LowessError> {
        Ok(self.as_slice())
    }
}

impl<T: Float, S> LowessInput<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn as_lowess_slice(&self) -> Result<&[T], LowessError> {
        self.as_slice().ok_or_else(|| {
            LowessError::InvalidInput("ndarray input must be contiguous in memory".to_string())
        })
    }
}
