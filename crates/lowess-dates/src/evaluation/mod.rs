//! Layer 5: Evaluation
//!
//! # Purpose
//!
//! This layer drives repeated LOWESS fits to quantify uncertainty and
//! conditional spread:
//! - Bootstrap resampling and residual spread
//! - Empirical confidence intervals
//! - Quantile curves
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Evaluation ← You are here
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Bootstrap resampling of LOWESS fits.
pub mod bootstrap;

/// Empirical confidence intervals.
pub mod intervals;

/// Quantile curves.
pub mod quantiles;
