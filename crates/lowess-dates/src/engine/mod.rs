//! Layer 4: Engine
//!
//! # Purpose
//!
//! This layer orchestrates a LOWESS fit by coordinating primitives (anchors,
//! backend), math (weight matrices) and algorithms (solvers, robustness).
//! It provides the robust iteration loop and prediction by blending.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Evaluation
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Fit/predict execution engine.
pub mod executor;

/// Validation utilities.
pub mod validator;

/// Fitted snapshots and result tables.
pub mod output;
