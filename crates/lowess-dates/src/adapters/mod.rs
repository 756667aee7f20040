//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer adapts the engine to dated data. It builds the time-adaptive
//! ensemble that blends many per-date LOWESS fits into a continuous surface:
//!
//! - **Time weights**: Tricube weighting of dates around a regression date
//! - **Smooth dates**: One member per regression date, blended into a surface
//! - **Lowess dates**: Point predictions looked up on that surface
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Evaluation
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Temporal weighting, date units and date grids.
pub mod time_weights;

/// Labelled `dates × x` surfaces.
pub mod surface;

/// Time-adaptive LOWESS ensemble.
pub mod smooth_dates;

/// Point predictions on the ensemble surface.
pub mod lowess_dates;
