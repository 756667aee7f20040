//! Layer 3: Algorithms
//!
//! This layer implements the local regression solvers and the robustness
//! reweighting. It contains the "business logic" of LOWESS but is
//! orchestrated by the engine layer.

// Local regression solvers (linear and quantile).
pub mod regression;

// Robustness weight updates for outlier downweighting.
pub mod robustness;
