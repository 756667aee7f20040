//! Execution backend for independent units of work.
//!
//! ## Purpose
//!
//! Anchor rows within one fit, bootstrap runs and ensemble members are all
//! independent: each reads shared immutable inputs and writes one output
//! slot. This module provides the single indexed-map primitive every layer
//! uses to run such units, either sequentially or on the rayon pool.
//!
//! ## Design notes
//!
//! * **Feature-gated**: Parallel execution requires the `cpu` feature; without
//!   it the parallel hint is ignored.
//! * **Ordered**: Results are always returned in index order, so parallel and
//!   sequential execution produce identical outputs.
//!
//! ## Invariants
//!
//! * `map_indexed(n, ..)` calls the closure exactly once for every index in `0..n`.
//! * `try_map_indexed` fails if any unit fails; which error wins is unspecified in parallel mode.

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;

/// Execution backend hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Backend {
    /// Run units one after another on the calling thread.
    Sequential,

    /// Run units on the rayon thread pool (requires the `cpu` feature).
    #[default]
    CPU,
}

impl Backend {
    /// Backend matching a builder's `parallel(bool)` hint.
    #[inline]
    pub fn from_parallel(parallel: bool) -> Self {
        if parallel {
            Backend::CPU
        } else {
            Backend::Sequential
        }
    }

    /// Whether this backend actually runs in parallel in the current build.
    #[inline]
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "cpu") && *self == Backend::CPU
    }

    /// Map every index in `0..len` through `f`, preserving order.
    pub fn map_indexed<R, F>(&self, len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Send + Sync,
    {
        #[cfg(feature = "cpu")]
        if self.is_parallel() {
            return (0..len).into_par_iter().map(f).collect();
        }

        (0..len).map(f).collect()
    }

    /// Fallible variant of [`Backend::map_indexed`].
    pub fn try_map_indexed<R, E, F>(&self, len: usize, f: F) -> Result<Vec<R>, E>
    where
        R: Send,
        E: Send,
        F: Fn(usize) -> Result<R, E> + Send + Sync,
    {
        #[cfg(feature = "cpu")]
        if self.is_parallel() {
            return (0..len).into_par_iter().map(f).collect();
        }

        (0..len).map(f).collect()
    }
}
