//! Smoothed surfaces over an x axis and a date axis.
//!
//! ## Purpose
//!
//! [`Surface`] is the labelled `dates × x` matrix produced by the
//! time-adaptive ensemble, with point and curve accessors and a nearest-value
//! lookup used to map observed `(x, date)` pairs onto the surface.
//!
//! ## Invariants
//!
//! * `values.nrows() == dates.len()` and `values.ncols() == x.len()`.

// External dependencies
use chrono::{DateTime, Utc};
use core::cmp::Ordering;
use core::fmt::{self, Display, Formatter};
use ndarray::{Array2, ArrayView1};
use num_traits::Float;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::adapters::time_weights::nearest_date_index;
use crate::engine::output::write_table;

/// Maximum number of date columns printed by `Display`.
const MAX_DISPLAY_DATES: usize = 6;

/// Labelled smoothed surface, `dates × x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface<T> {
    pub(crate) x: Vec<T>,
    pub(crate) dates: Vec<DateTime<Utc>>,
    pub(crate) values: Array2<T>,
}

impl<T: Float> Surface<T> {
    /// x axis.
    pub fn x(&self) -> &[T] {
        &self.x
    }

    /// Date axis.
    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    /// Raw matrix, `dates × x`.
    pub fn values(&self) -> &Array2<T> {
        &self.values
    }

    /// Consume into the raw matrix.
    pub fn into_values(self) -> Array2<T> {
        self.values
    }

    /// Value at `(date_index, x_index)`.
    pub fn value_at(&self, date_index: usize, x_index: usize) -> Option<T> {
        self.values.get([date_index, x_index]).copied()
    }

    /// Curve (over x) for an exact date on the axis.
    pub fn column(&self, date: DateTime<Utc>) -> Option<ArrayView1<'_, T>> {
        let index = self.dates.iter().position(|d| *d == date)?;
        Some(self.values.row(index))
    }

    /// Value at the grid point nearest to `round(x, rounding_dec)` and `date`.
    pub fn lookup(&self, x: T, date: DateTime<Utc>, rounding_dec: u32) -> Option<T> {
        let x_index = nearest_x_index(&self.x, round_to(x, rounding_dec))?;
        let date_index = nearest_date_index(&self.dates, date)?;
        self.value_at(date_index, x_index)
    }
}

/// Round to `decimals` decimal places.
pub fn round_to<T: Float>(value: T, decimals: u32) -> T {
    let scale = T::from(10f64.powi(decimals as i32)).unwrap_or_else(T::one);
    (value * scale).round() / scale
}

fn nearest_x_index<T: Float>(axis: &[T], x: T) -> Option<usize> {
    axis.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (**a - x)
                .abs()
                .partial_cmp(&(**b - x).abs())
                .unwrap_or(Ordering::Equal)
        })
        .map(|(i, _)| i)
}

impl<T: Float + Display> Display for Surface<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  X points:    {}", self.x.len())?;
        writeln!(f, "  Dates:       {}", self.dates.len())?;
        if let (Some(first), Some(last)) = (self.dates.first(), self.dates.last()) {
            writeln!(
                f,
                "  Date range:  {} to {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            )?;
        }
        writeln!(f)?;

        let shown = self.dates.len().min(MAX_DISPLAY_DATES);
        let labels: Vec<String> = self.dates[..shown]
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        let mut headers: Vec<&str> = vec!["X"];
        headers.extend(labels.iter().map(String::as_str));

        writeln!(f, "Surface:")?;
        write_table(f, &headers, self.x.len(), |f, i| {
            write!(f, "{:>8.2}", self.x[i])?;
            for d in 0..shown {
                write!(f, " {:>12.6}", self.values[[d, i]])?;
            }
            Ok(())
        })?;
        if shown < self.dates.len() {
            writeln!(f, "({} more date columns)", self.dates.len() - shown)?;
        }
        Ok(())
    }
}
