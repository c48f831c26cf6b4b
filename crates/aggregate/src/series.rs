//! Keyed 1-D time series.

use chrono::NaiveDateTime;

use crate::error::AggregateError;
use crate::grid::check_times;

/// A named sequence of `(timestamp, value)` pairs with a strictly
/// increasing time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    key: String,
    times: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl Series {
    /// Creates a series, checking lengths and time ordering.
    pub fn new(
        key: impl Into<String>,
        times: Vec<NaiveDateTime>,
        values: Vec<f64>,
    ) -> Result<Self, AggregateError> {
        check_times(&times)?;
        if values.len() != times.len() {
            return Err(AggregateError::LengthMismatch {
                field: "values",
                expected: times.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            key: key.into(),
            times,
            values,
        })
    }

    /// Returns the series under a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Series key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Timestamps.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}
