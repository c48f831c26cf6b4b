//! Aggregation method dispatch.

use std::fmt;
use std::str::FromStr;

use crate::error::AggregateError;

/// Reduction applied over a set of cell values or a temporal bucket.
///
/// Parsed once from configuration; `" Mean "` and `"mean"` are the same
/// method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Arithmetic mean.
    Mean,
    /// Sum.
    Sum,
    /// Maximum.
    Max,
    /// Minimum.
    Min,
    /// Median.
    Median,
}

impl Method {
    /// Every supported method.
    pub const ALL: [Method; 5] = [
        Method::Mean,
        Method::Sum,
        Method::Max,
        Method::Min,
        Method::Median,
    ];

    /// Lowercase name as used in series keys and configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
            Self::Median => "median",
        }
    }

    /// Reduces `values` to a scalar, skipping NaN cells.
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Self::Mean => lisagg_stats::nan_mean(values),
            Self::Sum => lisagg_stats::nan_sum(values),
            Self::Max => lisagg_stats::nan_max(values),
            Self::Min => lisagg_stats::nan_min(values),
            Self::Median => lisagg_stats::nan_median(values),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "median" => Ok(Self::Median),
            _ => Err(AggregateError::UnsupportedMethod {
                name: s.to_string(),
            }),
        }
    }
}
