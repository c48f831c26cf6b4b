//! Error types for lisagg-aggregate.

/// Error type for all fallible operations in the lisagg-aggregate crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// Returned when an aggregation method name is not one of
    /// mean, sum, max, min, median.
    #[error("unsupported aggregation method: {name:?}")]
    UnsupportedMethod {
        /// The name as it was provided.
        name: String,
    },

    /// Returned when a spatial reduction is requested on a grid without
    /// `lat` and `lon` axes.
    #[error("grid must have 'lat' and 'lon' dimensions, found {found:?}")]
    MissingDimensions {
        /// Dimension names the grid actually carries.
        found: Vec<String>,
    },

    /// Returned when a reduction receives no timesteps.
    #[error("input has no timesteps")]
    EmptyInput,

    /// Returned when array lengths don't match.
    #[error("{field}: expected {expected} elements, got {got}")]
    LengthMismatch {
        /// Name of the mismatched field.
        field: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a time axis is not strictly increasing.
    #[error("time axis not strictly increasing at index {index}")]
    NonMonotonicTime {
        /// Index of the first offending timestamp.
        index: usize,
    },

    /// Returned when two grids that must align spatially do not.
    #[error("spatial shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected `[ny, nx]`.
        expected: [usize; 2],
        /// Actual `[ny, nx]`.
        got: [usize; 2],
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] lisagg_calendar::CalendarError),
}
