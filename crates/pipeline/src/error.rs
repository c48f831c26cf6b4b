//! Error types for the lisagg-pipeline crate.

/// Error type for all fallible operations in the lisagg-pipeline crate.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Returned when configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a variable is listed in more than one class.
    #[error("variable '{variable}' is classified as both {first} and {second}")]
    OverlappingClasses {
        /// The variable name.
        variable: String,
        /// First class it appears in.
        first: &'static str,
        /// Second class it appears in.
        second: &'static str,
    },

    /// Returned when the worker pool cannot be built.
    #[error("worker pool: {reason}")]
    ThreadPool {
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a persisted grid is requested but absent.
    #[error("no {freq} grid for '{name}'")]
    MissingGrid {
        /// Variable name.
        name: String,
        /// Frequency code.
        freq: lisagg_calendar::Frequency,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] lisagg_io::IoError),

    /// Aggregation error.
    #[error(transparent)]
    Aggregate(#[from] lisagg_aggregate::AggregateError),
}
