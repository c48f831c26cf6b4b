//! Error types for the lisagg-calendar crate.

/// Error type for all fallible operations in the lisagg-calendar crate.
///
/// This enum covers unsupported native timesteps, unknown frequency codes,
/// and date arithmetic that leaves chrono's representable range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a model timestep has no matching frequency code.
    #[error("unsupported timestep: {seconds}s (expected 21600 or 86400)")]
    UnsupportedTimestep {
        /// The timestep in seconds that was provided.
        seconds: u64,
    },

    /// Returned when a frequency code string cannot be parsed.
    #[error("unknown frequency code: {code:?}")]
    UnknownFrequency {
        /// The code that was provided.
        code: String,
    },

    /// Returned when bucket arithmetic overflows the supported date range.
    #[error("date out of range: {detail}")]
    DateOutOfRange {
        /// Description of the computation that overflowed.
        detail: String,
    },
}
