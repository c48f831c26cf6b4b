//! Frequency codes ordered from finest to coarsest.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use crate::error::CalendarError;

/// Temporal resolution of a time axis.
///
/// Variants are declared finest first, so the derived `Ord` ranks
/// `SixHourly < Daily < Monthly < Quarterly < Yearly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Frequency {
    /// Six-hour steps (`6H`).
    SixHourly,
    /// Calendar days (`D`).
    Daily,
    /// Calendar months (`M`).
    Monthly,
    /// Calendar quarters (`Q`).
    Quarterly,
    /// Calendar years (`Y`).
    Yearly,
}

impl Frequency {
    /// The fixed resolution progression walked by the aggregation chain.
    pub const CHAIN: [Frequency; 4] = [
        Frequency::SixHourly,
        Frequency::Daily,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    /// Maps a native model timestep in seconds to its frequency.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::UnsupportedTimestep`] for anything other than
    /// 21600 (six-hourly) or 86400 (daily).
    pub fn from_timestep_seconds(seconds: u64) -> Result<Self, CalendarError> {
        match seconds {
            21_600 => Ok(Self::SixHourly),
            86_400 => Ok(Self::Daily),
            other => Err(CalendarError::UnsupportedTimestep { seconds: other }),
        }
    }

    /// Short code used in series keys (`6H`, `D`, `M`, `Q`, `Y`).
    pub fn code(self) -> &'static str {
        match self {
            Self::SixHourly => "6H",
            Self::Daily => "D",
            Self::Monthly => "M",
            Self::Quarterly => "Q",
            Self::Yearly => "Y",
        }
    }

    /// Directory stem for per-frequency output folders.
    pub fn dir_stem(self) -> &'static str {
        match self {
            Self::SixHourly => "6hourly",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Whether buckets follow calendar periods (right-labelled, right-closed)
    /// rather than fixed lengths (left-labelled, left-closed).
    pub fn is_calendar_bound(self) -> bool {
        matches!(self, Self::Monthly | Self::Quarterly | Self::Yearly)
    }

    /// Bucket length for fixed-length frequencies, `None` for calendar ones.
    pub fn fixed_length(self) -> Option<TimeDelta> {
        match self {
            Self::SixHourly => Some(TimeDelta::hours(6)),
            Self::Daily => Some(TimeDelta::days(1)),
            _ => None,
        }
    }

    /// Next coarser step along [`Frequency::CHAIN`].
    pub fn next_in_chain(self) -> Option<Self> {
        Self::CHAIN.iter().copied().find(|&f| f > self)
    }

    /// All chain frequencies strictly coarser than `self`, finest first.
    pub fn chain_after(self) -> impl Iterator<Item = Frequency> {
        Self::CHAIN.into_iter().filter(move |&f| f > self)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Frequency {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "6H" => Ok(Self::SixHourly),
            "D" => Ok(Self::Daily),
            "M" | "ME" => Ok(Self::Monthly),
            "Q" | "QE" => Ok(Self::Quarterly),
            "Y" | "YE" | "A" => Ok(Self::Yearly),
            _ => Err(CalendarError::UnknownFrequency {
                code: s.to_string(),
            }),
        }
    }
}
