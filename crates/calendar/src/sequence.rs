//! Contiguous bucket label sequences.

use chrono::NaiveDateTime;

use crate::error::CalendarError;
use crate::frequency::Frequency;
use crate::window::next_label;

/// Generates every bucket label from `first` to `last` inclusive.
///
/// Both ends must already be labels at `freq` (see
/// [`bucket_label`](crate::bucket_label)). Returns an empty vector when
/// `last < first`.
///
/// # Errors
///
/// Returns [`CalendarError::DateOutOfRange`] if stepping overflows.
///
/// # Example
///
/// ```ignore
/// let labels = label_sequence(jan_31, mar_31, Frequency::Monthly)?;
/// // Jan 31, Feb 28, Mar 31
/// ```
pub fn label_sequence(
    first: NaiveDateTime,
    last: NaiveDateTime,
    freq: Frequency,
) -> Result<Vec<NaiveDateTime>, CalendarError> {
    let mut labels = Vec::new();
    let mut current = first;
    while current <= last {
        labels.push(current);
        current = next_label(current, freq)?;
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_when_reversed() {
        let labels = label_sequence(day(2023, 2, 1), day(2023, 1, 1), Frequency::Daily).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn single() {
        let labels = label_sequence(day(2023, 1, 1), day(2023, 1, 1), Frequency::Daily).unwrap();
        assert_eq!(labels, vec![day(2023, 1, 1)]);
    }

    #[test]
    fn monthly_across_year() {
        let labels =
            label_sequence(day(2023, 11, 30), day(2024, 2, 29), Frequency::Monthly).unwrap();
        assert_eq!(
            labels,
            vec![
                day(2023, 11, 30),
                day(2023, 12, 31),
                day(2024, 1, 31),
                day(2024, 2, 29),
            ]
        );
    }

    #[test]
    fn six_hourly_day() {
        let labels = label_sequence(
            day(2023, 1, 1),
            day(2023, 1, 1) + chrono::TimeDelta::hours(18),
            Frequency::SixHourly,
        )
        .unwrap();
        assert_eq!(labels.len(), 4);
    }
}
