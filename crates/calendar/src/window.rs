//! Resampling windows: which bucket a timestamp falls in and how buckets
//! are labelled.
//!
//! Fixed-length frequencies (6H, D) are left-labelled and left-closed: the
//! label is the bucket start and the bucket is `[label, label + length)`,
//! measured from midnight of the timestamp's day.
//!
//! Calendar-bound frequencies (M, Q, Y) are right-labelled and right-closed:
//! the label is midnight of the period's last day and the bucket holds every
//! instant of the calendar period, the label itself included.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::CalendarError;
use crate::frequency::Frequency;

/// Returns the label of the bucket containing `t` at frequency `freq`.
///
/// # Errors
///
/// Returns [`CalendarError::DateOutOfRange`] if the period end cannot be
/// represented.
pub fn bucket_label(t: NaiveDateTime, freq: Frequency) -> Result<NaiveDateTime, CalendarError> {
    match freq.fixed_length() {
        Some(length) => Ok(floor_from_midnight(t, length)),
        None => {
            let date = t.date();
            let end_month = match freq {
                Frequency::Monthly => date.month(),
                Frequency::Quarterly => date.month().div_ceil(3) * 3,
                _ => 12,
            };
            Ok(month_end(date.year(), end_month)?.and_time(NaiveTime::MIN))
        }
    }
}

/// Returns the label of the bucket following the one labelled `label`.
///
/// # Errors
///
/// Returns [`CalendarError::DateOutOfRange`] on overflow.
pub fn next_label(label: NaiveDateTime, freq: Frequency) -> Result<NaiveDateTime, CalendarError> {
    let step_months = match freq.fixed_length() {
        Some(length) => {
            return label
                .checked_add_signed(length)
                .ok_or_else(|| CalendarError::DateOutOfRange {
                    detail: format!("{label} + {freq}"),
                });
        }
        None => match freq {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            _ => 12,
        },
    };

    let date = label.date();
    let months = date.year() * 12 + date.month0() as i32 + step_months;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    Ok(month_end(year, month)?.and_time(NaiveTime::MIN))
}

/// Last calendar day of `year`-`month`.
///
/// # Errors
///
/// Returns [`CalendarError::DateOutOfRange`] if the date is not representable.
pub fn month_end(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| CalendarError::DateOutOfRange {
            detail: format!("month end of {year}-{month:02}"),
        })
}

fn floor_from_midnight(t: NaiveDateTime, length: TimeDelta) -> NaiveDateTime {
    let midnight = t.date().and_time(NaiveTime::MIN);
    let elapsed = (t - midnight).num_seconds();
    let step = length.num_seconds();
    midnight + TimeDelta::seconds(elapsed / step * step)
}
