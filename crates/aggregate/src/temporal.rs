//! Temporal resampling of grids and series.
//!
//! A resample buckets timestamps with [`bucket_label`], reduces each bucket
//! per cell with a [`Method`], and emits one timestep for every label from
//! the first to the last bucket. Buckets with no input carry NaN.
//!
//! If the input is already at the target frequency (by
//! [`infer_frequency`], or for a single step by sitting on its own bucket
//! label) the data passes through unchanged and the result is flagged as
//! not resampled. Six-hourly input asked for six-hourly output
//! has its labels moved back one step, from step end to step start.

use chrono::{NaiveDateTime, TimeDelta};
use lisagg_calendar::{Frequency, bucket_label, infer_frequency, label_sequence};
use tracing::debug;

use crate::error::AggregateError;
use crate::grid::Grid;
use crate::method::Method;
use crate::series::Series;

/// Output of a temporal resample.
#[derive(Debug, Clone, PartialEq)]
pub struct Resampled<T> {
    /// The (possibly unchanged) data.
    pub data: T,
    /// `false` when the input was already at the target frequency.
    pub resampled: bool,
}

struct Buckets {
    times: Vec<NaiveDateTime>,
    values: Vec<f64>,
    resampled: bool,
}

/// Resamples every cell of `grid` to `target`.
///
/// # Errors
///
/// - [`AggregateError::EmptyInput`] if the grid has no timesteps.
/// - [`AggregateError::Calendar`] if a bucket label cannot be represented.
pub fn resample_grid(
    grid: &Grid,
    target: Frequency,
    method: Method,
) -> Result<Resampled<Grid>, AggregateError> {
    let b = bucket(grid.times(), grid.values(), grid.n_cells(), target, method)?;
    debug!(
        variable = grid.name(),
        target = %target,
        method = %method,
        steps_in = grid.n_times(),
        steps_out = b.times.len(),
        resampled = b.resampled,
        "grid resample"
    );
    Ok(Resampled {
        data: grid.rebuilt(b.times, b.values)?,
        resampled: b.resampled,
    })
}

/// Resamples a series to `target`.
///
/// # Errors
///
/// Same as [`resample_grid`].
pub fn resample_series(
    series: &Series,
    target: Frequency,
    method: Method,
) -> Result<Resampled<Series>, AggregateError> {
    let b = bucket(series.times(), series.values(), 1, target, method)?;
    Ok(Resampled {
        data: Series::new(series.key(), b.times, b.values)?,
        resampled: b.resampled,
    })
}

/// Whether `times` is already at `target`.
///
/// Longer axes use the dominant spacing. A single timestep has no spacing;
/// it is already at `target` when it sits on its own bucket label, so a
/// one-month grid labelled on the month end stays monthly.
fn already_at(times: &[NaiveDateTime], target: Frequency) -> Result<bool, AggregateError> {
    match times {
        [t] => Ok(bucket_label(*t, target)? == *t),
        _ => Ok(infer_frequency(times) == Some(target)),
    }
}

/// Core resample over flat `[nt, width]` values.
fn bucket(
    times: &[NaiveDateTime],
    values: &[f64],
    width: usize,
    target: Frequency,
    method: Method,
) -> Result<Buckets, AggregateError> {
    if times.is_empty() {
        return Err(AggregateError::EmptyInput);
    }
    if values.len() != times.len() * width {
        return Err(AggregateError::LengthMismatch {
            field: "values",
            expected: times.len() * width,
            got: values.len(),
        });
    }

    if already_at(times, target)? {
        let times = if target == Frequency::SixHourly {
            times.iter().map(|&t| t - TimeDelta::hours(6)).collect()
        } else {
            times.to_vec()
        };
        return Ok(Buckets {
            times,
            values: values.to_vec(),
            resampled: false,
        });
    }

    let labels = times
        .iter()
        .map(|&t| bucket_label(t, target))
        .collect::<Result<Vec<_>, _>>()?;
    let out_times = label_sequence(labels[0], labels[labels.len() - 1], target)?;

    let mut out = vec![f64::NAN; out_times.len() * width];
    let mut scratch = Vec::new();
    let mut next = 0;
    for (slot, &label) in out_times.iter().enumerate() {
        let start = next;
        while next < labels.len() && labels[next] == label {
            next += 1;
        }
        if start == next {
            continue;
        }
        for cell in 0..width {
            scratch.clear();
            scratch.extend((start..next).map(|t| values[t * width + cell]));
            out[slot * width + cell] = method.apply(&scratch);
        }
    }

    Ok(Buckets {
        times: out_times,
        values: out,
        resampled: true,
    })
}
