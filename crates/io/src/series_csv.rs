//! CSV persistence for scalar series.
//!
//! One `time` column followed by one column per series key. Timestamps use
//! `%Y-%m-%d %H:%M:%S`; NaN is written as an empty field.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use lisagg_aggregate::Series;
use tracing::info;

use crate::error::IoError;
use crate::writer::parent_dir;

/// Timestamp format of the `time` column.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write `series` side by side to `path`.
///
/// Rows cover the union of all time axes; a series without a value at a
/// row's timestamp leaves the field empty. The file is written to a
/// temporary sibling and renamed into place.
///
/// # Errors
///
/// Returns [`IoError`] on file-system or CSV failures.
pub fn write_series_csv(path: &Path, series: &[Series]) -> Result<(), IoError> {
    let mut rows: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();
    for (col, s) in series.iter().enumerate() {
        for (t, v) in s.iter() {
            rows.entry(t).or_insert_with(|| vec![None; series.len()])[col] = Some(v);
        }
    }

    let dir = parent_dir(path);
    let mut tmp = tempfile::Builder::new()
        .prefix(".lisagg-")
        .suffix(".csv")
        .tempfile_in(dir)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        let mut header = vec!["time".to_string()];
        header.extend(series.iter().map(|s| s.key().to_string()));
        writer.write_record(&header)?;

        for (t, values) in &rows {
            let mut record = vec![t.format(TIME_FORMAT).to_string()];
            record.extend(values.iter().map(|v| match v {
                Some(x) if !x.is_nan() => x.to_string(),
                _ => String::new(),
            }));
            writer.write_record(&record)?;
        }
        writer.flush()?;
    }
    tmp.persist(path)?;

    info!(path = %path.display(), columns = series.len(), rows = rows.len(), "wrote series");
    Ok(())
}

/// Read a file written by [`write_series_csv`] back into series.
///
/// Empty fields become NaN.
///
/// # Errors
///
/// Returns [`IoError`] on a missing file, a malformed timestamp or a
/// non-numeric field.
pub fn read_series_csv(path: &Path) -> Result<Vec<Series>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let keys: Vec<String> = reader.headers()?.iter().skip(1).map(str::to_string).collect();

    let mut times = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); keys.len()];
    for record in reader.records() {
        let record = record?;
        let stamp = record.get(0).unwrap_or_default();
        let t = NaiveDateTime::parse_from_str(stamp, TIME_FORMAT).map_err(|e| IoError::InvalidTime {
            reason: format!("bad timestamp '{stamp}': {e}"),
        })?;
        times.push(t);
        for (col, column) in columns.iter_mut().enumerate() {
            let field = record.get(col + 1).unwrap_or_default().trim();
            let value = if field.is_empty() {
                f64::NAN
            } else {
                field.parse::<f64>().map_err(|e| IoError::Csv {
                    reason: format!("bad value '{field}' in column '{}': {e}", keys[col]),
                })?
            };
            column.push(value);
        }
    }

    keys.into_iter()
        .zip(columns)
        .map(|(key, values)| Ok(Series::new(key, times.clone(), values)?))
        .collect()
}
