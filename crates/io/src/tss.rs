//! LISFLOOD `.tss` tables and their conversion to CSV.
//!
//! A table either starts with a header block
//!
//! ```text
//! timeseries scalar
//! 3
//! timestep
//! 101
//! 205
//!      1  0.5  1.5
//!      2  0.6  1.7
//! ```
//!
//! (the count includes the `timestep` column) or is a bare numeric table
//! whose outlets are numbered from 1.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, TimeDelta};
use lisagg_aggregate::Series;
use tracing::info;

use crate::error::IoError;
use crate::series_csv::write_series_csv;

/// A parsed `.tss` table.
#[derive(Debug, Clone, PartialEq)]
pub struct TssTable {
    outlets: Vec<String>,
    steps: Vec<u64>,
    /// Row-major `[steps, outlets]`.
    values: Vec<f64>,
}

impl TssTable {
    /// Outlet identifiers, one per value column.
    pub fn outlets(&self) -> &[String] {
        &self.outlets
    }

    /// Model step numbers, 1-based.
    pub fn steps(&self) -> &[u64] {
        &self.steps
    }

    /// Values of one outlet.
    pub fn column(&self, outlet: usize) -> Vec<f64> {
        let n = self.outlets.len();
        self.values.iter().skip(outlet).step_by(n.max(1)).copied().collect()
    }

    /// One series per outlet. Step `k` is stamped `start + (k - 1) * dt`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidTime`] on overflow, or a construction
    /// error if steps are not strictly increasing.
    pub fn to_series(&self, start: NaiveDateTime, dt: TimeDelta) -> Result<Vec<Series>, IoError> {
        let times = self
            .steps
            .iter()
            .map(|&k| {
                let offset = i32::try_from(k.saturating_sub(1))
                    .ok()
                    .and_then(|k| dt.checked_mul(k))
                    .ok_or_else(|| IoError::InvalidTime {
                        reason: format!("step {k} x {dt} out of range"),
                    })?;
                start
                    .checked_add_signed(offset)
                    .ok_or_else(|| IoError::InvalidTime {
                        reason: format!("step {k} from {start} out of range"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.outlets
            .iter()
            .enumerate()
            .map(|(i, id)| Ok(Series::new(id.clone(), times.clone(), self.column(i))?))
            .collect()
    }
}

/// Parse a `.tss` file.
///
/// # Errors
///
/// Returns [`IoError::Tss`] for a malformed header or row.
pub fn read_tss(path: &Path) -> Result<TssTable, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    parse_tss(&text, path)
}

fn parse_tss(text: &str, path: &Path) -> Result<TssTable, IoError> {
    let err = |line: usize, reason: String| IoError::Tss {
        path: path.to_path_buf(),
        line,
        reason,
    };
    let lines: Vec<&str> = text.lines().collect();

    let mut outlets = None;
    let mut first_row = 0;
    if lines
        .first()
        .and_then(|l| l.split_whitespace().next())
        .is_some_and(|tok| tok == "timeseries")
    {
        let count: usize = lines
            .get(1)
            .map(|l| l.trim())
            .and_then(|l| l.parse().ok())
            .ok_or_else(|| err(2, "expected column count".to_string()))?;
        if count < 1 || lines.len() < count + 2 {
            return Err(err(2, format!("header declares {count} columns")));
        }
        // line 3 names the step column; outlet ids follow
        outlets = Some(
            lines[3..count + 2]
                .iter()
                .map(|l| l.trim().to_string())
                .collect::<Vec<_>>(),
        );
        first_row = count + 2;
    }

    let mut steps = Vec::new();
    let mut values = Vec::new();
    let mut width = outlets.as_ref().map(Vec::len);
    for (i, line) in lines.iter().enumerate().skip(first_row) {
        let lineno = i + 1;
        let mut tokens = line.split_whitespace();
        let Some(step_tok) = tokens.next() else {
            continue;
        };
        let step = step_tok
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite() && *s >= 1.0 && s.fract() == 0.0)
            .ok_or_else(|| err(lineno, format!("bad step '{step_tok}'")))?;
        let row = tokens
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|e| err(lineno, format!("bad value '{tok}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        match width {
            Some(w) if w != row.len() => {
                return Err(err(lineno, format!("expected {w} values, got {}", row.len())));
            }
            None => width = Some(row.len()),
            _ => {}
        }
        steps.push(step as u64);
        values.extend(row);
    }

    let outlets =
        outlets.unwrap_or_else(|| (1..=width.unwrap_or(0)).map(|i| i.to_string()).collect());
    Ok(TssTable {
        outlets,
        steps,
        values,
    })
}

/// Convert one `.tss` file to CSV. Returns the number of rows written.
///
/// # Errors
///
/// Returns [`IoError`] on parse or write failures.
pub fn convert_tss(
    input: &Path,
    output: &Path,
    start: NaiveDateTime,
    dt: TimeDelta,
) -> Result<usize, IoError> {
    let table = read_tss(input)?;
    let series = table.to_series(start, dt)?;
    write_series_csv(output, &series)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        outlets = table.outlets().len(),
        steps = table.steps().len(),
        "converted tss"
    );
    Ok(table.steps().len())
}

/// Every `.tss` file directly inside `dir`, in name order.
///
/// # Errors
///
/// Returns [`IoError`] if `dir` cannot be read.
pub fn list_tss_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "tss"))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1990, 1, 2)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    #[test]
    fn header_block() {
        let text = "timeseries scalar\n3\ntimestep\n101\n205\n 1 0.5 1.5\n 2 0.6 1.7\n";
        let t = parse_tss(text, Path::new("x.tss")).unwrap();
        assert_eq!(t.outlets(), &["101", "205"]);
        assert_eq!(t.steps(), &[1, 2]);
        assert_eq!(t.column(1), vec![1.5, 1.7]);
    }

    #[test]
    fn headerless() {
        let text = "1 10.0 20.0 30.0\n2 11.0 21.0 31.0\n\n";
        let t = parse_tss(text, Path::new("x.tss")).unwrap();
        assert_eq!(t.outlets(), &["1", "2", "3"]);
        assert_eq!(t.column(2), vec![30.0, 31.0]);
    }

    #[test]
    fn ragged_row_is_error() {
        let text = "1 1.0 2.0\n2 1.0\n";
        match parse_tss(text, Path::new("x.tss")).unwrap_err() {
            IoError::Tss { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Tss error, got {other:?}"),
        }
    }

    #[test]
    fn bad_step_is_error() {
        assert!(parse_tss("0.5 1.0\n", Path::new("x.tss")).is_err());
    }

    #[test]
    fn first_step_is_calendar_day_start() {
        let text = "1 1.0\n2 2.0\n5 5.0\n";
        let t = parse_tss(text, Path::new("x.tss")).unwrap();
        let series = t.to_series(start(), TimeDelta::hours(6)).unwrap();
        assert_eq!(series.len(), 1);
        let times = series[0].times();
        assert_eq!(times[0], start());
        assert_eq!(times[1], start() + TimeDelta::hours(6));
        assert_eq!(times[2], start() + TimeDelta::hours(24));
    }
}
