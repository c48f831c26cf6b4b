//! In-memory store and grid builders shared by the pipeline tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use lisagg_aggregate::{Axis, Grid, Series};
use lisagg_calendar::Frequency;
use lisagg_io::IoError;
use lisagg_pipeline::{Listing, PipelineError, Store};

#[derive(Default)]
pub struct MemStore {
    pub sources: BTreeMap<PathBuf, Grid>,
    pub grids: Mutex<BTreeMap<(Frequency, String), Grid>>,
    pub series: Mutex<BTreeMap<(Frequency, String), Vec<Series>>>,
    pub fail_writes_at: Option<Frequency>,
}

impl MemStore {
    pub fn with_source(mut self, path: &str, grid: Grid) -> Self {
        self.sources.insert(PathBuf::from(path), grid);
        self
    }

    pub fn with_grid(self, freq: Frequency, grid: Grid) -> Self {
        self.grids
            .lock()
            .unwrap()
            .insert((freq, grid.name().to_string()), grid);
        self
    }

    pub fn grid(&self, freq: Frequency, name: &str) -> Option<Grid> {
        self.grids
            .lock()
            .unwrap()
            .get(&(freq, name.to_string()))
            .cloned()
    }

    pub fn grid_keys(&self) -> Vec<(Frequency, String)> {
        self.grids.lock().unwrap().keys().cloned().collect()
    }

    pub fn series_keys(&self) -> Vec<(Frequency, String)> {
        self.series.lock().unwrap().keys().cloned().collect()
    }

    /// The series with key `key` written for `name` at `freq`.
    pub fn series(&self, freq: Frequency, name: &str, key: &str) -> Option<Series> {
        self.series
            .lock()
            .unwrap()
            .get(&(freq, name.to_string()))?
            .iter()
            .find(|s| s.key() == key)
            .cloned()
    }

    fn check_write(&self, freq: Frequency) -> Result<(), PipelineError> {
        if self.fail_writes_at == Some(freq) {
            return Err(IoError::Io {
                reason: "disk full".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Listing for MemStore {
    fn has_grid(&self, freq: Frequency, name: &str) -> bool {
        self.grids
            .lock()
            .unwrap()
            .contains_key(&(freq, name.to_string()))
    }
}

impl Store for MemStore {
    fn load_source(&self, path: &Path) -> Result<Grid, PipelineError> {
        self.sources.get(path).cloned().ok_or_else(|| {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    fn load_grid(&self, freq: Frequency, name: &str) -> Result<Grid, PipelineError> {
        self.grid(freq, name).ok_or_else(|| PipelineError::MissingGrid {
            name: name.to_string(),
            freq,
        })
    }

    fn write_grid(&self, freq: Frequency, grid: &Grid) -> Result<(), PipelineError> {
        self.check_write(freq)?;
        self.grids
            .lock()
            .unwrap()
            .insert((freq, grid.name().to_string()), grid.clone());
        Ok(())
    }

    fn write_series(
        &self,
        freq: Frequency,
        name: &str,
        series: &[Series],
    ) -> Result<(), PipelineError> {
        self.check_write(freq)?;
        self.series
            .lock()
            .unwrap()
            .insert((freq, name.to_string()), series.to_vec());
        Ok(())
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

/// `n` steps of `step` starting at `start` over a 1×2 grid, value `f(t, cell)`.
pub fn grid_1x2(
    name: &str,
    start: NaiveDateTime,
    step: TimeDelta,
    n: usize,
    f: impl Fn(usize, usize) -> f64,
) -> Grid {
    let times = (0..n).map(|i| start + step * i as i32).collect();
    let values = (0..n).flat_map(|t| [f(t, 0), f(t, 1)]).collect();
    Grid::new(
        name,
        times,
        Axis::new("lat", vec![45.0]),
        Axis::new("lon", vec![8.0, 8.5]),
        values,
    )
    .unwrap()
}

/// Daily grid covering January and February 2023, value 1 in cell 0 and 2
/// in cell 1.
pub fn daily_two_months(name: &str) -> Grid {
    grid_1x2(name, at(2023, 1, 1, 0), TimeDelta::days(1), 59, |_, c| {
        (c + 1) as f64
    })
}
