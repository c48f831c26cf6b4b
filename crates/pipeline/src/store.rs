//! Storage seam between the orchestrator and the file system.

use std::path::Path;

use lisagg_aggregate::{Grid, Series};
use lisagg_calendar::Frequency;
use lisagg_io::LoaderConfig;

use crate::error::PipelineError;
use crate::layout::OutputLayout;

/// Answers which persisted grids already exist.
pub trait Listing {
    /// Whether a grid for `name` at `freq` has been persisted.
    fn has_grid(&self, freq: Frequency, name: &str) -> bool;
}

/// Reads source grids and reads/writes aggregated products.
///
/// Implementations are shared read-only between workers.
pub trait Store: Listing + Sync {
    /// Load a model output grid.
    fn load_source(&self, path: &Path) -> Result<Grid, PipelineError>;

    /// Load the persisted grid of `name` at `freq`.
    fn load_grid(&self, freq: Frequency, name: &str) -> Result<Grid, PipelineError>;

    /// Persist `grid` at `freq` under its own name.
    fn write_grid(&self, freq: Frequency, grid: &Grid) -> Result<(), PipelineError>;

    /// Persist the series of `name` at `freq`.
    fn write_series(
        &self,
        freq: Frequency,
        name: &str,
        series: &[Series],
    ) -> Result<(), PipelineError>;
}

/// [`Store`] over an [`OutputLayout`] on disk.
#[derive(Debug, Clone)]
pub struct FsStore {
    layout: OutputLayout,
    loader: LoaderConfig,
}

impl FsStore {
    /// Creates a store writing under `layout`.
    pub fn new(layout: OutputLayout, loader: LoaderConfig) -> Self {
        Self { layout, loader }
    }

    /// The output layout.
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }
}

impl Listing for FsStore {
    fn has_grid(&self, freq: Frequency, name: &str) -> bool {
        self.layout.grid_path(freq, name).is_file()
    }
}

impl Store for FsStore {
    fn load_source(&self, path: &Path) -> Result<Grid, PipelineError> {
        Ok(lisagg_io::load_grid(path, &self.loader)?)
    }

    fn load_grid(&self, freq: Frequency, name: &str) -> Result<Grid, PipelineError> {
        let path = self.layout.grid_path(freq, name);
        if !path.is_file() {
            return Err(PipelineError::MissingGrid {
                name: name.to_string(),
                freq,
            });
        }
        Ok(lisagg_io::load_grid(&path, &self.loader)?)
    }

    fn write_grid(&self, freq: Frequency, grid: &Grid) -> Result<(), PipelineError> {
        let path = self.layout.grid_path(freq, grid.name());
        Ok(lisagg_io::write_grid(&path, grid)?)
    }

    fn write_series(
        &self,
        freq: Frequency,
        name: &str,
        series: &[Series],
    ) -> Result<(), PipelineError> {
        let path = self.layout.series_path(freq, name);
        Ok(lisagg_io::write_series_csv(&path, series)?)
    }
}
