//! High-level NetCDF grid loading.

use std::path::Path;

use lisagg_aggregate::{Axis, CellAreas, Grid};
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;

// ---------------------------------------------------------------------------
// LoaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading model output grids from NetCDF files.
///
/// The [`Default`] implementation excludes the usual bookkeeping variables
/// and recognises the spatial dimension names model output commonly uses.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Variables never treated as the data variable.
    exclude_vars: Vec<String>,
    /// Dimension names renamed to `lat`.
    lat_aliases: Vec<String>,
    /// Dimension names renamed to `lon`.
    lon_aliases: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            exclude_vars: vec!["time_bnds".into(), "crs".into()],
            lat_aliases: vec!["Latitude".into(), "lat".into(), "y".into()],
            lon_aliases: vec!["Longitude".into(), "lon".into(), "x".into()],
        }
    }
}

impl LoaderConfig {
    /// Set the excluded variable names.
    pub fn with_exclude_vars(mut self, names: Vec<String>) -> Self {
        self.exclude_vars = names;
        self
    }

    /// Set the dimension names recognised as latitude.
    pub fn with_lat_aliases(mut self, names: Vec<String>) -> Self {
        self.lat_aliases = names;
        self
    }

    /// Set the dimension names recognised as longitude.
    pub fn with_lon_aliases(mut self, names: Vec<String>) -> Self {
        self.lon_aliases = names;
        self
    }

    /// Excluded variable names.
    pub fn exclude_vars(&self) -> &[String] {
        &self.exclude_vars
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if either alias list is empty or a
    /// name is both a latitude and a longitude alias.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.lat_aliases.is_empty() {
            problems.push("lat_aliases must not be empty".to_string());
        }
        if self.lon_aliases.is_empty() {
            problems.push("lon_aliases must not be empty".to_string());
        }
        for name in &self.lat_aliases {
            if self.lon_aliases.contains(name) {
                problems.push(format!("'{name}' is both a lat and a lon alias"));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }

    fn canonical_dim(&self, name: &str) -> String {
        if self.lat_aliases.iter().any(|a| a == name) {
            "lat".to_string()
        } else if self.lon_aliases.iter().any(|a| a == name) {
            "lon".to_string()
        } else {
            name.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// load_grid
// ---------------------------------------------------------------------------

/// Load the data variable of a model output file as a [`Grid`].
///
/// The data variable is the first one that is neither excluded nor a
/// coordinate variable and has three dimensions `(time, y, x)`. Spatial
/// dimensions listed as aliases are renamed to `lat` / `lon`; others keep
/// their names. Fill values become NaN and packing is undone. A path that
/// does not exist and does not end in `.nc` is retried with `.nc`.
///
/// # Errors
///
/// Returns [`IoError`] on a missing file, no usable data variable, an
/// undecodable time axis or a malformed grid.
pub fn load_grid(path: &Path, config: &LoaderConfig) -> Result<Grid, IoError> {
    config.validate()?;
    let (file, resolved) = netcdf_read::open_file(path)?;

    let var = netcdf_read::select_data_variable(&file, &config.exclude_vars, &[3], &resolved)?;
    let name = var.name();
    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();

    let times = netcdf_read::read_times(&file, &dims[0].0, &resolved)?;
    if times.len() != dims[0].1 {
        return Err(IoError::DimensionMismatch {
            name: dims[0].0.clone(),
            expected: dims[0].1,
            got: times.len(),
        });
    }

    let y = Axis::new(
        config.canonical_dim(&dims[1].0),
        netcdf_read::read_axis(&file, &dims[1].0, dims[1].1)?,
    );
    let x = Axis::new(
        config.canonical_dim(&dims[2].0),
        netcdf_read::read_axis(&file, &dims[2].0, dims[2].1)?,
    );

    let values = netcdf_read::read_decoded(&var)?;
    let attributes = netcdf_read::string_attributes(&var);

    info!(
        path = %resolved.display(),
        variable = %name,
        nt = dims[0].1,
        ny = dims[1].1,
        nx = dims[2].1,
        "loaded grid"
    );
    Ok(Grid::new(name, times, y, x, values)?.with_attributes(attributes))
}

/// Load a per-cell area field.
///
/// Accepts a 2-D `(y, x)` variable or a 3-D one, in which case the first
/// time slice is used.
///
/// # Errors
///
/// Returns [`IoError`] on a missing file or no usable data variable.
pub fn load_cell_areas(path: &Path, config: &LoaderConfig) -> Result<CellAreas, IoError> {
    let (file, resolved) = netcdf_read::open_file(path)?;
    let var = netcdf_read::select_data_variable(&file, &config.exclude_vars, &[2, 3], &resolved)?;

    let dims = var.dimensions();
    let rank = dims.len();
    let ny = dims[rank - 2].len();
    let nx = dims[rank - 1].len();

    let mut values = netcdf_read::read_decoded(&var)?;
    values.truncate(ny * nx);

    debug!(path = %resolved.display(), variable = %var.name(), ny, nx, "loaded cell areas");
    Ok(CellAreas::new(ny, nx, values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = LoaderConfig::default();
        assert_eq!(config.exclude_vars(), &["time_bnds", "crs"]);
        assert_eq!(config.canonical_dim("Latitude"), "lat");
        assert_eq!(config.canonical_dim("x"), "lon");
        assert_eq!(config.canonical_dim("rows"), "rows");
    }

    #[test]
    fn builder_methods() {
        let config = LoaderConfig::default()
            .with_exclude_vars(vec!["mask".into()])
            .with_lat_aliases(vec!["rlat".into()])
            .with_lon_aliases(vec!["rlon".into()]);
        assert_eq!(config.exclude_vars(), &["mask"]);
        assert_eq!(config.canonical_dim("rlat"), "lat");
        assert_eq!(config.canonical_dim("y"), "y");
    }

    #[test]
    fn validate_ok() {
        assert!(LoaderConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_collects_problems() {
        let config = LoaderConfig::default()
            .with_lat_aliases(vec!["y".into()])
            .with_lon_aliases(vec!["y".into()]);
        match config.validate().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("'y'"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_empty_aliases() {
        let config = LoaderConfig::default().with_lon_aliases(vec![]);
        assert!(matches!(
            config.validate(),
            Err(IoError::Validation { count: 1, .. })
        ));
    }
}
