//! NetCDF grid writer.

use std::fs;
use std::path::Path;

use lisagg_aggregate::Grid;
use tracing::info;

use crate::error::IoError;

/// Units of the written time axis.
pub const TIME_UNITS: &str = "hours since 1970-01-01 00:00:00";

/// Write `grid` to `path` as NetCDF.
///
/// The file is built in a scratch directory next to `path` and renamed into
/// place, so an interrupted write never leaves a partial file at `path`.
/// Dimensions are `time` plus the grid's axis names; the variable carries
/// the grid's string attributes.
///
/// # Errors
///
/// Returns [`IoError`] if the destination directory is missing or the
/// NetCDF library fails.
pub fn write_grid(path: &Path, grid: &Grid) -> Result<(), IoError> {
    let dir = parent_dir(path);
    let scratch = tempfile::Builder::new().prefix(".lisagg-").tempdir_in(dir)?;
    let file_name = path.file_name().ok_or_else(|| IoError::Io {
        reason: format!("not a file path: {}", path.display()),
    })?;
    let staged = scratch.path().join(file_name);

    write_netcdf(&staged, grid)?;
    fs::rename(&staged, path)?;

    info!(path = %path.display(), variable = grid.name(), steps = grid.n_times(), "wrote grid");
    Ok(())
}

fn write_netcdf(path: &Path, grid: &Grid) -> Result<(), IoError> {
    let [nt, ny, nx] = grid.shape();
    let y_name = grid.y().name();
    let x_name = grid.x().name();
    let var_name = if grid.name().is_empty() {
        "data"
    } else {
        grid.name()
    };

    let mut file = netcdf::create(path)?;
    file.add_dimension("time", nt)?;
    file.add_dimension(y_name, ny)?;
    file.add_dimension(x_name, nx)?;

    {
        let hours: Vec<f64> = grid
            .times()
            .iter()
            .map(|t| t.and_utc().timestamp() as f64 / 3600.0)
            .collect();
        let mut var = file.add_variable::<f64>("time", &["time"])?;
        var.put_values(&hours, ..)?;
        var.put_attribute("units", TIME_UNITS)?;
        var.put_attribute("calendar", "standard")?;
    }
    {
        let mut var = file.add_variable::<f64>(y_name, &[y_name])?;
        var.put_values(grid.y().coords(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>(x_name, &[x_name])?;
        var.put_values(grid.x().coords(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>(var_name, &["time", y_name, x_name])?;
        for (key, value) in grid.attributes() {
            var.put_attribute(key, value.as_str())?;
        }
        if !grid.values().is_empty() {
            var.put_values(grid.values(), ..)?;
        }
    }
    Ok(())
}

/// Directory `path` lives in; `.` for a bare file name.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
