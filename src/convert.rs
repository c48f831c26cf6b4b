//! Pure conversion functions: TOML config structs -> crate API config types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use lisagg_aggregate::Method;
use lisagg_calendar::Frequency;
use lisagg_io::{Bindings, LoaderConfig};
use lisagg_pipeline::{Classification, PipelineConfig};

use crate::config::{AggregationToml, BindingToml, IoToml, ModelToml};

/// Accepted layouts for `calendar_day_start` and `--start`.
const START_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y%m%d%H%M",
];

/// Parses one aggregation method name.
pub fn parse_method(s: &str) -> Result<Method> {
    s.parse::<Method>()
        .with_context(|| format!("invalid aggregation method {s:?}"))
}

/// Parses a list of method names, failing on the first unknown one.
pub fn parse_methods(names: &[String]) -> Result<Vec<Method>> {
    names.iter().map(|n| parse_method(n)).collect()
}

/// Native model frequency from the timestep in seconds.
pub fn native_frequency(dt_sec: u64) -> Result<Frequency> {
    Frequency::from_timestep_seconds(dt_sec)
        .with_context(|| format!("unsupported model timestep dt_sec = {dt_sec}"))
}

/// Parses a start timestamp in any of [`START_FORMATS`].
pub fn parse_start(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    START_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .with_context(|| format!("unrecognised start date {s:?} (expected \"YYYY-MM-DD HH:MM\")"))
}

/// Points a map path into `maps_path` when given.
///
/// Only paths that name a `.nc` or `.map` file are redirected; the
/// basename is kept.
pub fn redirect_map_path(path: &Path, maps_path: Option<&Path>) -> PathBuf {
    let Some(dir) = maps_path else {
        return path.to_path_buf();
    };
    let text = path.to_string_lossy();
    match path.file_name() {
        Some(base) if text.contains(".nc") || text.contains(".map") => dir.join(base),
        _ => path.to_path_buf(),
    }
}

/// Path of the cell-area grid, redirected and with `.map` read as `.nc`.
pub fn area_path(model: &ModelToml, maps_path: Option<&Path>) -> Option<PathBuf> {
    let path = redirect_map_path(model.pixel_area.as_deref()?, maps_path);
    if path.extension().is_some_and(|e| e == "map") {
        Some(path.with_extension("nc"))
    } else {
        Some(path)
    }
}

/// Flattens the TOML binding table into file patterns per variable.
pub fn build_bindings(bindings: &BTreeMap<String, BindingToml>) -> Bindings {
    bindings
        .iter()
        .map(|(name, b)| (name.clone(), b.patterns()))
        .collect()
}

/// Builds a [`LoaderConfig`] from the TOML I/O configuration.
pub fn build_loader_config(io: &IoToml) -> Result<LoaderConfig> {
    let cfg = LoaderConfig::default()
        .with_exclude_vars(io.exclude_vars.clone())
        .with_lat_aliases(io.lat_aliases.clone())
        .with_lon_aliases(io.lon_aliases.clone());
    cfg.validate().context("invalid [io] configuration")?;
    Ok(cfg)
}

/// Builds the variable [`Classification`] from the aggregation lists.
pub fn build_classification(agg: &AggregationToml) -> Result<Classification> {
    Classification::new(
        agg.fluxes.clone(),
        agg.states.clone(),
        agg.discharge.clone(),
    )
    .context("invalid [aggregation] variable lists")
}

/// Builds a [`PipelineConfig`] from the TOML aggregation configuration.
pub fn build_pipeline_config(agg: &AggregationToml, native: Frequency) -> Result<PipelineConfig> {
    let spatial = parse_methods(&agg.spatial_methods)?;
    let cfg = PipelineConfig::new(native, build_classification(agg)?)
        .with_flux_method(parse_method(&agg.flux_method)?)
        .with_state_method(parse_method(&agg.state_method)?)
        .with_spatial_methods(spatial)
        .with_save_grids(agg.save_grids)
        .with_overwrite(agg.overwrite)
        .with_depth_suffix(agg.depth_suffix.clone());
    cfg.validate().context("invalid [aggregation] configuration")?;
    Ok(cfg)
}
