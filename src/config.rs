use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level lisagg configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LisaggConfig {
    /// Model run settings.
    #[serde(default)]
    pub model: ModelToml,

    /// Internal variable name -> output file pattern(s).
    #[serde(default)]
    pub bindings: BTreeMap<String, BindingToml>,

    /// Aggregation rules.
    #[serde(default)]
    pub aggregation: AggregationToml,

    /// NetCDF reader settings.
    #[serde(default)]
    pub io: IoToml,
}

impl LisaggConfig {
    /// Read and parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    pub output_root: Option<PathBuf>,
    pub dt_sec: Option<u64>,
    pub pixel_area: Option<PathBuf>,
    pub maps_path: Option<PathBuf>,
    pub calendar_day_start: Option<String>,
}

/// One file pattern or several.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum BindingToml {
    One(String),
    Many(Vec<String>),
}

impl BindingToml {
    pub fn patterns(&self) -> Vec<String> {
        match self {
            Self::One(p) => vec![p.clone()],
            Self::Many(ps) => ps.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationToml {
    #[serde(default = "default_fluxes")]
    pub fluxes: Vec<String>,
    #[serde(default = "default_states")]
    pub states: Vec<String>,
    #[serde(default = "default_discharge")]
    pub discharge: Vec<String>,
    #[serde(default = "default_flux_method")]
    pub flux_method: String,
    #[serde(default = "default_state_method")]
    pub state_method: String,
    #[serde(default = "default_spatial_methods")]
    pub spatial_methods: Vec<String>,
    #[serde(default)]
    pub save_grids: bool,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default = "default_depth_suffix")]
    pub depth_suffix: String,
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for AggregationToml {
    fn default() -> Self {
        Self {
            fluxes: default_fluxes(),
            states: default_states(),
            discharge: default_discharge(),
            flux_method: default_flux_method(),
            state_method: default_state_method(),
            spatial_methods: default_spatial_methods(),
            save_grids: false,
            overwrite: false,
            depth_suffix: default_depth_suffix(),
            ignore: default_ignore(),
            workers: None,
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_fluxes() -> Vec<String> {
    strings(&[
        "EWIntForestMaps",
        "GwPercUZLZMaps",
        "DirectRunoffMaps",
        "TotalToChanMaps",
        "TotalRunoffMaps",
        "UZOutflowMaps",
        "SurfaceRunoffMaps",
        "ESActMaps",
        "ETActMaps",
        "EWIntMaps",
        "EWater",
        "SnowMeltMaps",
        "SnowMaps",
        "TaMaps",
        "InfiltrationMaps",
        "PrefFlowMaps",
        "LZOutflowMaps",
    ])
}
fn default_states() -> Vec<String> {
    strings(&[
        "AvailGWMaps",
        "WaterDepthState",
        "LZMaps",
        "UZMaps",
        "SnowCoverMaps",
        "Theta1ForestMaps",
        "Theta2ForestMaps",
        "Theta3ForestMaps",
        "FrostIndexState",
        "WaterDepthMaps",
        "CumInterceptionMaps",
        "CumInterceptionForestMaps",
    ])
}
fn default_discharge() -> Vec<String> {
    strings(&["DischargeMaps"])
}
fn default_flux_method() -> String {
    "sum".to_string()
}
fn default_state_method() -> String {
    "mean".to_string()
}
fn default_spatial_methods() -> Vec<String> {
    strings(&["mean", "max", "min", "median"])
}
fn default_depth_suffix() -> String {
    "_mm".to_string()
}

// End-of-run states and initial values are model restart inputs, not output.
fn default_ignore() -> Vec<String> {
    strings(&[
        "Theta1End",
        "Theta2End",
        "Theta3End",
        "UZEnd",
        "LZEnd",
        "DSLREnd",
        "WaterDepthEnd",
        "OFDirectEnd",
        "OFOtherEnd",
        "OFForestEnd",
        "ChanCrossSectionEnd",
        "SnowCoverAEnd",
        "SnowCoverBEnd",
        "SnowCoverCEnd",
        "FrostIndexEnd",
        "CumInterceptionEnd",
        "LakeLevelEnd",
        "LakePrevInflowEnd",
        "LakePrevOutflowEnd",
        "LakeStorageM3",
        "ReservoirFillEnd",
        "CrossSection2End",
        "ChSideEnd",
        "ChanQEnd",
        "DischargeEnd",
        "DSLRForestEnd",
        "CumInterceptionForestEnd",
        "Theta1ForestEnd",
        "Theta2ForestEnd",
        "Theta3ForestEnd",
        "UZForestEnd",
        "CumIntSealedEnd",
        "DSLRIrrigationEnd",
        "CumInterceptionIrrigationEnd",
        "Theta1IrrigationEnd",
        "Theta2IrrigationEnd",
        "Theta3IrrigationEnd",
        "UZIrrigationEnd",
        "OFDirectInitValue",
        "OFOtherInitValue",
        "OFForestInitValue",
        "SnowCoverAInitValue",
        "SnowCoverBInitValue",
        "SnowCoverCInitValue",
        "FrostIndexInitValue",
        "CumIntInitValue",
        "UZInitValue",
        "DSLRInitValue",
        "LZInitValue",
        "TotalCrossSectionAreaInitValue",
        "ThetaInit1Value",
        "ThetaInit2Value",
        "ThetaInit3Value",
        "CrossSection2AreaInitValue",
        "PrevSideflowInitValue",
        "LakeInitialLevelValue",
        "LakePrevInflowValue",
        "LakePrevOutflowValue",
        "PrevDischarge",
        "CumIntForestInitValue",
        "UZForestInitValue",
        "DSLRForestInitValue",
        "ThetaForestInit1Value",
        "ThetaForestInit2Value",
        "ThetaForestInit3Value",
        "CumIntIrrigationInitValue",
        "UZIrrigationInitValue",
        "DSLRIrrigationInitValue",
        "ThetaIrrigationInit1Value",
        "ThetaIrrigationInit2Value",
        "ThetaIrrigationInit3Value",
        "CumIntSealedInitValue",
    ])
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_exclude_vars")]
    pub exclude_vars: Vec<String>,
    #[serde(default = "default_lat_aliases")]
    pub lat_aliases: Vec<String>,
    #[serde(default = "default_lon_aliases")]
    pub lon_aliases: Vec<String>,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            exclude_vars: default_exclude_vars(),
            lat_aliases: default_lat_aliases(),
            lon_aliases: default_lon_aliases(),
        }
    }
}

fn default_exclude_vars() -> Vec<String> {
    strings(&["time_bnds", "crs"])
}
fn default_lat_aliases() -> Vec<String> {
    strings(&["Latitude", "lat", "y"])
}
fn default_lon_aliases() -> Vec<String> {
    strings(&["Longitude", "lon", "x"])
}
