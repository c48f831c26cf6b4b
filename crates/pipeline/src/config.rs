//! Pipeline configuration.

use lisagg_aggregate::Method;
use lisagg_calendar::Frequency;

use crate::classify::Classification;
use crate::error::PipelineError;

/// Configuration shared by every variable of a run.
///
/// # Example
///
/// ```
/// use lisagg_calendar::Frequency;
/// use lisagg_pipeline::{Classification, PipelineConfig};
///
/// let classes = Classification::new(vec!["rain"], vec!["sm"], vec!["dis"]).unwrap();
/// let config = PipelineConfig::new(Frequency::Daily, classes).with_save_grids(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    native: Frequency,
    classification: Classification,
    flux_method: Method,
    state_method: Method,
    spatial_methods: Vec<Method>,
    save_grids: bool,
    overwrite: bool,
    depth_suffix: String,
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: fluxes summed, states averaged, spatial methods
    /// mean/max/min/median, grids not saved, no overwrite, depth suffix
    /// `_mm`.
    pub fn new(native: Frequency, classification: Classification) -> Self {
        Self {
            native,
            classification,
            flux_method: Method::Sum,
            state_method: Method::Mean,
            spatial_methods: vec![Method::Mean, Method::Max, Method::Min, Method::Median],
            save_grids: false,
            overwrite: false,
            depth_suffix: "_mm".to_string(),
        }
    }

    /// Sets the temporal method for fluxes.
    pub fn with_flux_method(mut self, m: Method) -> Self {
        self.flux_method = m;
        self
    }

    /// Sets the temporal method for states.
    pub fn with_state_method(mut self, m: Method) -> Self {
        self.state_method = m;
        self
    }

    /// Sets the spatial methods used for every series.
    pub fn with_spatial_methods(mut self, methods: Vec<Method>) -> Self {
        self.spatial_methods = methods;
        self
    }

    /// Persist intermediate grids.
    pub fn with_save_grids(mut self, save: bool) -> Self {
        self.save_grids = save;
        self
    }

    /// Ignore existing outputs and recompute everything.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the suffix of depth-path output names.
    pub fn with_depth_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.depth_suffix = suffix.into();
        self
    }

    /// Native frequency of the model output.
    pub fn native(&self) -> Frequency {
        self.native
    }

    /// Variable classification.
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Temporal method for fluxes.
    pub fn flux_method(&self) -> Method {
        self.flux_method
    }

    /// Temporal method for states.
    pub fn state_method(&self) -> Method {
        self.state_method
    }

    /// Spatial methods.
    pub fn spatial_methods(&self) -> &[Method] {
        &self.spatial_methods
    }

    /// Whether intermediate grids are persisted.
    pub fn save_grids(&self) -> bool {
        self.save_grids
    }

    /// Whether existing outputs are ignored.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Depth-path output name of `name`.
    pub fn depth_name(&self, name: &str) -> String {
        format!("{name}{}", self.depth_suffix)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the native frequency is
    /// not six-hourly or daily, no spatial method is given, or the depth
    /// suffix is empty.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !matches!(self.native, Frequency::SixHourly | Frequency::Daily) {
            return Err(PipelineError::InvalidConfig {
                reason: format!("native frequency must be 6H or D, got {}", self.native),
            });
        }
        if self.spatial_methods.is_empty() {
            return Err(PipelineError::InvalidConfig {
                reason: "at least one spatial method is required".to_string(),
            });
        }
        if self.depth_suffix.is_empty() {
            return Err(PipelineError::InvalidConfig {
                reason: "depth suffix must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
