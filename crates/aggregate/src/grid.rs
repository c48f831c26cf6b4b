//! Gridded `(time, y, x)` data.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::AggregateError;

/// A named spatial axis with its coordinate values.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: String,
    coords: Vec<f64>,
}

impl Axis {
    /// Creates an axis.
    pub fn new(name: impl Into<String>, coords: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            coords,
        }
    }

    /// Dimension name, e.g. `lat`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coordinate values.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the axis has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// A named 3-D field over `(time, y, x)`.
///
/// Values are stored flat in row-major `[nt, ny, nx]` order: the value at
/// timestep `t`, row `j`, column `i` lives at `t * ny * nx + j * nx + i`.
/// Masked cells are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    name: String,
    attributes: BTreeMap<String, String>,
    times: Vec<NaiveDateTime>,
    y: Axis,
    x: Axis,
    values: Vec<f64>,
}

impl Grid {
    /// Creates a grid, checking that the time axis is strictly increasing
    /// and that `values` holds exactly `nt * ny * nx` elements.
    pub fn new(
        name: impl Into<String>,
        times: Vec<NaiveDateTime>,
        y: Axis,
        x: Axis,
        values: Vec<f64>,
    ) -> Result<Self, AggregateError> {
        check_times(&times)?;
        let expected = times.len() * y.len() * x.len();
        if values.len() != expected {
            return Err(AggregateError::LengthMismatch {
                field: "values",
                expected,
                got: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            times,
            y,
            x,
            values,
        })
    }

    /// Returns the grid under a different variable name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets one attribute, replacing any previous value.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Replaces every attribute.
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Variable name; may be empty if the source had none.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// String attributes carried with the variable.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// One attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The `units` attribute.
    pub fn units(&self) -> Option<&str> {
        self.attribute("units")
    }

    /// Timestamps.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Row axis.
    pub fn y(&self) -> &Axis {
        &self.y
    }

    /// Column axis.
    pub fn x(&self) -> &Axis {
        &self.x
    }

    /// Flat `[nt, ny, nx]` values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the grid, returning its values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Number of timesteps.
    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    /// Number of cells per timestep.
    pub fn n_cells(&self) -> usize {
        self.y.len() * self.x.len()
    }

    /// `[nt, ny, nx]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.times.len(), self.y.len(), self.x.len()]
    }

    /// Dimension names in storage order.
    pub fn dim_names(&self) -> Vec<String> {
        vec![
            "time".to_string(),
            self.y.name.clone(),
            self.x.name.clone(),
        ]
    }

    /// Values of a single timestep.
    ///
    /// # Panics
    ///
    /// Panics if `t >= n_times()`.
    pub fn step(&self, t: usize) -> &[f64] {
        let n = self.n_cells();
        &self.values[t * n..(t + 1) * n]
    }

    /// Same axes and metadata, new time axis and values.
    pub(crate) fn rebuilt(
        &self,
        times: Vec<NaiveDateTime>,
        values: Vec<f64>,
    ) -> Result<Self, AggregateError> {
        Ok(Grid::new(
            self.name.clone(),
            times,
            self.y.clone(),
            self.x.clone(),
            values,
        )?
        .with_attributes(self.attributes.clone()))
    }
}

pub(crate) fn check_times(times: &[NaiveDateTime]) -> Result<(), AggregateError> {
    match times.windows(2).position(|w| w[1] <= w[0]) {
        Some(i) => Err(AggregateError::NonMonotonicTime { index: i + 1 }),
        None => Ok(()),
    }
}
