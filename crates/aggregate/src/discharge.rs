//! Discharge rate to water-depth conversion.

use tracing::debug;

use crate::error::AggregateError;
use crate::grid::Grid;

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Millimetres per metre.
pub const MM_PER_M: f64 = 1_000.0;

/// Units attached to depth grids.
pub const DEPTH_UNITS: &str = "mm/day";

/// Per-cell area (m²) on the discharge grid's `(y, x)` layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAreas {
    ny: usize,
    nx: usize,
    values: Vec<f64>,
}

impl CellAreas {
    /// Creates an area field from row-major `[ny, nx]` values.
    pub fn new(ny: usize, nx: usize, values: Vec<f64>) -> Result<Self, AggregateError> {
        if values.len() != ny * nx {
            return Err(AggregateError::LengthMismatch {
                field: "areas",
                expected: ny * nx,
                got: values.len(),
            });
        }
        Ok(Self { ny, nx, values })
    }

    /// `[ny, nx]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.ny, self.nx]
    }

    /// Row-major areas.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Converts a daily discharge rate (m³/s) into a water depth (mm/day).
///
/// `depth = rate * 86400 * 1000 / area`. Cells whose area is not a positive
/// finite number come out NaN.
///
/// # Errors
///
/// Returns [`AggregateError::ShapeMismatch`] if `areas` does not match the
/// grid's spatial shape.
pub fn rate_to_depth(rate: &Grid, areas: &CellAreas) -> Result<Grid, AggregateError> {
    let [_, ny, nx] = rate.shape();
    if areas.shape() != [ny, nx] {
        return Err(AggregateError::ShapeMismatch {
            expected: [ny, nx],
            got: areas.shape(),
        });
    }

    let factor: Vec<f64> = areas
        .values
        .iter()
        .map(|&a| {
            if a.is_finite() && a > 0.0 {
                SECONDS_PER_DAY * MM_PER_M / a
            } else {
                f64::NAN
            }
        })
        .collect();

    let values: Vec<f64> = (0..rate.n_times())
        .flat_map(|t| rate.step(t).iter().zip(&factor).map(|(q, f)| q * f))
        .collect();

    debug!(variable = rate.name(), cells = factor.len(), "rate converted to depth");
    Ok(rate
        .rebuilt(rate.times().to_vec(), values)?
        .with_attribute("units", DEPTH_UNITS))
}
