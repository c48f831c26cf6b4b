//! Spatial reduction: collapse `(lat, lon)` to one value per timestep.

use tracing::debug;

use crate::error::AggregateError;
use crate::grid::Grid;
use crate::method::Method;
use crate::series::Series;

/// Reduces every timestep of `grid` over its spatial axes, skipping NaN
/// cells. A timestep whose cells are all NaN yields NaN.
///
/// The returned series is keyed by the grid name; callers rekey it.
///
/// # Errors
///
/// - [`AggregateError::MissingDimensions`] if the grid lacks a `lat` or
///   `lon` axis.
/// - [`AggregateError::EmptyInput`] if the grid has no timesteps.
pub fn reduce_spatial(grid: &Grid, method: Method) -> Result<Series, AggregateError> {
    let names = [grid.y().name(), grid.x().name()];
    if !names.contains(&"lat") || !names.contains(&"lon") {
        return Err(AggregateError::MissingDimensions {
            found: grid.dim_names(),
        });
    }
    if grid.n_times() == 0 {
        return Err(AggregateError::EmptyInput);
    }

    let values: Vec<f64> = (0..grid.n_times())
        .map(|t| method.apply(grid.step(t)))
        .collect();
    debug!(
        variable = grid.name(),
        method = %method,
        steps = values.len(),
        "spatial reduction"
    );
    Series::new(grid.name(), grid.times().to_vec(), values)
}
