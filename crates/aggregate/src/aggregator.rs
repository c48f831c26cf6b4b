//! Time-series and grid aggregators built on the two reducers.

use std::collections::BTreeMap;

use lisagg_calendar::Frequency;
use tracing::{debug, error};

use crate::grid::Grid;
use crate::method::Method;
use crate::series::Series;
use crate::spatial::reduce_spatial;
use crate::temporal::resample_grid;

const UNNAMED: &str = "unknown";

/// Reduces `grid` to one scalar series per spatial method.
///
/// The grid is first resampled to `target` with `temporal_method`, so
/// extrema and medians are taken over raw cell values inside each bucket.
/// Keys are `{name}_{spatial}` when the grid is already at `target`, else
/// `{name}_{spatial}_{FREQ}_{temporal}`.
///
/// Returns an empty map when `grid` is `None`. A failing spatial method is
/// logged and left out; the others still run.
pub fn aggregate_to_timeseries(
    grid: Option<&Grid>,
    target: Frequency,
    spatial_methods: &[Method],
    temporal_method: Method,
) -> BTreeMap<String, Series> {
    let mut out = BTreeMap::new();
    let Some(grid) = grid else {
        return out;
    };
    let name = if grid.name().is_empty() {
        UNNAMED
    } else {
        grid.name()
    };

    let resampled = match resample_grid(grid, target, temporal_method) {
        Ok(r) => r,
        Err(e) => {
            error!(variable = name, target = %target, error = %e, "temporal reduction failed");
            return out;
        }
    };

    for &spatial in spatial_methods {
        let key = if resampled.resampled {
            format!("{name}_{spatial}_{}_{temporal_method}", target.code())
        } else {
            format!("{name}_{spatial}")
        };
        match reduce_spatial(&resampled.data, spatial) {
            Ok(series) => {
                out.insert(key.clone(), series.with_key(key));
            }
            Err(e) => {
                error!(
                    variable = name,
                    method = %spatial,
                    error = %e,
                    "spatial reduction failed"
                );
            }
        }
    }
    debug!(variable = name, target = %target, series = out.len(), "time series aggregated");
    out
}

/// Resamples `grid` to `target`, keeping its spatial axes.
///
/// Returns `None` when `grid` is `None` or the reduction fails (the cause
/// is logged). An aggregated grid carries `cell_methods = "time: <method>"`.
pub fn aggregate_to_grid(grid: Option<&Grid>, target: Frequency, method: Method) -> Option<Grid> {
    let grid = grid?;
    match resample_grid(grid, target, method) {
        Ok(r) if r.resampled => Some(
            r.data
                .with_attribute("cell_methods", format!("time: {method}")),
        ),
        Ok(r) => Some(r.data),
        Err(e) => {
            error!(
                variable = grid.name(),
                target = %target,
                error = %e,
                "grid aggregation failed"
            );
            None
        }
    }
}
