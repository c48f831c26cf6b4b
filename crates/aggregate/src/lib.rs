//! Spatial and temporal reduction of gridded model output.
//!
//! ```text
//! Grid (time, lat, lon)
//!   ├── resample_grid ──► Grid (coarser time axis)     aggregate_to_grid
//!   │        └── reduce_spatial ──► Series             aggregate_to_timeseries
//!   └── rate_to_depth ──► Grid (mm/day)                discharge depth path
//! ```
//!
//! Every reduction is one of the five [`Method`]s and skips NaN cells.
//! Resampling follows the bucketing rules of [`lisagg_calendar`].
//!
//! # Quick Start
//!
//! ```ignore
//! use lisagg_aggregate::{Method, aggregate_to_timeseries, aggregate_to_grid};
//! use lisagg_calendar::Frequency;
//!
//! let series =
//!     aggregate_to_timeseries(Some(&grid), Frequency::Daily, &[Method::Mean], Method::Sum);
//! let monthly = aggregate_to_grid(Some(&grid), Frequency::Monthly, Method::Sum);
//! ```

pub mod aggregator;
pub mod discharge;
pub mod error;
pub mod grid;
pub mod method;
pub mod series;
pub mod spatial;
pub mod temporal;

pub use aggregator::{aggregate_to_grid, aggregate_to_timeseries};
pub use discharge::{CellAreas, DEPTH_UNITS, MM_PER_M, SECONDS_PER_DAY, rate_to_depth};
pub use error::AggregateError;
pub use grid::{Axis, Grid};
pub use method::Method;
pub use series::Series;
pub use spatial::reduce_spatial;
pub use temporal::{Resampled, resample_grid, resample_series};
