//! # lisagg-io
//!
//! Read model output grids from NetCDF, write reduced grids back to NetCDF
//! and scalar series to CSV. Also maps output files to internal variable
//! names and converts `.tss` tables. Bridges the on-disk formats into the
//! [`Grid`](lisagg_aggregate::Grid) / [`Series`](lisagg_aggregate::Series)
//! types of `lisagg-aggregate`.

mod discover;
mod error;
mod netcdf_read;
mod reader;
mod series_csv;
mod tss;
mod writer;

pub use discover::{BindingMatcher, Bindings, discover_variables, wildcard_to_regex};
pub use error::IoError;
pub use reader::{LoaderConfig, load_cell_areas, load_grid};
pub use series_csv::{TIME_FORMAT, read_series_csv, write_series_csv};
pub use tss::{TssTable, convert_tss, list_tss_files, read_tss};
pub use writer::{TIME_UNITS, write_grid};
