//! Low-level NetCDF extraction helpers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use netcdf::AttributeValue;

use crate::error::IoError;

/// Calendars whose dates map one-to-one onto the proleptic Gregorian
/// calendar chrono implements.
const GREGORIAN_CALENDARS: [&str; 3] = ["standard", "gregorian", "proleptic_gregorian"];

/// Resolves the on-disk path: a missing path not ending in `.nc` is retried
/// with `.nc` appended.
pub(crate) fn resolve_path(path: &Path) -> Result<PathBuf, IoError> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if path.extension().is_none_or(|ext| ext != "nc") {
        let mut appended = path.as_os_str().to_owned();
        appended.push(".nc");
        let appended = PathBuf::from(appended);
        if appended.exists() {
            return Ok(appended);
        }
    }
    Err(IoError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if
/// neither the path nor its `.nc` variant exists.
pub(crate) fn open_file(path: &Path) -> Result<(netcdf::File, PathBuf), IoError> {
    let resolved = resolve_path(path)?;
    let file = netcdf::open(&resolved)?;
    Ok((file, resolved))
}

/// A coordinate variable is 1-D and named after its own dimension.
fn is_coordinate(var: &netcdf::Variable<'_>) -> bool {
    let dims = var.dimensions();
    dims.len() == 1 && dims[0].name() == var.name()
}

/// Picks the first variable that is neither excluded nor a coordinate and
/// whose rank is one of `ranks`.
pub(crate) fn select_data_variable<'f>(
    file: &'f netcdf::File,
    exclude: &[String],
    ranks: &[usize],
    path: &Path,
) -> Result<netcdf::Variable<'f>, IoError> {
    let mut found = Vec::new();
    for var in file.variables() {
        let name = var.name();
        found.push(name.clone());
        if exclude.contains(&name) || is_coordinate(&var) {
            continue;
        }
        if ranks.contains(&var.dimensions().len()) {
            return Ok(var);
        }
    }
    Err(IoError::NoDataVariable {
        path: path.to_path_buf(),
        found,
    })
}

/// Read a variable as `f64`, masking `_FillValue` / `missing_value` to NaN
/// and applying `scale_factor` / `add_offset`.
pub(crate) fn read_decoded(var: &netcdf::Variable<'_>) -> Result<Vec<f64>, IoError> {
    let mut data = var.get_values::<f64, _>(..)?;
    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| attr_f64(var, name))
        .collect();
    let scale = attr_f64(var, "scale_factor").unwrap_or(1.0);
    let offset = attr_f64(var, "add_offset").unwrap_or(0.0);

    for v in &mut data {
        if fills.iter().any(|&f| *v == f) {
            *v = f64::NAN;
        } else {
            *v = *v * scale + offset;
        }
    }
    Ok(data)
}

/// Read the coordinate values of dimension `dim`, or `0..len` when the file
/// has no coordinate variable for it.
pub(crate) fn read_axis(file: &netcdf::File, dim: &str, len: usize) -> Result<Vec<f64>, IoError> {
    match file.variable(dim) {
        Some(var) => Ok(var.get_values::<f64, _>(..)?),
        None => Ok((0..len).map(|i| i as f64).collect()),
    }
}

/// String attributes of `var`.
pub(crate) fn string_attributes(var: &netcdf::Variable<'_>) -> BTreeMap<String, String> {
    var.attributes()
        .filter_map(|attr| match attr.value() {
            Ok(AttributeValue::Str(s)) => Some((attr.name().to_string(), s)),
            _ => None,
        })
        .collect()
}

/// Numeric attribute as `f64`; the first element for array attributes.
pub(crate) fn attr_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Ints(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Shorts(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

/// Decode the time coordinate `time_var` into timestamps.
pub(crate) fn read_times(
    file: &netcdf::File,
    time_var: &str,
    path: &Path,
) -> Result<Vec<NaiveDateTime>, IoError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| IoError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units: String = var
        .attribute_value("units")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("time variable '{time_var}' has no 'units' attribute"),
        })?
        .map_err(|e| IoError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| IoError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })?;

    if let Some(Ok(AttributeValue::Str(calendar))) = var.attribute_value("calendar")
        && !GREGORIAN_CALENDARS.contains(&calendar.to_lowercase().as_str())
    {
        return Err(IoError::InvalidTime {
            reason: format!("unsupported calendar '{calendar}'"),
        });
    }

    let (step, base) = parse_time_units(&units)?;
    let offsets = var.get_values::<f64, _>(..)?;
    offsets_to_datetimes(base, step, &offsets)
}

/// Parse CF units of the form `"<unit> since <datetime>"`, returning the
/// length of one unit and the reference instant.
pub(crate) fn parse_time_units(units: &str) -> Result<(TimeDelta, NaiveDateTime), IoError> {
    let invalid = || IoError::InvalidTime {
        reason: format!("unexpected time units format: '{units}'"),
    };
    let (unit, reference) = units.trim().split_once(" since ").ok_or_else(invalid)?;

    let step = match unit.trim().to_lowercase().as_str() {
        "seconds" | "second" | "secs" | "sec" | "s" => TimeDelta::seconds(1),
        "minutes" | "minute" | "mins" | "min" => TimeDelta::minutes(1),
        "hours" | "hour" | "hrs" | "hr" | "h" => TimeDelta::hours(1),
        "days" | "day" | "d" => TimeDelta::days(1),
        _ => return Err(invalid()),
    };

    let mut parts = reference.split_whitespace();
    let date_str = parts.next().ok_or_else(invalid)?;
    let (date_str, time_str) = match date_str.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (date_str, parts.next()),
    };
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| IoError::InvalidTime {
        reason: format!("failed to parse reference date '{date_str}': {e}"),
    })?;
    let time = match time_str.map(|t| t.trim_end_matches('Z')) {
        None | Some("") => chrono::NaiveTime::MIN,
        Some(t) => chrono::NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
            .or_else(|_| chrono::NaiveTime::parse_from_str(t, "%H:%M"))
            .map_err(|e| IoError::InvalidTime {
                reason: format!("failed to parse reference time '{t}': {e}"),
            })?,
    };
    Ok((step, date.and_time(time)))
}

/// Convert numeric offsets into timestamps, rounding to whole seconds.
pub(crate) fn offsets_to_datetimes(
    base: NaiveDateTime,
    step: TimeDelta,
    offsets: &[f64],
) -> Result<Vec<NaiveDateTime>, IoError> {
    let step_secs = step.num_seconds() as f64;
    offsets
        .iter()
        .map(|&offset| {
            let secs = offset * step_secs;
            if !secs.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            base.checked_add_signed(TimeDelta::seconds(secs.round() as i64))
                .ok_or_else(|| IoError::InvalidTime {
                    reason: format!("date overflow adding {offset} x {step} to {base}"),
                })
        })
        .collect()
}
