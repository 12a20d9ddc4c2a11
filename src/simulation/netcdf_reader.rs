//! # NetCDF reader for gridded simulation output
//!
//! Drift models commonly write `lon` and `lat` as 2-D variables over a particle dimension and a
//! `time` dimension, in either order. This reader loads both variables, takes index 0 along the
//! time dimension and numbers particles by their position along the other dimension.
//!
//! `_FillValue` entries are turned into NaN. A particle dimension of length zero gives an empty
//! set of positions; a time dimension of length zero is [`DataAccessError::EmptyDataset`].
//! Available with the `netcdf` cargo feature only.
use camino::Utf8Path;
use tracing::debug;

use crate::config::ReaderConfig;
use crate::drift_errors::{DataAccessError, DriftError};
use crate::simulation::InitialPositions;

fn fill_value(var: &netcdf::Variable<'_>) -> Option<f64> {
    match var.attribute_value("_FillValue") {
        Some(Ok(netcdf::AttributeValue::Double(v))) => Some(v),
        Some(Ok(netcdf::AttributeValue::Float(v))) => Some(v as f64),
        _ => None,
    }
}

/// Values of variable `name` at index 0 of dimension `time_dim`.
fn first_time_slice(
    file: &netcdf::File,
    name: &str,
    time_dim: &str,
) -> Result<Vec<f64>, DriftError> {
    let var = file
        .variable(name)
        .ok_or_else(|| DataAccessError::MissingField(name.to_string()))?;

    let dims = var.dimensions();
    if dims.len() != 2 {
        return Err(DataAccessError::MalformedVariable(
            name.to_string(),
            format!("expected 2 dimensions, found {}", dims.len()),
        )
        .into());
    }
    let time_axis = dims
        .iter()
        .position(|d| d.name() == time_dim)
        .ok_or_else(|| DataAccessError::MissingField(time_dim.to_string()))?;
    if dims[time_axis].len() == 0 {
        return Err(DataAccessError::EmptyDataset.into());
    }
    let n_cols = dims[1].len();

    let values: Vec<f64> = var.get_values::<f64, _>(..)?;
    let slice: Vec<f64> = if time_axis == 0 {
        values[..n_cols].to_vec()
    } else {
        values.iter().step_by(n_cols.max(1)).copied().collect()
    };

    Ok(match fill_value(&var) {
        Some(fill) => slice
            .into_iter()
            .map(|v| if v == fill { f64::NAN } else { v })
            .collect(),
        None => slice,
    })
}

/// Read the first time step of a NetCDF simulation output.
pub(crate) fn read_netcdf(
    path: &Utf8Path,
    config: &ReaderConfig,
) -> Result<InitialPositions, DriftError> {
    let file = netcdf::open(path.as_std_path())?;

    let lon = first_time_slice(&file, &config.lon, &config.time)?;
    let lat = first_time_slice(&file, &config.lat, &config.time)?;
    if lon.len() != lat.len() {
        return Err(DataAccessError::MalformedVariable(
            config.lat.clone(),
            format!("{} particles, but '{}' has {}", lat.len(), config.lon, lon.len()),
        )
        .into());
    }

    debug!(particles = lon.len(), "netcdf simulation output decoded");
    Ok(InitialPositions {
        trajectory: (0..lon.len() as i64).collect(),
        lon,
        lat,
    })
}
