//! # Reader and extraction options
//!
//! Both option structs derive [`serde::Deserialize`] with field-level defaults, so a caller can
//! embed them in its own configuration file and only spell out what differs from the defaults:
//!
//! ```rust
//! use drift_pt::config::StartingPointOptions;
//!
//! let opts = StartingPointOptions::default();
//! assert!(opts.convert_lon);
//! assert_eq!(opts.crs, "epsg:4326");
//! ```
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CRS, DEFAULT_LAT_FIELD, DEFAULT_LON_FIELD, DEFAULT_TIME_FIELD,
    DEFAULT_TRAJECTORY_FIELD,
};

/// Column/variable names and decoding parameters of the simulation artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Time column (tables) or time dimension (NetCDF)
    pub time: String,
    /// Particle identifier column; unused for NetCDF where particle order is the dimension order
    pub trajectory: String,
    pub lon: String,
    pub lat: String,
    /// Rows per Parquet record batch
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            time: DEFAULT_TIME_FIELD.to_string(),
            trajectory: DEFAULT_TRAJECTORY_FIELD.to_string(),
            lon: DEFAULT_LON_FIELD.to_string(),
            lat: DEFAULT_LAT_FIELD.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Options forwarded to starting-point extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingPointOptions {
    /// Coordinate reference system tag of the resulting table
    pub crs: String,
    /// Remap longitudes from [0, 360) to [-180, 180)
    pub convert_lon: bool,
}

impl Default for StartingPointOptions {
    fn default() -> Self {
        StartingPointOptions {
            crs: DEFAULT_CRS.to_string(),
            convert_lon: true,
        }
    }
}

impl StartingPointOptions {
    pub fn new(crs: impl Into<String>, convert_lon: bool) -> Self {
        StartingPointOptions {
            crs: crs.into(),
            convert_lon,
        }
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_partial_reader_config() {
        let cfg: ReaderConfig =
            serde_json::from_str(r#"{"lon": "longitude", "batch_size": 16}"#).unwrap();
        assert_eq!(cfg.lon, "longitude");
        assert_eq!(cfg.lat, "lat");
        assert_eq!(cfg.time, "time");
        assert_eq!(cfg.batch_size, 16);
    }

    #[test]
    fn test_empty_options_use_defaults() {
        let opts: StartingPointOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, StartingPointOptions::default());

        let opts: StartingPointOptions =
            serde_json::from_str(r#"{"convert_lon": false}"#).unwrap();
        assert!(!opts.convert_lon);
        assert_eq!(opts.crs, "epsg:4326");
    }
}
