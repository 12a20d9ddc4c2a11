//! # Constants and type definitions for drift-pt
//!
//! Default identifiers, column names and type aliases shared by the readers,
//! the starting-point table and the Pt computation.

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Particle identifier as stored in the `trajectory` column
pub type TrajectoryId = i64;

// -------------------------------------------------------------------------------------------------
// Defaults
// -------------------------------------------------------------------------------------------------

/// Default coordinate reference system (WGS84 geographic)
pub const DEFAULT_CRS: &str = "epsg:4326";

/// Default name of the time column / dimension
pub const DEFAULT_TIME_FIELD: &str = "time";

/// Default name of the particle identifier column
pub const DEFAULT_TRAJECTORY_FIELD: &str = "trajectory";

/// Default name of the longitude column / variable
pub const DEFAULT_LON_FIELD: &str = "lon";

/// Default name of the latitude column / variable
pub const DEFAULT_LAT_FIELD: &str = "lat";

/// Default number of rows decoded per Parquet record batch
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Longitude above which a [0, 360) value is shifted into [-180, 0)
pub const LON_WRAP: Degree = 180.0;

/// Full turn in degrees
pub const FULL_TURN: Degree = 360.0;
