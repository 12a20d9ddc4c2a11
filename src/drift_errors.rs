//! # Error types
//!
//! Two failure families cover the whole crate:
//!
//! * [`DataAccessError`] – the simulation artifact is missing, unreadable, malformed, or lacks
//!   the required fields.
//! * [`ConsistencyError`] – the AIS collaborator is internally inconsistent (its nearest-neighbor
//!   index points outside its vessel-count table, or its counts or reference locations hold
//!   invalid values).
//!
//! Both are wrapped by [`DriftError`], which additionally carries input validation failures
//! (CRS identifier, reference date).
use thiserror::Error;

use crate::constants::TrajectoryId;

#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("Unsupported simulation file format: {0}")]
    UnsupportedFormat(String),

    #[error("Required field '{0}' not found in simulation output")]
    MissingField(String),

    #[error("Field '{field}' has unsupported type {data_type}")]
    InvalidColumnType { field: String, data_type: String },

    #[error("Invalid value '{value}' in field '{field}' at row {row}")]
    InvalidValue {
        field: String,
        row: usize,
        value: String,
    },

    #[error("Malformed variable '{0}': {1}")]
    MalformedVariable(String, String),

    #[error("Simulation output contains no particle at the first time step")]
    EmptyDataset,

    #[error("Particle {0} appears more than once at the first time step")]
    DuplicateParticle(TrajectoryId),

    #[error("Non-finite starting coordinate for particle {trajectory}: lon={lon}, lat={lat}")]
    NonFiniteCoordinate {
        trajectory: TrajectoryId,
        lon: f64,
        lat: f64,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsistencyError {
    #[error("Nearest-neighbor index {index} is out of bounds for a vessel count table of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Length mismatch: expected {expected} entries, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Nearest-neighbor index holds no reference point")]
    EmptyIndex,

    #[error("Invalid vessel count {value} at position {position}")]
    InvalidCount { position: usize, value: f64 },

    #[error("Non-finite AIS reference location at position {position}: [{lon}, {lat}]")]
    InvalidLocation { position: usize, lon: f64, lat: f64 },
}

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Data access error: {0}")]
    DataAccess(#[from] DataAccessError),

    #[error("Consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    #[error("Invalid coordinate reference system: {0}")]
    InvalidCrs(String),

    #[error("Invalid reference date: {year}-{month:02}")]
    InvalidDate { year: i32, month: u8 },
}

impl From<std::io::Error> for DriftError {
    fn from(err: std::io::Error) -> Self {
        DriftError::DataAccess(DataAccessError::Io(err))
    }
}

impl From<parquet::errors::ParquetError> for DriftError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        DriftError::DataAccess(DataAccessError::Parquet(err))
    }
}

impl From<csv::Error> for DriftError {
    fn from(err: csv::Error) -> Self {
        DriftError::DataAccess(DataAccessError::Csv(err))
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for DriftError {
    fn from(err: netcdf::Error) -> Self {
        DriftError::DataAccess(DataAccessError::NetCdf(err))
    }
}

impl DriftError {
    /// `true` when the failure comes from reading the simulation artifact.
    pub fn is_data_access(&self) -> bool {
        matches!(self, DriftError::DataAccess(_))
    }

    /// `true` when the AIS collaborator was found inconsistent.
    pub fn is_consistency(&self) -> bool {
        matches!(self, DriftError::Consistency(_))
    }
}

impl PartialEq for DataAccessError {
    fn eq(&self, other: &Self) -> bool {
        use DataAccessError::*;
        match (self, other) {
            // Wrapped library errors are not comparable: equal if same variant
            (Io(_), Io(_)) => true,
            (Parquet(_), Parquet(_)) => true,
            (Csv(_), Csv(_)) => true,
            #[cfg(feature = "netcdf")]
            (NetCdf(_), NetCdf(_)) => true,

            (UnsupportedFormat(a), UnsupportedFormat(b)) => a == b,
            (MissingField(a), MissingField(b)) => a == b,
            (
                InvalidColumnType {
                    field: f1,
                    data_type: d1,
                },
                InvalidColumnType {
                    field: f2,
                    data_type: d2,
                },
            ) => f1 == f2 && d1 == d2,
            (
                InvalidValue {
                    field: f1,
                    row: r1,
                    value: v1,
                },
                InvalidValue {
                    field: f2,
                    row: r2,
                    value: v2,
                },
            ) => f1 == f2 && r1 == r2 && v1 == v2,
            (MalformedVariable(a1, b1), MalformedVariable(a2, b2)) => a1 == a2 && b1 == b2,
            (EmptyDataset, EmptyDataset) => true,
            (DuplicateParticle(a), DuplicateParticle(b)) => a == b,
            (
                NonFiniteCoordinate {
                    trajectory: t1,
                    lon: lon1,
                    lat: lat1,
                },
                NonFiniteCoordinate {
                    trajectory: t2,
                    lon: lon2,
                    lat: lat2,
                },
            ) => t1 == t2 && lon1.to_bits() == lon2.to_bits() && lat1.to_bits() == lat2.to_bits(),

            _ => false,
        }
    }
}

impl PartialEq for DriftError {
    fn eq(&self, other: &Self) -> bool {
        use DriftError::*;
        match (self, other) {
            (DataAccess(a), DataAccess(b)) => a == b,
            (Consistency(a), Consistency(b)) => a == b,
            (InvalidCrs(a), InvalidCrs(b)) => a == b,
            (
                InvalidDate {
                    year: y1,
                    month: m1,
                },
                InvalidDate {
                    year: y2,
                    month: m2,
                },
            ) => y1 == y2 && m1 == m2,
            _ => false,
        }
    }
}
