pub mod ais;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod crs;
pub mod drift_errors;
pub mod drift_result;
pub mod simulation;
pub mod starting_points;
pub mod time;

pub use ais::{AisData, AisLookup, NearestNeighbor, RTreeIndex, VesselCounts};
pub use config::{ReaderConfig, StartingPointOptions};
pub use drift_errors::{ConsistencyError, DataAccessError, DriftError};
pub use drift_result::{vessel_presence_probability, DriftResult, PtTable};
pub use starting_points::StartingPoints;
pub use time::AisDate;
