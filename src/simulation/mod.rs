//! # Simulation output: first time step extraction
//!
//! Readers that open a drift simulation artifact, select its **first** time step and return one
//! position per particle as [`InitialPositions`]. The artifact is opened, read, and closed inside
//! [`read_initial_positions`]; no handle outlives the call.
//!
//! Supported layouts
//! -----------------
//! * [`parquet_reader`](crate::simulation::parquet_reader) – long-format Apache Parquet table
//!   (`time`, `trajectory`, `lon`, `lat`).
//! * [`csv_reader`](crate::simulation::csv_reader) – the same long format as CSV text.
//! * `netcdf_reader` *(feature `netcdf`)* – gridded `lon(trajectory, time)` / `lat(trajectory, time)`
//!   variables as written by drift models.
//!
//! For the long formats, the first time step is the minimum `time` value present in the table and
//! particle order is ascending `trajectory` id. Rows with a missing time are skipped.
use camino::Utf8Path;
use itertools::Itertools;
use tracing::{debug, warn};

use crate::config::ReaderConfig;
use crate::constants::TrajectoryId;
use crate::drift_errors::{DataAccessError, DriftError};

pub mod csv_reader;
#[cfg(feature = "netcdf")]
pub mod netcdf_reader;
pub mod parquet_reader;

/// On-disk layout of a simulation artifact, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationFormat {
    Parquet,
    Csv,
    NetCdf,
}

impl SimulationFormat {
    /// Infer the format from the file extension (case insensitive).
    ///
    /// Return
    /// ----------
    /// * The matching [`SimulationFormat`], or [`DataAccessError::UnsupportedFormat`].
    pub fn from_path(path: &Utf8Path) -> Result<Self, DriftError> {
        let ext = path.extension().map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("parquet") | Some("pq") => Ok(SimulationFormat::Parquet),
            Some("csv") => Ok(SimulationFormat::Csv),
            Some("nc") | Some("nc4") | Some("netcdf") => Ok(SimulationFormat::NetCdf),
            _ => Err(DataAccessError::UnsupportedFormat(path.to_string()).into()),
        }
    }
}

/// Particle positions at the first time step, in particle order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InitialPositions {
    pub trajectory: Vec<TrajectoryId>,
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
}

impl InitialPositions {
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }
}

/// Open `path`, select the first time step and return the particle positions.
///
/// Arguments
/// -----------------
/// * `path` – simulation artifact; its extension selects the reader.
/// * `config` – column / variable names and batch size.
///
/// Return
/// ----------
/// * The [`InitialPositions`] or a [`DataAccessError`] wrapped into [`DriftError`].
pub fn read_initial_positions(
    path: &Utf8Path,
    config: &ReaderConfig,
) -> Result<InitialPositions, DriftError> {
    let format = SimulationFormat::from_path(path)?;
    debug!(%path, ?format, "reading first time step of simulation output");

    let positions = match format {
        SimulationFormat::Parquet => parquet_reader::read_parquet(path, config)?,
        SimulationFormat::Csv => csv_reader::read_csv(path, config)?,
        #[cfg(feature = "netcdf")]
        SimulationFormat::NetCdf => netcdf_reader::read_netcdf(path, config)?,
        #[cfg(not(feature = "netcdf"))]
        SimulationFormat::NetCdf => {
            return Err(DataAccessError::UnsupportedFormat(format!(
                "{path} (NetCDF support requires the `netcdf` feature)"
            ))
            .into())
        }
    };

    debug!(particles = positions.len(), "first time step extracted");
    Ok(positions)
}

/// Streaming selection of the rows at the minimum time value of a long-format table.
///
/// Rows are pushed in file order; only the rows sharing the smallest time seen so far are
/// retained, so memory stays proportional to the particle count.
#[derive(Debug, Default)]
pub(crate) struct FirstStepCollector {
    first_time: Option<f64>,
    rows: InitialPositions,
    skipped: usize,
}

impl FirstStepCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, time: f64, trajectory: TrajectoryId, lon: f64, lat: f64) {
        if time.is_nan() {
            self.skipped += 1;
            return;
        }

        match self.first_time {
            Some(t0) if time > t0 => return,
            Some(t0) if time < t0 => {
                self.rows.trajectory.clear();
                self.rows.lon.clear();
                self.rows.lat.clear();
                self.first_time = Some(time);
            }
            None => self.first_time = Some(time),
            _ => {}
        }

        self.rows.trajectory.push(trajectory);
        self.rows.lon.push(lon);
        self.rows.lat.push(lat);
    }

    /// Order the retained rows by particle id and check that each particle appears once.
    pub(crate) fn finish(self) -> Result<InitialPositions, DriftError> {
        if self.skipped > 0 {
            warn!(rows = self.skipped, "skipped rows without a time value");
        }
        if self.rows.is_empty() {
            return Err(DataAccessError::EmptyDataset.into());
        }

        let rows = self.rows;
        let order = (0..rows.len())
            .sorted_by_key(|&i| rows.trajectory[i])
            .collect_vec();

        if let Some((a, _)) = order
            .iter()
            .tuple_windows()
            .find(|&(&a, &b)| rows.trajectory[a] == rows.trajectory[b])
        {
            return Err(DataAccessError::DuplicateParticle(rows.trajectory[*a]).into());
        }

        Ok(InitialPositions {
            trajectory: order.iter().map(|&i| rows.trajectory[i]).collect(),
            lon: order.iter().map(|&i| rows.lon[i]).collect(),
            lat: order.iter().map(|&i| rows.lat[i]).collect(),
        })
    }
}
