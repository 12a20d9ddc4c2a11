//! # Drift results and vessel presence probability (Pt)
//!
//! [`DriftResult`] wraps the path to a stored drift simulation and derives, for each particle,
//! **Pt**: the probability that a vessel was at the particle's release point during the AIS
//! reference month.
//!
//! ## Algorithm
//! -----------------
//! 1. Extract the starting points (first time step, optional longitude wrap).
//! 2. Stack the `(lon, lat)` pairs into an N×2 matrix, keeping particle order.
//! 3. Query the AIS nearest-neighbor tree once per particle and look up the vessel count of the
//!    closest AIS reference point.
//! 4. Count the calendar days of the AIS reference month.
//! 5. `pt = count / days`, saturated at 1: more vessel-days than calendar days means certainty.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use drift_pt::ais::AisData;
//! use drift_pt::config::StartingPointOptions;
//! use drift_pt::drift_result::DriftResult;
//! use drift_pt::time::AisDate;
//!
//! let ais = AisData::new(
//!     vec![[-170.0, 52.0], [-165.0, 54.0]],
//!     vec![3.0, 40.0],
//!     AisDate::new(2021, 2).unwrap(),
//! )
//! .unwrap();
//!
//! let result = DriftResult::new("runs/aleutian_2021_02.parquet");
//! let pt = result.compute_pt(&ais, &StartingPointOptions::default()).unwrap();
//! ```
//!
//! ## Errors
//! -----------------
//! * Reading problems surface as [`DataAccessError`](crate::drift_errors::DataAccessError).
//! * An AIS tree returning positions outside its count table surfaces as
//!   [`ConsistencyError`].
//!
//! No state is kept between calls: the artifact is reopened by every extraction.
use camino::{Utf8Path, Utf8PathBuf};
use itertools::izip;
use tracing::info;

use crate::ais::{AisLookup, NearestNeighbor};
use crate::config::{ReaderConfig, StartingPointOptions};
use crate::crs::Crs;
use crate::drift_errors::{ConsistencyError, DriftError};
use crate::simulation::read_initial_positions;
use crate::starting_points::{StartingPoint, StartingPoints};

/// Pt from looked-up vessel counts: `count / days_in_month`, clamped to 1.
///
/// Arguments
/// ---------
/// * `counts`: vessel count at each release point
/// * `days_in_month`: calendar days of the AIS reference month
///
/// Return
/// ------
/// * one probability per count, same order
pub fn vessel_presence_probability(counts: &[f64], days_in_month: u32) -> Vec<f64> {
    let days = f64::from(days_in_month);
    counts
        .iter()
        .map(|&count| {
            let pt = count / days;
            if pt > 1.0 {
                1.0
            } else {
                pt
            }
        })
        .collect()
}

/// Joined per-particle view of a Pt computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PtTable {
    pub starting_points: StartingPoints,
    /// Position of the nearest AIS reference point
    pub ais_index: Vec<usize>,
    /// Distance to the nearest AIS reference point, in degrees
    pub distance: Vec<f64>,
    pub vessel_count: Vec<f64>,
    pub pt: Vec<f64>,
}

/// One particle of a [`PtTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePt {
    pub point: StartingPoint,
    pub ais_index: usize,
    pub distance: f64,
    pub vessel_count: f64,
    pub pt: f64,
}

impl PtTable {
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ParticlePt> + '_ {
        izip!(
            self.starting_points.iter(),
            &self.ais_index,
            &self.distance,
            &self.vessel_count,
            &self.pt
        )
        .map(|(point, &ais_index, &distance, &vessel_count, &pt)| ParticlePt {
            point,
            ais_index,
            distance,
            vessel_count,
            pt,
        })
    }
}

/// A stored drift simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftResult {
    path: Utf8PathBuf,
    reader_config: ReaderConfig,
}

impl DriftResult {
    /// Reference a simulation artifact. Nothing is read until an extraction is requested.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self::with_reader_config(path, ReaderConfig::default())
    }

    /// Same as [`DriftResult::new`] with non-default column names or batch size.
    pub fn with_reader_config(path: impl Into<Utf8PathBuf>, reader_config: ReaderConfig) -> Self {
        DriftResult {
            path: path.into(),
            reader_config,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn reader_config(&self) -> &ReaderConfig {
        &self.reader_config
    }

    /// Starting points of the simulation as a geometry-augmented table.
    ///
    /// Arguments
    /// -----------------
    /// * `options` – CRS tag and longitude conversion flag.
    ///
    /// Return
    /// ----------
    /// * One row per particle at the first time step, or
    ///   [`DriftError::InvalidCrs`] / a [`DataAccessError`](crate::drift_errors::DataAccessError).
    pub fn starting_points(
        &self,
        options: &StartingPointOptions,
    ) -> Result<StartingPoints, DriftError> {
        let crs = Crs::parse(&options.crs)?;
        let positions = read_initial_positions(&self.path, &self.reader_config)?;
        StartingPoints::from_positions(positions, crs, options.convert_lon)
    }

    /// Full per-particle join of starting points, nearest AIS point, vessel count and Pt.
    ///
    /// See also
    /// ------------
    /// * [`DriftResult::compute_pt`] – Pt column only.
    pub fn pt_table<A: AisLookup>(
        &self,
        ais: &A,
        options: &StartingPointOptions,
    ) -> Result<PtTable, DriftError> {
        let starting_points = self.starting_points(options)?;
        let locs = starting_points.locations();

        let (distance, ais_index) = ais.tree().query(&locs)?;
        if let Some(found) = [ais_index.len(), distance.len()]
            .into_iter()
            .find(|&len| len != starting_points.len())
        {
            return Err(ConsistencyError::LengthMismatch {
                expected: starting_points.len(),
                found,
            }
            .into());
        }
        let vessel_count = ais.vessel_counts().iloc(&ais_index)?;

        let date = ais.date();
        let days = date.days_in_month()?;
        let pt = vessel_presence_probability(&vessel_count, days);

        info!(
            path = %self.path,
            particles = pt.len(),
            month = %date,
            days,
            "computed vessel presence probability"
        );

        Ok(PtTable {
            starting_points,
            ais_index,
            distance,
            vessel_count,
            pt,
        })
    }

    /// Pt for every particle, in starting-point order, each value in [0, 1].
    ///
    /// Arguments
    /// -----------------
    /// * `ais` – AIS collaborator providing the tree, counts and reference month.
    /// * `options` – forwarded to [`DriftResult::starting_points`].
    ///
    /// Return
    /// ----------
    /// * The Pt column, or the first error met: extraction failures are
    ///   [`DataAccessError`](crate::drift_errors::DataAccessError)s, an index out of the count
    ///   table is a [`ConsistencyError`], and a reference month outside 1..=12 is
    ///   [`DriftError::InvalidDate`].
    pub fn compute_pt<A: AisLookup>(
        &self,
        ais: &A,
        options: &StartingPointOptions,
    ) -> Result<Vec<f64>, DriftError> {
        self.pt_table(ais, options).map(|table| table.pt)
    }
}

#[cfg(test)]
mod drift_result_test {
    use super::*;

    #[test]
    fn test_probability_saturates() {
        let pt = vessel_presence_probability(&[0.0, 14.0, 28.0, 56.0, 29.0], 28);
        assert_eq!(pt, vec![0.0, 0.5, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_probability_in_unit_interval() {
        let counts: Vec<f64> = (0..200).map(|c| c as f64 * 0.37).collect();
        for days in [28, 29, 30, 31] {
            let pt = vessel_presence_probability(&counts, days);
            assert_eq!(pt.len(), counts.len());
            assert!(pt.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_new_is_lazy() {
        let result = DriftResult::new("does/not/exist.parquet");
        assert_eq!(result.path(), Utf8Path::new("does/not/exist.parquet"));
        assert_eq!(result.reader_config(), &ReaderConfig::default());
    }
}
