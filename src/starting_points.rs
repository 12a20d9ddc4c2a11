//! # Starting points of a drift simulation
//!
//! [`StartingPoints`] is the geometry-augmented table of particle release positions: one row per
//! particle, with its id, longitude, latitude and a [`geo::Point`] geometry, tagged with a
//! [`Crs`].
//!
//! Invariants
//! -----------------
//! * All columns have the same length, equal to the particle count at the first time step.
//! * Every coordinate pair is finite.
//! * Row `i` of every column describes the same particle; the order is the reader's particle order.
//!
//! ## See also
//! ------------
//! * [`read_initial_positions`](crate::simulation::read_initial_positions) – Source of the raw positions.
//! * [`lon360_to_lon180_slice`] – Longitude convention conversion applied on request.
use geo::{BoundingRect, MultiPoint, Point, Rect};
use nalgebra::MatrixXx2;

use crate::constants::{Degree, TrajectoryId};
use crate::conversion::lon360_to_lon180_slice;
use crate::crs::Crs;
use crate::drift_errors::{DataAccessError, DriftError};
use crate::simulation::InitialPositions;

/// One row of a [`StartingPoints`] table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartingPoint {
    pub trajectory: TrajectoryId,
    pub lon: Degree,
    pub lat: Degree,
    pub geometry: Point<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartingPoints {
    crs: Crs,
    trajectory: Vec<TrajectoryId>,
    lon: Vec<Degree>,
    lat: Vec<Degree>,
    geometry: Vec<Point<f64>>,
}

impl StartingPoints {
    /// Build the table from raw first-step positions.
    ///
    /// Arguments
    /// -----------------
    /// * `positions` – particle ids and coordinates in particle order.
    /// * `crs` – reference system tag of the table.
    /// * `convert_lon` – remap longitudes from [0, 360) to [-180, 180) before building geometries.
    ///
    /// Return
    /// ----------
    /// * The table, or [`DataAccessError::NonFiniteCoordinate`] for the first particle whose
    ///   longitude or latitude is NaN or infinite.
    pub fn from_positions(
        positions: InitialPositions,
        crs: Crs,
        convert_lon: bool,
    ) -> Result<Self, DriftError> {
        let InitialPositions {
            trajectory,
            mut lon,
            lat,
        } = positions;

        if lon.len() != trajectory.len() || lat.len() != trajectory.len() {
            return Err(DataAccessError::MalformedVariable(
                "lon/lat".to_string(),
                format!(
                    "{} particle ids for {} longitudes and {} latitudes",
                    trajectory.len(),
                    lon.len(),
                    lat.len()
                ),
            )
            .into());
        }

        if convert_lon {
            lon360_to_lon180_slice(&mut lon);
        }

        let geometry = trajectory
            .iter()
            .zip(lon.iter().zip(&lat))
            .map(|(&id, (&x, &y))| {
                if x.is_finite() && y.is_finite() {
                    Ok(Point::new(x, y))
                } else {
                    Err(DataAccessError::NonFiniteCoordinate {
                        trajectory: id,
                        lon: x,
                        lat: y,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StartingPoints {
            crs,
            trajectory,
            lon,
            lat,
            geometry,
        })
    }

    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn trajectory(&self) -> &[TrajectoryId] {
        &self.trajectory
    }

    pub fn lon(&self) -> &[Degree] {
        &self.lon
    }

    pub fn lat(&self) -> &[Degree] {
        &self.lat
    }

    pub fn geometry(&self) -> &[Point<f64>] {
        &self.geometry
    }

    pub fn get(&self, row: usize) -> Option<StartingPoint> {
        Some(StartingPoint {
            trajectory: *self.trajectory.get(row)?,
            lon: self.lon[row],
            lat: self.lat[row],
            geometry: self.geometry[row],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = StartingPoint> + '_ {
        (0..self.len()).filter_map(move |row| self.get(row))
    }

    /// Stack the (lon, lat) pairs into an N×2 matrix, one row per particle in table order.
    pub fn locations(&self) -> MatrixXx2<f64> {
        MatrixXx2::from_fn(self.len(), |row, col| match col {
            0 => self.lon[row],
            _ => self.lat[row],
        })
    }

    /// All geometries as a single multipoint layer.
    pub fn to_multipoint(&self) -> MultiPoint<f64> {
        MultiPoint::new(self.geometry.clone())
    }

    /// Bounding box of the release positions, `None` for an empty table.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.to_multipoint().bounding_rect()
    }
}
