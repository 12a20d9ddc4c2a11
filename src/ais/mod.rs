//! # AIS vessel-count lookup
//!
//! The Pt computation consumes an AIS product through the [`AisLookup`] trait:
//!
//! * [`AisLookup::tree`] – a [`NearestNeighbor`] index over the AIS reference points,
//! * [`AisLookup::vessel_counts`] – the [`VesselCounts`] table those indices point into,
//! * [`AisLookup::date`] – the reference month of the counts.
//!
//! How an AIS product is gridded and counted is outside this crate. [`AisData`] is a plain
//! in-memory implementation for callers that already hold reference points and counts.
//!
//! ```rust
//! use drift_pt::ais::{AisData, AisLookup};
//! use drift_pt::time::AisDate;
//!
//! let ais = AisData::new(
//!     vec![[-170.0, 52.0], [-165.0, 54.0]],
//!     vec![3.0, 40.0],
//!     AisDate::new(2021, 2).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(ais.date().days_in_month().unwrap(), 28);
//! ```
use crate::drift_errors::{ConsistencyError, DriftError};
use crate::time::AisDate;

pub mod spatial_index;

pub use spatial_index::{NearestNeighbor, RTreeIndex};

/// Positional table of vessel counts, one entry per AIS reference point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VesselCounts {
    counts: Vec<f64>,
}

impl VesselCounts {
    /// Wrap a counts column.
    ///
    /// Return
    /// ----------
    /// * [`ConsistencyError::InvalidCount`] if a count is negative, NaN or infinite.
    pub fn new(counts: Vec<f64>) -> Result<Self, DriftError> {
        if let Some((position, &value)) = counts
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite() || **c < 0.0)
        {
            return Err(ConsistencyError::InvalidCount { position, value }.into());
        }
        Ok(VesselCounts { counts })
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Positional lookup of several rows.
    ///
    /// Return
    /// ----------
    /// * The counts at `positions`, in the same order, or
    ///   [`ConsistencyError::IndexOutOfBounds`] for the first position past the end of the table.
    pub fn iloc(&self, positions: &[usize]) -> Result<Vec<f64>, DriftError> {
        positions
            .iter()
            .map(|&index| {
                self.counts.get(index).copied().ok_or_else(|| {
                    DriftError::from(ConsistencyError::IndexOutOfBounds {
                        index,
                        len: self.counts.len(),
                    })
                })
            })
            .collect()
    }
}

impl TryFrom<Vec<f64>> for VesselCounts {
    type Error = DriftError;

    fn try_from(counts: Vec<f64>) -> Result<Self, Self::Error> {
        VesselCounts::new(counts)
    }
}

/// AIS collaborator consumed by [`DriftResult::compute_pt`](crate::drift_result::DriftResult::compute_pt).
///
/// Implementations are read-only during a query; sharing one across threads only requires the
/// tree to be `Sync`.
pub trait AisLookup {
    type Tree: NearestNeighbor;

    fn tree(&self) -> &Self::Tree;

    fn vessel_counts(&self) -> &VesselCounts;

    fn date(&self) -> AisDate;
}

/// In-memory AIS product: a nearest-neighbor tree, its counts table and the reference month.
#[derive(Debug, Clone)]
pub struct AisData<T: NearestNeighbor = RTreeIndex> {
    tree: T,
    vessel_counts: VesselCounts,
    date: AisDate,
}

impl AisData<RTreeIndex> {
    /// Build an R-tree over `locations` (`[lon, lat]` pairs) and attach `counts` position-wise.
    ///
    /// Return
    /// ----------
    /// * [`ConsistencyError::LengthMismatch`] if the two tables differ in length,
    ///   [`ConsistencyError::InvalidLocation`] for a NaN or infinite location, or
    ///   [`ConsistencyError::InvalidCount`] for an invalid count.
    pub fn new(
        locations: Vec<[f64; 2]>,
        counts: Vec<f64>,
        date: AisDate,
    ) -> Result<Self, DriftError> {
        if locations.len() != counts.len() {
            return Err(ConsistencyError::LengthMismatch {
                expected: locations.len(),
                found: counts.len(),
            }
            .into());
        }
        Ok(AisData {
            tree: RTreeIndex::new(&locations)?,
            vessel_counts: VesselCounts::new(counts)?,
            date,
        })
    }
}

impl<T: NearestNeighbor> AisData<T> {
    /// Assemble from an existing tree. No consistency check is done between `tree` and
    /// `vessel_counts`; a mismatch surfaces when Pt is computed.
    pub fn from_parts(tree: T, vessel_counts: VesselCounts, date: AisDate) -> Self {
        AisData {
            tree,
            vessel_counts,
            date,
        }
    }
}

impl<T: NearestNeighbor> AisLookup for AisData<T> {
    type Tree = T;

    fn tree(&self) -> &T {
        &self.tree
    }

    fn vessel_counts(&self) -> &VesselCounts {
        &self.vessel_counts
    }

    fn date(&self) -> AisDate {
        self.date
    }
}

#[cfg(test)]
mod ais_test {
    use super::*;

    #[test]
    fn test_iloc() {
        let counts = VesselCounts::new(vec![0.0, 14.0, 56.0]).unwrap();
        assert_eq!(counts.iloc(&[2, 0, 2]).unwrap(), vec![56.0, 0.0, 56.0]);
        assert_eq!(
            counts.iloc(&[1, 3]),
            Err(DriftError::Consistency(ConsistencyError::IndexOutOfBounds {
                index: 3,
                len: 3
            }))
        );
    }

    #[test]
    fn test_invalid_counts() {
        assert_eq!(
            VesselCounts::new(vec![1.0, -2.0]),
            Err(DriftError::Consistency(ConsistencyError::InvalidCount {
                position: 1,
                value: -2.0
            }))
        );
        assert!(VesselCounts::try_from(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_invalid_location_rejected() {
        let date = AisDate::new(2021, 2).unwrap();
        let err = AisData::new(
            vec![[f64::NAN, 0.0], [1.0, 1.0], [2.0, 2.0], [50.0, 50.0]],
            vec![1.0, 2.0, 3.0, 4.0],
            date,
        )
        .unwrap_err();
        assert!(err.is_consistency());
        assert!(matches!(
            err,
            DriftError::Consistency(ConsistencyError::InvalidLocation { position: 0, .. })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let date = AisDate::new(2021, 2).unwrap();
        let err = AisData::new(vec![[0.0, 0.0]], vec![1.0, 2.0], date).unwrap_err();
        assert_eq!(
            err,
            DriftError::Consistency(ConsistencyError::LengthMismatch {
                expected: 1,
                found: 2
            })
        );
    }
}
