//! # Spatial index over AIS reference points
//!
//! [`NearestNeighbor`] is the query contract consumed by the Pt computation: for every row of an
//! N×2 `(lon, lat)` matrix, return the distance to and the position of the closest reference
//! point. [`RTreeIndex`] implements it with an `rstar` R-tree.
//!
//! Distances are planar Euclidean distances in degrees, matching a k-d tree built directly on
//! longitude/latitude pairs. When several reference points are equally close, the one with the
//! lowest position wins, so results do not depend on tree layout.
use nalgebra::MatrixXx2;
use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::drift_errors::{ConsistencyError, DataAccessError, DriftError};

/// Nearest-neighbor query over a fixed set of reference points.
pub trait NearestNeighbor {
    /// Query the closest reference point for each row of `points`.
    ///
    /// Return
    /// ----------
    /// * `(distances, indices)`, both with one entry per query row, in row order. `indices` are
    ///   positions into the reference table the index was built from.
    fn query(&self, points: &MatrixXx2<f64>) -> Result<(Vec<f64>, Vec<usize>), DriftError>;

    /// Number of reference points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree of `(lon, lat)` reference points, each tagged with its position.
#[derive(Debug, Clone)]
pub struct RTreeIndex {
    tree: RTree<IndexedPoint>,
}

impl RTreeIndex {
    /// Bulk-load the reference points; position `i` in `locations` becomes index `i`.
    ///
    /// Return
    /// ----------
    /// * The index, or [`ConsistencyError::InvalidLocation`] for the first location with a NaN or
    ///   infinite coordinate.
    pub fn new(locations: &[[f64; 2]]) -> Result<Self, DriftError> {
        if let Some((position, &[lon, lat])) = locations
            .iter()
            .enumerate()
            .find(|(_, loc)| !loc[0].is_finite() || !loc[1].is_finite())
        {
            return Err(ConsistencyError::InvalidLocation { position, lon, lat }.into());
        }

        let points = locations
            .iter()
            .enumerate()
            .map(|(i, &loc)| GeomWithData::new(loc, i))
            .collect();
        Ok(RTreeIndex {
            tree: RTree::bulk_load(points),
        })
    }

    /// Closest reference point to `(lon, lat)` as `(distance, index)`.
    ///
    /// `None` for an empty index or a non-finite query point.
    pub fn nearest(&self, lon: f64, lat: f64) -> Option<(f64, usize)> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        let mut candidates = self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[lon, lat]);
        let (first, best_d2) = candidates.next()?;

        let index = candidates
            .take_while(|(_, d2)| *d2 == best_d2)
            .map(|(p, _)| p.data)
            .fold(first.data, usize::min);

        Some((best_d2.sqrt(), index))
    }
}

impl NearestNeighbor for RTreeIndex {
    fn query(&self, points: &MatrixXx2<f64>) -> Result<(Vec<f64>, Vec<usize>), DriftError> {
        if self.tree.size() == 0 {
            return Err(ConsistencyError::EmptyIndex.into());
        }

        let (distances, indices) = points
            .row_iter()
            .enumerate()
            .map(|(row, point)| {
                let (lon, lat) = (point[0], point[1]);
                self.nearest(lon, lat).ok_or_else(|| {
                    DriftError::from(DataAccessError::NonFiniteCoordinate {
                        trajectory: row as i64,
                        lon,
                        lat,
                    })
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();

        Ok((distances, indices))
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

#[cfg(test)]
mod spatial_index_test {
    use super::*;
    use approx::assert_relative_eq;

    fn locations(pairs: &[[f64; 2]]) -> MatrixXx2<f64> {
        MatrixXx2::from_fn(pairs.len(), |row, col| pairs[row][col])
    }

    #[test]
    fn test_query_nearest() {
        let index = RTreeIndex::new(&[[0.0, 0.0], [10.0, 10.0], [-170.0, 55.0]]).unwrap();
        let points = locations(&[[1.0, 1.0], [9.0, 12.0], [-171.0, 55.0]]);

        let (distances, indices) = index.query(&points).unwrap();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_relative_eq!(distances[0], 2f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(distances[1], 5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(distances[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ties_pick_lowest_position() {
        let index = RTreeIndex::new(&[[2.0, 0.0], [0.0, 2.0], [-2.0, 0.0], [0.0, -2.0]]).unwrap();
        assert_eq!(index.nearest(0.0, 0.0), Some((2.0, 0)));

        let index = RTreeIndex::new(&[[5.0, 5.0], [1.0, 0.0], [-1.0, 0.0]]).unwrap();
        assert_eq!(index.nearest(0.0, 0.0), Some((1.0, 1)));
    }

    #[test]
    fn test_non_finite_reference_location() {
        let err = RTreeIndex::new(&[[1.0, 1.0], [f64::NAN, 0.0], [2.0, 2.0]]).unwrap_err();
        assert!(matches!(
            err,
            DriftError::Consistency(ConsistencyError::InvalidLocation { position: 1, .. })
        ));

        assert!(RTreeIndex::new(&[[0.0, f64::INFINITY]]).is_err());
    }

    #[test]
    fn test_non_finite_query_point() {
        let index = RTreeIndex::new(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
        assert_eq!(index.nearest(f64::NAN, 1.0), None);

        let points = locations(&[[0.5, 0.5], [1.0, f64::NEG_INFINITY]]);
        assert!(matches!(
            index.query(&points),
            Err(DriftError::DataAccess(DataAccessError::NonFiniteCoordinate {
                trajectory: 1,
                ..
            }))
        ));
    }

    #[test]
    fn test_empty_index() {
        let index = RTreeIndex::new(&[]).unwrap();
        assert!(index.is_empty());
        let points = locations(&[[1.0, 1.0]]);
        assert_eq!(
            index.query(&points),
            Err(DriftError::Consistency(ConsistencyError::EmptyIndex))
        );
    }
}
