use crate::constants::{Degree, FULL_TURN, LON_WRAP};

/// Convert a longitude from the [0, 360) convention to [-180, 180).
///
/// Values in [0, 180] are returned unchanged, values above 180 are shifted down by a full turn.
///
/// Arguments
/// ---------
/// * `lon`: longitude in degrees, [0, 360) convention
///
/// Return
/// ------
/// * the same longitude in the [-180, 180) convention
#[inline]
pub fn lon360_to_lon180(lon: Degree) -> Degree {
    if lon > LON_WRAP {
        lon - FULL_TURN
    } else {
        lon
    }
}

/// In-place version of [`lon360_to_lon180`] over a longitude column.
pub fn lon360_to_lon180_slice(lons: &mut [Degree]) {
    lons.iter_mut().for_each(|lon| *lon = lon360_to_lon180(*lon));
}

#[cfg(test)]
mod conversion_test {
    use super::*;

    #[test]
    fn test_western_hemisphere_unchanged() {
        for lon in [0.0, 0.5, 45.0, 179.999, 180.0] {
            assert_eq!(lon360_to_lon180(lon), lon);
        }
    }

    #[test]
    fn test_eastern_half_shifted() {
        for lon in [180.001, 190.0, 270.0, 359.0, 359.999] {
            let converted = lon360_to_lon180(lon);
            assert_eq!(converted, lon - 360.0);
            assert!(converted > -180.0 && converted < 0.0);
        }
    }

    #[test]
    fn test_slice_conversion() {
        let mut lons = vec![10.0, 190.0, 359.0];
        lon360_to_lon180_slice(&mut lons);
        assert_eq!(lons, vec![10.0, -170.0, -1.0]);
    }
}
