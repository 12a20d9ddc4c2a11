//! # Coordinate reference system tag
//!
//! [`Crs`] is the identifier attached to a [`StartingPoints`](crate::starting_points::StartingPoints)
//! table. It is a label only: coordinates are never reprojected, the only transformation applied
//! by this crate is the longitude wrap of [`lon360_to_lon180`](crate::conversion::lon360_to_lon180).
//!
//! Identifiers are written `authority:code`, e.g. `epsg:4326`. The authority is matched case
//! insensitively and normalized to upper case.
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_CRS;
use crate::drift_errors::DriftError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Crs {
    authority: String,
    code: u32,
}

impl Crs {
    /// Parse an `authority:code` identifier.
    ///
    /// Arguments
    /// -----------------
    /// * `crs`: identifier such as `"epsg:4326"` or `"EPSG:3857"`.
    ///
    /// Return
    /// ----------
    /// * The parsed [`Crs`], or [`DriftError::InvalidCrs`] when the authority is empty or the code
    ///   is not a positive integer.
    pub fn parse(crs: &str) -> Result<Self, DriftError> {
        let invalid = || DriftError::InvalidCrs(crs.to_string());

        let (authority, code) = crs.trim().split_once(':').ok_or_else(invalid)?;
        let authority = authority.trim();
        if authority.is_empty() || !authority.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        let code: u32 = code.trim().parse().map_err(|_| invalid())?;
        if code == 0 {
            return Err(invalid());
        }

        Ok(Crs {
            authority: authority.to_ascii_uppercase(),
            code,
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    /// WGS84 geographic coordinates.
    pub fn wgs84() -> Self {
        Crs {
            authority: "EPSG".to_string(),
            code: 4326,
        }
    }
}

impl Default for Crs {
    fn default() -> Self {
        Crs::parse(DEFAULT_CRS).unwrap_or_else(|_| Crs::wgs84())
    }
}

impl FromStr for Crs {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crs::parse(s)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}
