use hifitime::{Epoch, Unit};
use std::fmt;

use crate::drift_errors::DriftError;

/// Reference month of an AIS vessel-count product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AisDate {
    pub year: i32,
    pub month: u8,
}

impl AisDate {
    /// Build a reference date, checking that `month` lies in 1..=12.
    pub fn new(year: i32, month: u8) -> Result<Self, DriftError> {
        if !(1..=12).contains(&month) {
            return Err(DriftError::InvalidDate { year, month });
        }
        Ok(AisDate { year, month })
    }

    /// Year and month of an epoch, read in the UTC scale.
    pub fn from_epoch(epoch: Epoch) -> Self {
        let (year, month, ..) = epoch.to_gregorian_utc();
        AisDate { year, month }
    }

    /// First instant of the month (UTC midnight of day 1).
    ///
    /// The fields are public, so a date built by hand is checked again here.
    pub fn start_epoch(&self) -> Result<Epoch, DriftError> {
        midnight_first_day(self.year, self.month)
    }

    /// Number of calendar days in the month, leap years included.
    ///
    /// Return
    /// ------
    /// * 28, 29, 30 or 31, or [`DriftError::InvalidDate`] when `month` is outside 1..=12.
    pub fn days_in_month(&self) -> Result<u32, DriftError> {
        let start = self.start_epoch()?;
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        let next = midnight_first_day(next_year, next_month)?;
        Ok((next - start).to_unit(Unit::Day).round() as u32)
    }
}

impl fmt::Display for AisDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

fn midnight_first_day(year: i32, month: u8) -> Result<Epoch, DriftError> {
    if !(1..=12).contains(&month) {
        return Err(DriftError::InvalidDate { year, month });
    }
    Epoch::maybe_from_gregorian_utc(year, month, 1, 0, 0, 0, 0)
        .map_err(|_| DriftError::InvalidDate { year, month })
}

/// Parse a date string into seconds since the Unix epoch (UTC).
///
/// Accepts anything [`Epoch`] parses from a string (e.g. `2021-02-01T00:00:00 UTC`).
pub(crate) fn date_str_to_unix_seconds(date: &str) -> Option<f64> {
    date.trim()
        .parse::<Epoch>()
        .ok()
        .map(|epoch| epoch.to_unix_seconds())
}
