use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::config::ReaderConfig;
use crate::constants::TrajectoryId;
use crate::drift_errors::{DataAccessError, DriftError};
use crate::simulation::{FirstStepCollector, InitialPositions};
use crate::time::date_str_to_unix_seconds;

fn field_index(headers: &StringRecord, name: &str) -> Result<usize, DriftError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataAccessError::MissingField(name.to_string()).into())
}

fn invalid_value(field: &str, row: usize, value: &str) -> DriftError {
    DataAccessError::InvalidValue {
        field: field.to_string(),
        row,
        value: value.to_string(),
    }
    .into()
}

/// Coordinate cell: empty means missing (NaN).
fn parse_coordinate(value: &str, field: &str, row: usize) -> Result<f64, DriftError> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value
        .parse::<f64>()
        .map_err(|_| invalid_value(field, row, value))
}

/// Time cell: a number, or a date string converted to Unix seconds. Empty means missing (NaN).
fn parse_time(value: &str, field: &str, row: usize) -> Result<f64, DriftError> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value
        .parse::<f64>()
        .ok()
        .or_else(|| date_str_to_unix_seconds(value))
        .ok_or_else(|| invalid_value(field, row, value))
}

/// Read the first time step of a long-format CSV table.
///
/// The header row must name the `time`, `trajectory`, `lon` and `lat` columns configured in
/// [`ReaderConfig`]; other columns are ignored. Rows are numbered from 0, header excluded.
pub(crate) fn read_csv(
    path: &Utf8Path,
    config: &ReaderConfig,
) -> Result<InitialPositions, DriftError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;

    let headers = reader.headers()?.clone();
    let time_idx = field_index(&headers, &config.time)?;
    let traj_idx = field_index(&headers, &config.trajectory)?;
    let lon_idx = field_index(&headers, &config.lon)?;
    let lat_idx = field_index(&headers, &config.lat)?;

    let mut collector = FirstStepCollector::new();
    let mut n_rows = 0;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or_default();

        let time = parse_time(cell(time_idx), &config.time, row)?;
        let trajectory: TrajectoryId = cell(traj_idx)
            .parse()
            .map_err(|_| invalid_value(&config.trajectory, row, cell(traj_idx)))?;
        let lon = parse_coordinate(cell(lon_idx), &config.lon, row)?;
        let lat = parse_coordinate(cell(lat_idx), &config.lat, row)?;

        collector.push(time, trajectory, lon, lat);
        n_rows += 1;
    }

    debug!(rows = n_rows, "csv simulation output decoded");
    collector.finish()
}

#[cfg(test)]
mod csv_reader_test {
    use super::*;
    use camino::Utf8PathBuf;

    fn write_csv(dir: &tempfile::TempDir, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("sim.csv")).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_date_strings_and_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "trajectory,time,status,lon,lat\n\
             1,2021-02-01T01:00:00 UTC,0,191.0,54.1\n\
             1,2021-02-01T00:00:00 UTC,0,190.0,54.0\n\
             0,2021-02-01T00:00:00 UTC,0,10.0,53.0\n",
        );

        let positions = read_csv(&path, &ReaderConfig::default()).unwrap();
        assert_eq!(positions.trajectory, vec![0, 1]);
        assert_eq!(positions.lon, vec![10.0, 190.0]);
        assert_eq!(positions.lat, vec![53.0, 54.0]);
    }

    #[test]
    fn test_renamed_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "t,id,longitude,latitude\n0, 3, 1.5, 2.5\n");
        let config = ReaderConfig {
            time: "t".into(),
            trajectory: "id".into(),
            lon: "longitude".into(),
            lat: "latitude".into(),
            ..ReaderConfig::default()
        };

        let positions = read_csv(&path, &config).unwrap();
        assert_eq!(positions.trajectory, vec![3]);
        assert_eq!(positions.lon, vec![1.5]);
    }

    #[test]
    fn test_invalid_longitude() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "time,trajectory,lon,lat\n0,0,east,2.0\n");

        assert_eq!(
            read_csv(&path, &ReaderConfig::default()),
            Err(DriftError::DataAccess(DataAccessError::InvalidValue {
                field: "lon".to_string(),
                row: 0,
                value: "east".to_string(),
            }))
        );
    }
}
