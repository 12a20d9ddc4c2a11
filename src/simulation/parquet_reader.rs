//! # Parquet reader for long-format simulation output
//!
//! Column-projected read of a drift simulation table stored as **Apache Parquet**. Only the four
//! columns needed to locate the first time step are materialized:
//!
//! - `time` – any float, integer, or timestamp column. Timestamps are converted to seconds since
//!   the Unix epoch; null times are skipped.
//! - `trajectory` – integer particle id (signed or unsigned, up to 64 bits). Nulls are rejected.
//! - `lon`, `lat` – float or integer coordinates in degrees. Nulls become NaN and are reported
//!   later as non-finite starting coordinates if they fall on the first time step.
//!
//! Column names come from [`ReaderConfig`]. Columns are looked up **by name** in each batch since
//! a projection keeps file schema order, not request order.
use arrow_array::array::{
    Array, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array, Int8Array,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow_array::RecordBatch;
use camino::Utf8Path;
use itertools::izip;
use parquet::arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ProjectionMask};
use parquet::errors::ParquetError;
use tracing::debug;

use crate::config::ReaderConfig;
use crate::constants::TrajectoryId;
use crate::drift_errors::{DataAccessError, DriftError};
use crate::simulation::{FirstStepCollector, InitialPositions};

/// Downcast `$array` to each listed primitive type in turn and convert to `f64` with `$scale`.
macro_rules! primitive_to_f64 {
    ($array:expr, $scale:expr, $($ty:ty),+ $(,)?) => {
        $(
            if let Some(typed) = $array.as_any().downcast_ref::<$ty>() {
                return Ok(typed
                    .iter()
                    .map(|v| v.map_or(f64::NAN, |x| x as f64 * $scale))
                    .collect());
            }
        )+
    };
}

/// Downcast `$array` to each listed integer type in turn and convert to [`TrajectoryId`].
macro_rules! primitive_to_ids {
    ($array:expr, $field:expr, $offset:expr, $($ty:ty),+ $(,)?) => {
        $(
            if let Some(typed) = $array.as_any().downcast_ref::<$ty>() {
                return typed
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        v.and_then(|x| TrajectoryId::try_from(x).ok()).ok_or_else(|| {
                            DriftError::from(DataAccessError::InvalidValue {
                                field: $field.to_string(),
                                row: $offset + i,
                                value: v.map_or_else(|| "null".to_string(), |x| x.to_string()),
                            })
                        })
                    })
                    .collect();
            }
        )+
    };
}

fn invalid_type(field: &str, array: &dyn Array) -> DriftError {
    DataAccessError::InvalidColumnType {
        field: field.to_string(),
        data_type: array.data_type().to_string(),
    }
    .into()
}

/// Numeric or timestamp column as `f64`, nulls as NaN.
fn column_to_f64(array: &dyn Array, field: &str) -> Result<Vec<f64>, DriftError> {
    primitive_to_f64!(
        array,
        1.0,
        Float64Array,
        Float32Array,
        Int8Array,
        Int16Array,
        Int32Array,
        Int64Array,
        UInt8Array,
        UInt16Array,
        UInt32Array,
        UInt64Array,
        TimestampSecondArray,
    );
    primitive_to_f64!(array, 1e-3, TimestampMillisecondArray);
    primitive_to_f64!(array, 1e-6, TimestampMicrosecondArray);
    primitive_to_f64!(array, 1e-9, TimestampNanosecondArray);

    Err(invalid_type(field, array))
}

/// Integer column as particle ids; `offset` is the index of the first batch row in the file.
fn column_to_ids(
    array: &dyn Array,
    field: &str,
    offset: usize,
) -> Result<Vec<TrajectoryId>, DriftError> {
    primitive_to_ids!(
        array,
        field,
        offset,
        Int8Array,
        Int16Array,
        Int32Array,
        Int64Array,
        UInt8Array,
        UInt16Array,
        UInt32Array,
        UInt64Array,
    );

    Err(invalid_type(field, array))
}

fn batch_column<'a>(batch: &'a RecordBatch, field: &str) -> Result<&'a dyn Array, DriftError> {
    batch
        .column_by_name(field)
        .map(|col| col.as_ref())
        .ok_or_else(|| DataAccessError::MissingField(field.to_string()).into())
}

/// Read the first time step of a long-format Parquet table.
///
/// Arguments
/// -----------------
/// * `parquet` – path to the Parquet file.
/// * `config` – column names and record batch size.
///
/// Return
/// ----------
/// * The particle positions at the minimum time value, ordered by particle id.
///
/// Errors
/// ----------
/// * I/O and decoding failures, missing columns, unsupported column types, or null particle ids,
///   all as [`DataAccessError`].
pub(crate) fn read_parquet(
    parquet: &Utf8Path,
    config: &ReaderConfig,
) -> Result<InitialPositions, DriftError> {
    let file = std::fs::File::open(parquet)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema_descr = builder.metadata().file_metadata().schema_descr();
    let all_fields = schema_descr.columns();
    let column_names = [&config.time, &config.trajectory, &config.lon, &config.lat];
    let projection_indices: Vec<usize> = column_names
        .iter()
        .map(|name| {
            all_fields
                .iter()
                .position(|f| f.name() == name.as_str())
                .ok_or_else(|| DriftError::from(DataAccessError::MissingField(name.to_string())))
        })
        .collect::<Result<_, _>>()?;
    let mask = ProjectionMask::leaves(schema_descr, projection_indices);

    let reader = builder
        .with_projection(mask)
        .with_batch_size(config.batch_size.max(1))
        .build()?;

    let mut collector = FirstStepCollector::new();
    let mut offset = 0;
    let mut n_batches = 0;

    for maybe_batch in reader {
        let batch = maybe_batch.map_err(ParquetError::from)?;

        let time = column_to_f64(batch_column(&batch, &config.time)?, &config.time)?;
        let trajectory = column_to_ids(
            batch_column(&batch, &config.trajectory)?,
            &config.trajectory,
            offset,
        )?;
        let lon = column_to_f64(batch_column(&batch, &config.lon)?, &config.lon)?;
        let lat = column_to_f64(batch_column(&batch, &config.lat)?, &config.lat)?;

        for (t, id, x, y) in izip!(time, trajectory, lon, lat) {
            collector.push(t, id, x, y);
        }

        offset += batch.num_rows();
        n_batches += 1;
    }

    debug!(rows = offset, batches = n_batches, "parquet simulation output decoded");
    collector.finish()
}

#[cfg(test)]
mod parquet_reader_test {
    use super::*;
    use std::sync::Arc;

    use arrow_array::ArrayRef;
    use camino::Utf8PathBuf;
    use parquet::arrow::ArrowWriter;

    fn write_batch(dir: &tempfile::TempDir, batch: RecordBatch) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("sim.parquet")).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn test_timestamp_and_unsigned_ids() {
        let dir = tempfile::tempdir().unwrap();
        let batch = RecordBatch::try_from_iter(vec![
            (
                "time",
                Arc::new(TimestampSecondArray::from(vec![3600, 0, 0, 3600])) as ArrayRef,
            ),
            (
                "trajectory",
                Arc::new(UInt32Array::from(vec![1, 1, 0, 0])) as ArrayRef,
            ),
            (
                "lon",
                Arc::new(Float32Array::from(vec![200.5, 190.0, 10.0, 11.0])) as ArrayRef,
            ),
            (
                "lat",
                Arc::new(Float64Array::from(vec![52.0, 53.0, 54.0, 55.0])) as ArrayRef,
            ),
        ])
        .unwrap();
        let path = write_batch(&dir, batch);

        let config = ReaderConfig {
            batch_size: 3,
            ..ReaderConfig::default()
        };
        let positions = read_parquet(&path, &config).unwrap();
        assert_eq!(positions.trajectory, vec![0, 1]);
        assert_eq!(positions.lon, vec![10.0, 190.0]);
        assert_eq!(positions.lat, vec![54.0, 53.0]);
    }

    #[test]
    fn test_missing_lat_column() {
        let dir = tempfile::tempdir().unwrap();
        let batch = RecordBatch::try_from_iter(vec![
            ("time", Arc::new(Float64Array::from(vec![0.0])) as ArrayRef),
            ("trajectory", Arc::new(Int32Array::from(vec![0])) as ArrayRef),
            ("lon", Arc::new(Float64Array::from(vec![10.0])) as ArrayRef),
        ])
        .unwrap();
        let path = write_batch(&dir, batch);

        assert_eq!(
            read_parquet(&path, &ReaderConfig::default()),
            Err(DriftError::DataAccess(DataAccessError::MissingField(
                "lat".to_string()
            )))
        );
    }

    #[test]
    fn test_null_trajectory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let batch = RecordBatch::try_from_iter(vec![
            ("time", Arc::new(Float64Array::from(vec![0.0, 0.0])) as ArrayRef),
            (
                "trajectory",
                Arc::new(Int64Array::from(vec![Some(0), None])) as ArrayRef,
            ),
            ("lon", Arc::new(Float64Array::from(vec![10.0, 11.0])) as ArrayRef),
            ("lat", Arc::new(Float64Array::from(vec![50.0, 51.0])) as ArrayRef),
        ])
        .unwrap();
        let path = write_batch(&dir, batch);

        assert_eq!(
            read_parquet(&path, &ReaderConfig::default()),
            Err(DriftError::DataAccess(DataAccessError::InvalidValue {
                field: "trajectory".to_string(),
                row: 1,
                value: "null".to_string(),
            }))
        );
    }
}
