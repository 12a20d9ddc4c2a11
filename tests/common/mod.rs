#![allow(dead_code)]

use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int32Array, RecordBatch};
use camino::Utf8PathBuf;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

/// Write a long-format simulation table (`time`, `trajectory`, `lon`, `lat`) as Parquet.
pub fn write_simulation_parquet(
    dir: &TempDir,
    name: &str,
    time: Vec<f64>,
    trajectory: Vec<i32>,
    lon: Vec<f64>,
    lat: Vec<f64>,
) -> Utf8PathBuf {
    let batch = RecordBatch::try_from_iter(vec![
        ("time", Arc::new(Float64Array::from(time)) as ArrayRef),
        ("trajectory", Arc::new(Int32Array::from(trajectory)) as ArrayRef),
        ("lon", Arc::new(Float64Array::from(lon)) as ArrayRef),
        ("lat", Arc::new(Float64Array::from(lat)) as ArrayRef),
    ])
    .unwrap();
    write_batch(dir, name, batch)
}

pub fn write_batch(dir: &TempDir, name: &str, batch: RecordBatch) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    path
}

/// Three particles released at lon 10, 190 and 359 ([0, 360) convention), observed at two
/// time steps; the second step is written first.
pub fn three_particle_simulation(dir: &TempDir) -> Utf8PathBuf {
    write_simulation_parquet(
        dir,
        "three_particles.parquet",
        vec![3600.0, 3600.0, 3600.0, 0.0, 0.0, 0.0],
        vec![2, 1, 0, 2, 1, 0],
        vec![358.0, 191.0, 11.0, 359.0, 190.0, 10.0],
        vec![52.5, 51.5, 50.5, 52.0, 51.0, 50.0],
    )
}
