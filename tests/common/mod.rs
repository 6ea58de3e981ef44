//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// The twelve scoring stats, in formula order.
pub const SCORING_COLUMNS: [&str; 12] = [
    "R", "H", "2B", "3B", "HR", "RBI", "SB", "CS", "BB", "IBB", "HBP", "SO",
];

/// Three batters where only R and H are non-zero.
///
/// Points should be `[3, 1, 4]`.
pub fn create_scoring_dataframe() -> DataFrame {
    let mut columns = vec![
        Column::new("R".into(), [1.0f64, 0.0, 2.0]),
        Column::new("H".into(), [1.0f64, 1.0, 0.0]),
    ];
    for name in &SCORING_COLUMNS[2..] {
        columns.push(Column::new((*name).into(), [0.0f64, 0.0, 0.0]));
    }
    DataFrame::new(columns).unwrap()
}

/// A synthetic season of batters with realistic-looking counting stats.
///
/// Includes:
/// - `Name`: text column (ignored by correlation)
/// - `Season`: constant 2021 (undefined correlation)
/// - `PA` and the twelve scoring stats, drawn independently
/// - `AVG`: a rate stat
/// - `KN%`: knuckleball rate, missing for all but two players
pub fn create_batting_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let ranges: [(&str, u32); 12] = [
        ("R", 110),
        ("H", 190),
        ("2B", 45),
        ("3B", 8),
        ("HR", 48),
        ("RBI", 120),
        ("SB", 30),
        ("CS", 9),
        ("BB", 100),
        ("IBB", 12),
        ("HBP", 20),
        ("SO", 200),
    ];

    let names: Vec<String> = (0..rows).map(|i| format!("Player {}", i)).collect();
    let mut columns = vec![
        Column::new("Name".into(), names),
        Column::new("Season".into(), vec![2021i64; rows]),
        Column::new(
            "PA".into(),
            (0..rows)
                .map(|_| rng.gen_range(10..700) as f64)
                .collect::<Vec<f64>>(),
        ),
    ];

    for (name, max) in ranges {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen_range(0..=max) as f64).collect();
        columns.push(Column::new(name.into(), values));
    }

    let avg: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.150..0.350)).collect();
    columns.push(Column::new("AVG".into(), avg));

    let knuckle: Vec<Option<f64>> = (0..rows)
        .map(|i| match i {
            0 => Some(0.4),
            1 => Some(0.1),
            _ => None,
        })
        .collect();
    columns.push(Column::new("KN%".into(), knuckle));

    DataFrame::new(columns).unwrap()
}

/// Two regressors where `y = 2a + e`, with `e` orthogonal to both `a` and `z`.
///
/// The exact OLS solution is `a = 2`, `z = 0`.
pub fn create_orthogonal_noise_dataframe(rows: usize) -> DataFrame {
    let pattern_e = [0.5f64, -0.5, -0.5, 0.5];
    let pattern_z = [1.0f64, 1.0, -1.0, -1.0];

    let a: Vec<f64> = (1..=rows).map(|i| i as f64).collect();
    let z: Vec<f64> = (0..rows).map(|i| pattern_z[i % 4]).collect();
    let y: Vec<f64> = (0..rows)
        .map(|i| 2.0 * a[i] + pattern_e[i % 4])
        .collect();

    df! {
        "y" => y,
        "a" => a,
        "z" => z,
    }
    .unwrap()
}

/// Random regression data: `y = 1.5 x1 - 2 x2 + 0.5 x3 + noise`.
pub fn create_regression_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let x1: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..10.0)).collect();
    let x2: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..10.0)).collect();
    let x3: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..10.0)).collect();
    let y: Vec<f64> = (0..rows)
        .map(|i| 1.5 * x1[i] - 2.0 * x2[i] + 0.5 * x3[i] + rng.gen_range(-0.5..0.5))
        .collect();

    df! {
        "y" => y,
        "x1" => x1,
        "x2" => x2,
        "x3" => x3,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Points column as a vector of options
pub fn points_values(df: &DataFrame) -> Vec<Option<f64>> {
    df.column("Points")
        .unwrap()
        .f64()
        .unwrap()
        .iter()
        .collect()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}
