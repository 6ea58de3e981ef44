//! Tests for loading season stats from local exports

use batter_points::pipeline::{FanGraphsSource, FileSource, SchemaError, StatsSource};
use polars::prelude::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_csv_source_applies_pa_threshold() {
    let mut df = df! {
        "Name" => ["A", "B", "C", "D"],
        "PA" => [5i64, 10, 250, 9],
        "R" => [0i64, 1, 30, 2],
    }
    .unwrap();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let loaded = FileSource::new(csv_path).batting_stats(2021, 10).unwrap();

    let names: Vec<Option<&str>> = loaded.column("Name").unwrap().str().unwrap().iter().collect();
    assert_eq!(names, vec![Some("B"), Some("C")]);
}

#[test]
fn test_csv_source_restricts_to_season() {
    let mut df = df! {
        "Season" => [2020i64, 2021, 2021, 2022],
        "PA" => [100i64, 100, 100, 100],
    }
    .unwrap();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let loaded = FileSource::new(csv_path).batting_stats(2021, 10).unwrap();

    assert_eq!(loaded.height(), 2);
}

#[test]
fn test_parquet_source() {
    let mut df = create_batting_dataframe(20, 4);
    let (_temp_dir, parquet_path) = create_temp_parquet(&mut df);

    let loaded = FileSource::new(parquet_path).batting_stats(2021, 1).unwrap();

    assert_shape(&loaded, 20, df.width());
}

#[test]
fn test_missing_pa_column_is_schema_error() {
    let mut df = df! { "R" => [1i64, 2] }.unwrap();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let err = FileSource::new(csv_path).batting_stats(2021, 10).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SchemaError>(),
        Some(SchemaError::MissingColumns { .. })
    ));
}

#[test]
fn test_season_without_qualified_players_is_empty_dataset() {
    let mut df = df! {
        "Season" => [2021i64, 2021],
        "PA" => [3i64, 4],
    }
    .unwrap();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let err = FileSource::new(csv_path).batting_stats(2021, 10).unwrap_err();

    assert_eq!(
        err.downcast_ref::<SchemaError>(),
        Some(&SchemaError::EmptyDataset { season: 2021 })
    );
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stats.xlsx");
    std::fs::write(&path, "not a table").unwrap();

    let err = FileSource::new(path).batting_stats(2021, 10).unwrap_err();

    assert!(err.to_string().contains("Unsupported file format"));
}

/// Nothing listens on the discard port, so any fetch fails fast.
const UNREACHABLE_URL: &str = "http://127.0.0.1:9/leaders";

#[test]
fn test_cached_season_is_reused_with_pa_threshold() {
    let cache_dir = TempDir::new().unwrap();
    let source = FanGraphsSource::new(UNREACHABLE_URL)
        .unwrap()
        .with_cache_dir(Some(cache_dir.path().to_path_buf()));
    let cache_path = source.cache_path(2021, 10).unwrap();

    let mut cached = df! {
        "Name" => ["A", "B", "C"],
        "Season" => [2021i64, 2021, 2021],
        "PA" => [4i64, 10, 600],
    }
    .unwrap();
    let mut file = std::fs::File::create(&cache_path).unwrap();
    CsvWriter::new(&mut file).finish(&mut cached).unwrap();

    let loaded = source.batting_stats(2021, 10).unwrap();

    let names: Vec<Option<&str>> = loaded.column("Name").unwrap().str().unwrap().iter().collect();
    assert_eq!(names, vec![Some("B"), Some("C")]);
}

#[test]
fn test_refresh_bypasses_cache() {
    let cache_dir = TempDir::new().unwrap();
    let source = FanGraphsSource::new(UNREACHABLE_URL)
        .unwrap()
        .with_cache_dir(Some(cache_dir.path().to_path_buf()))
        .with_refresh(true);
    let cache_path = source.cache_path(2021, 10).unwrap();

    let mut cached = df! { "Name" => ["A"], "PA" => [600i64] }.unwrap();
    let mut file = std::fs::File::create(&cache_path).unwrap();
    CsvWriter::new(&mut file).finish(&mut cached).unwrap();

    let err = source.batting_stats(2021, 10).unwrap_err();

    assert!(err.to_string().contains("Failed to reach statistics provider"));
    assert!(cache_path.exists(), "a failed refresh must leave the cache alone");
}

#[test]
fn test_missing_cache_falls_through_to_fetch() {
    let cache_dir = TempDir::new().unwrap();
    let source = FanGraphsSource::new(UNREACHABLE_URL)
        .unwrap()
        .with_cache_dir(Some(cache_dir.path().to_path_buf()));

    assert!(source.batting_stats(2021, 10).is_err());
    assert!(!source.cache_path(2021, 10).unwrap().exists());
}
