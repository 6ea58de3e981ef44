//! Season batting statistics sources: local exports and the FanGraphs leaderboard

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::{ensure_not_empty, require_numeric_columns, PA_COLUMN, SEASON_COLUMN};

/// Default FanGraphs leaderboard endpoint (JSON API behind the batting leaders page).
pub const FANGRAPHS_LEADERS_URL: &str = "https://www.fangraphs.com/api/leaders/major-league/data";

/// A provider of one season of batting statistics.
pub trait StatsSource {
    /// Fetch batters with at least `min_pa` plate appearances in `season`.
    fn batting_stats(&self, season: u16, min_pa: u32) -> Result<DataFrame>;

    /// Human-readable description for the run configuration card.
    fn describe(&self) -> String;
}

/// Errors specific to remote fetches.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("leaderboard payload has no rows")]
    EmptyPayload,

    #[error("leaderboard rows have no columns")]
    NoColumns,
}

/// Reads a CSV or Parquet export of batting stats.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    infer_schema_length: usize,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            infer_schema_length: 10000,
        }
    }

    /// Rows used for CSV schema inference (0 scans the whole file).
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }
}

impl StatsSource for FileSource {
    fn batting_stats(&self, season: u16, min_pa: u32) -> Result<DataFrame> {
        let lf = load_dataset(&self.path, self.infer_schema_length)?;
        let df = lf
            .collect()
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let df = restrict_to_season(df, season)?;
        let df = apply_pa_threshold(df, min_pa)?;
        ensure_not_empty(&df, season)?;
        Ok(df)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let infer = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(infer)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Keep only rows for `season` when the table carries a Season column.
fn restrict_to_season(df: DataFrame, season: u16) -> Result<DataFrame> {
    let numeric = df
        .column(SEASON_COLUMN)
        .ok()
        .map(|column| column.dtype().is_primitive_numeric());
    match numeric {
        None => return Ok(df),
        Some(false) => {
            log::debug!("Season column is not numeric, skipping season filter");
            return Ok(df);
        }
        Some(true) => {}
    }

    let before = df.height();
    let df = df
        .lazy()
        .filter(col(SEASON_COLUMN).cast(DataType::Int64).eq(lit(season as i64)))
        .collect()
        .context("Failed to filter by season")?;
    log::debug!("season filter kept {} of {} rows", df.height(), before);
    Ok(df)
}

/// Drop players below the plate-appearance threshold.
pub fn apply_pa_threshold(df: DataFrame, min_pa: u32) -> Result<DataFrame> {
    require_numeric_columns(&df, &[PA_COLUMN])?;

    let before = df.height();
    let df = df
        .lazy()
        .filter(col(PA_COLUMN).cast(DataType::Float64).gt_eq(lit(min_pa as f64)))
        .collect()
        .context("Failed to apply plate-appearance threshold")?;
    log::debug!(
        "PA >= {} kept {} of {} rows",
        min_pa,
        df.height(),
        before
    );
    Ok(df)
}

/// Leaderboard JSON envelope. Extra top-level fields are ignored.
#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    data: Vec<Map<String, Value>>,
}

/// Blocking fetch of the FanGraphs batting leaderboard with an on-disk CSV cache.
pub struct FanGraphsSource {
    base_url: String,
    cache_dir: Option<PathBuf>,
    refresh: bool,
    client: reqwest::blocking::Client,
}

impl FanGraphsSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("batter-points/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            cache_dir: None,
            refresh: false,
            client,
        })
    }

    /// Cache fetched seasons under `dir`.
    pub fn with_cache_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.cache_dir = dir;
        self
    }

    /// Ignore any cached copy and refetch.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Path of the cached CSV for a season/threshold pair.
    pub fn cache_path(&self, season: u16, min_pa: u32) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(cache_file_name(season, min_pa)))
    }

    fn fetch(&self, season: u16, min_pa: u32) -> Result<DataFrame> {
        let season_str = season.to_string();
        let qual = min_pa.to_string();
        let query = [
            ("pos", "all"),
            ("stats", "bat"),
            ("lg", "all"),
            ("qual", qual.as_str()),
            ("season", season_str.as_str()),
            ("season1", season_str.as_str()),
            ("ind", "0"),
            ("type", "c,-1"),
            ("pageitems", "2000000000"),
        ];

        log::info!("fetching {} season {} (qual {})", self.base_url, season, min_pa);
        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .with_context(|| format!("Failed to reach statistics provider: {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: self.base_url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let payload: LeaderboardResponse = response
            .json()
            .context("Failed to decode leaderboard JSON")?;
        rows_to_dataframe(&payload.data)
    }
}

impl StatsSource for FanGraphsSource {
    fn batting_stats(&self, season: u16, min_pa: u32) -> Result<DataFrame> {
        let cache_path = self.cache_path(season, min_pa);

        if let Some(path) = cache_path.as_ref().filter(|p| !self.refresh && p.exists()) {
            log::debug!("using cached season at {}", path.display());
            return FileSource::new(path.clone()).batting_stats(season, min_pa);
        }

        let df = self.fetch(season, min_pa)?;
        let mut df = apply_pa_threshold(df, min_pa)?;
        ensure_not_empty(&df, season)?;

        if let Some(path) = cache_path {
            write_cache(&mut df, &path)?;
        }

        Ok(df)
    }

    fn describe(&self) -> String {
        match &self.cache_dir {
            Some(dir) => format!("{} (cache: {})", self.base_url, dir.display()),
            None => self.base_url.clone(),
        }
    }
}

fn cache_file_name(season: u16, min_pa: u32) -> String {
    format!("batting_{}_pa{}.csv", season, min_pa)
}

fn write_cache(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }
    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create cache file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("Failed to write cache file: {}", path.display()))?;
    log::debug!("cached {} rows at {}", df.height(), path.display());
    Ok(())
}

/// Convert leaderboard JSON rows into a DataFrame.
///
/// Column order follows first appearance across rows. A column whose values
/// are all numbers (or null/absent) becomes `Float64`; anything else becomes
/// `String`, with numbers rendered as text.
pub fn rows_to_dataframe(rows: &[Map<String, Value>]) -> Result<DataFrame> {
    if rows.is_empty() {
        return Err(SourceError::EmptyPayload.into());
    }

    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key.as_str());
            }
        }
    }
    if names.is_empty() {
        return Err(SourceError::NoColumns.into());
    }

    let columns: Vec<Column> = names
        .iter()
        .map(|name| {
            let values: Vec<Option<&Value>> = rows
                .iter()
                .map(|row| row.get(*name).filter(|v| !v.is_null()))
                .collect();

            let numeric = values.iter().all(|v| v.map_or(true, Value::is_number));
            if numeric {
                let floats: Vec<Option<f64>> =
                    values.iter().map(|v| v.and_then(Value::as_f64)).collect();
                Column::new((*name).into(), floats)
            } else {
                let strings: Vec<Option<String>> = values
                    .iter()
                    .map(|v| {
                        v.map(|v| match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                    })
                    .collect();
                Column::new((*name).into(), strings)
            }
        })
        .collect();

    DataFrame::new(columns).context("Failed to assemble leaderboard DataFrame")
}
