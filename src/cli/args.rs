//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{ExclusionSet, DEFAULT_EXPORT_PATH, FANGRAPHS_LEADERS_URL, POINTS_COLUMN};

/// Batter-points - Score batters for fantasy points and find the stats that drive them
#[derive(Parser, Debug)]
#[command(name = "batter-points")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Season to analyze
    #[arg(long, default_value = "2021")]
    pub season: u16,

    /// Minimum plate appearances for a batter to be included
    #[arg(long, default_value = "10", value_parser = validate_min_pa)]
    pub min_pa: u32,

    /// Local CSV or Parquet export to read instead of the remote provider.
    /// Must contain a PA column; a Season column, if present, is filtered to --season.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Leaderboard endpoint for the remote provider
    #[arg(long, default_value = FANGRAPHS_LEADERS_URL)]
    pub source_url: String,

    /// Directory for cached leaderboard fetches.
    /// Defaults to the user cache directory (e.g. ~/.cache/batter-points).
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Ignore any cached copy and refetch from the provider
    #[arg(long, default_value = "false")]
    pub refresh: bool,

    /// Output CSV path for the enriched table
    #[arg(short, long, default_value = DEFAULT_EXPORT_PATH)]
    pub output: PathBuf,

    /// Number of most positively correlated columns to consider
    #[arg(long, default_value = "30")]
    pub top: usize,

    /// Number of least correlated columns to consider
    #[arg(long, default_value = "10")]
    pub bottom: usize,

    /// Additional columns to exclude from the regression (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Start from an empty exclusion list instead of the built-in one
    #[arg(long, default_value = "false")]
    pub no_default_exclusions: bool,

    /// Automatically drop insignificant predictors (backward elimination)
    #[arg(long, default_value = "false")]
    pub eliminate: bool,

    /// Significance level for elimination and the insignificant-predictor hint
    #[arg(long, default_value = "0.05", value_parser = validate_alpha)]
    pub alpha: f64,

    /// Write the regression report as JSON to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV input only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Cache directory to use for remote fetches, if any can be determined.
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("batter-points")))
    }

    /// Exclusion set from the flags. The response column is always excluded.
    pub fn exclusions(&self) -> ExclusionSet {
        let mut set = if self.no_default_exclusions {
            ExclusionSet::empty()
        } else {
            ExclusionSet::default()
        };
        set.insert(POINTS_COLUMN);
        set.extend(
            self.exclude
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty()),
        );
        set
    }
}

/// Validator for min_pa parameter
fn validate_min_pa(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid whole number", s))?;

    if value == 0 {
        Err("min_pa must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for alpha parameter
fn validate_alpha(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value <= 0.0 || value >= 1.0 {
        Err(format!("alpha must be between 0.0 and 1.0 (exclusive), got {}", value))
    } else {
        Ok(value)
    }
}
