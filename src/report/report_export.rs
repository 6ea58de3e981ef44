//! Regression report export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{EliminationStep, FeatureCorrelation, OlsFit};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// Tool version
    pub version: String,
    pub season: u16,
    pub min_pa: u32,
    /// Where the statistics came from
    pub source: String,
    /// Path of the enriched CSV export
    pub export_file: String,
    pub alpha: f64,
}

/// A candidate regressor and its correlation with Points
#[derive(Serialize)]
pub struct CandidateEntry {
    pub name: String,
    pub correlation: f64,
    /// Whether the exclusion set removed it
    pub excluded: bool,
}

/// Complete regression export with metadata
#[derive(Serialize)]
pub struct RegressionExport<'a> {
    pub metadata: ReportMetadata,
    pub candidates: Vec<CandidateEntry>,
    pub exclusions: &'a [String],
    /// Predictors removed by backward elimination, if it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminated: Option<&'a [EliminationStep]>,
    pub fit: &'a OlsFit,
}

/// Parameters for the regression export
pub struct ReportParams<'a> {
    pub season: u16,
    pub min_pa: u32,
    pub source: &'a str,
    pub export_file: &'a Path,
    pub alpha: f64,
}

/// Write the fit and run context to a pretty-printed JSON file
pub fn export_regression_report(
    fit: &OlsFit,
    candidates: &[FeatureCorrelation],
    exclusions: &[String],
    eliminated: Option<&[EliminationStep]>,
    output_path: &Path,
    params: &ReportParams,
) -> Result<()> {
    let export = RegressionExport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            season: params.season,
            min_pa: params.min_pa,
            source: params.source.to_string(),
            export_file: params.export_file.display().to_string(),
            alpha: params.alpha,
        },
        candidates: candidates
            .iter()
            .map(|c| CandidateEntry {
                name: c.feature.clone(),
                correlation: c.correlation,
                excluded: exclusions.contains(&c.feature),
            })
            .collect(),
        exclusions,
        eliminated,
        fit,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize regression report to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write regression report to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
