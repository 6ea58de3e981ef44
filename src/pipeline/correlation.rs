//! Correlation of every numeric column against the derived score

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use rayon::prelude::*;

/// One column's correlation with the target
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCorrelation {
    pub feature: String,
    pub correlation: f64,
}

/// Correlations against a target column, sorted descending.
#[derive(Debug, Clone)]
pub struct CorrelationRanking {
    pub target: String,
    /// Defined correlations, highest first.
    pub ranked: Vec<FeatureCorrelation>,
    /// Numeric columns whose correlation with the target is undefined.
    pub undefined: Vec<String>,
}

impl CorrelationRanking {
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// The `n` most positively correlated columns.
    pub fn top(&self, n: usize) -> &[FeatureCorrelation] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    /// The `n` least (most negatively) correlated columns, in ranking order.
    pub fn bottom(&self, n: usize) -> &[FeatureCorrelation] {
        &self.ranked[self.ranked.len().saturating_sub(n)..]
    }

    /// Correlation for a column, if it was defined.
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.ranked
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.correlation)
    }

    /// Candidate regressors: the top `top_n` names followed by the bottom `bottom_n`.
    ///
    /// The two windows overlap when the ranking is shorter than
    /// `top_n + bottom_n`; a name is kept only at its first occurrence.
    /// The target itself is always in the top window and is left for the
    /// exclusion step to remove.
    pub fn candidates(&self, top_n: usize, bottom_n: usize) -> Vec<String> {
        let capacity = top_n.saturating_add(bottom_n).min(self.ranked.len());
        let mut names: Vec<String> = Vec::with_capacity(capacity);
        for entry in self.top(top_n).iter().chain(self.bottom(bottom_n)) {
            if !names.contains(&entry.feature) {
                names.push(entry.feature.clone());
            }
        }
        names
    }
}

/// Correlate every numeric column with `target` and rank the results.
///
/// Uses pairwise-complete Pearson correlation: each column is paired with the
/// target over the rows where both are defined (non-null, finite). Columns
/// with an undefined correlation are moved to `undefined`.
pub fn rank_correlations(df: &DataFrame, target: &str) -> Result<CorrelationRanking> {
    let target_col = df
        .column(target)
        .map_err(|_| anyhow::anyhow!("Target column '{}' not found in dataset", target))?
        .cast(&DataType::Float64)?;

    // Target goes first so it keeps rank 1 under the stable sort below,
    // even against another perfectly correlated column
    let mut numeric_cols: Vec<String> = vec![target.to_string()];
    numeric_cols.extend(
        df.get_columns()
            .iter()
            .filter(|col| col.dtype().is_primitive_numeric() && col.name().as_str() != target)
            .map(|col| col.name().to_string()),
    );

    // Pre-cast all numeric columns to Float64
    let float_columns: Vec<(String, Column)> = numeric_cols
        .iter()
        .filter_map(|col_name| {
            df.column(col_name)
                .ok()
                .and_then(|col| col.cast(&DataType::Float64).ok())
                .map(|col| (col_name.clone(), col))
        })
        .collect();

    let pb = ProgressBar::new(float_columns.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "   Correlating with {msg} [{bar:40.cyan/blue}] {pos}/{len} columns ({percent}%)",
            )
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message(target.to_string());

    let results: Vec<(String, Option<f64>)> = float_columns
        .par_iter()
        .map(|(name, col)| {
            let corr = compute_pearson_correlation(col, &target_col);
            pb.inc(1);
            (name.clone(), corr)
        })
        .collect();

    pb.finish_and_clear();

    let mut ranked = Vec::with_capacity(results.len());
    let mut undefined = Vec::new();
    for (feature, corr) in results {
        match corr {
            Some(correlation) => ranked.push(FeatureCorrelation {
                feature,
                correlation,
            }),
            None => undefined.push(feature),
        }
    }

    if !undefined.is_empty() {
        log::debug!(
            "dropped {} column(s) with undefined correlation: {:?}",
            undefined.len(),
            undefined
        );
    }

    // Sort by correlation descending
    ranked.sort_by(|a, b| {
        b.correlation
            .partial_cmp(&a.correlation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(CorrelationRanking {
        target: target.to_string(),
        ranked,
        undefined,
    })
}

/// Pearson correlation over rows where both values are defined.
///
/// Single-pass Welford updates for numerical stability. Returns `None` for
/// fewer than two overlapping rows or zero variance on either side.
fn compute_pearson_correlation(s1: &Column, s2: &Column) -> Option<f64> {
    let ca1 = s1.f64().ok()?;
    let ca2 = s2.f64().ok()?;

    if ca1.len() != ca2.len() {
        return None;
    }

    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in ca1.iter().zip(ca2.iter()) {
        let (Some(x), Some(y)) = (x, y) else {
            continue;
        };
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        n += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / n;
        mean_y += dy / n;
        var_x += dx * (x - mean_x);
        var_y += dy * (y - mean_y);
        cov_xy += dx * (y - mean_y);
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let corr = cov_xy / (var_x * var_y).sqrt();
    if corr.is_nan() {
        return None;
    }
    Some(corr.clamp(-1.0, 1.0))
}
