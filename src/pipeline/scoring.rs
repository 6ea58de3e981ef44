//! Fantasy point derivation from counting stats

use anyhow::{Context, Result};
use polars::prelude::*;

use super::schema::validate_scoring_columns;

/// Name of the derived score column.
pub const POINTS_COLUMN: &str = "Points";

/// One term of the points formula: `weight * column`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRule {
    pub column: &'static str,
    pub weight: f64,
}

impl ScoringRule {
    pub const fn new(column: &'static str, weight: f64) -> Self {
        Self { column, weight }
    }
}

/// Yahoo-style head-to-head points for batters.
pub const YAHOO_BATTING_RULES: [ScoringRule; 12] = [
    ScoringRule::new("R", 2.0),
    ScoringRule::new("H", 1.0),
    ScoringRule::new("2B", 1.0),
    ScoringRule::new("3B", 2.0),
    ScoringRule::new("HR", 3.0),
    ScoringRule::new("RBI", 2.0),
    ScoringRule::new("SB", 1.0),
    ScoringRule::new("CS", -1.0),
    ScoringRule::new("BB", 1.0),
    ScoringRule::new("IBB", 1.0),
    ScoringRule::new("HBP", 1.0),
    ScoringRule::new("SO", -0.5),
];

/// Build the weighted-sum expression for a set of rules.
///
/// Every input is cast to `Float64`. Polars arithmetic propagates nulls, so a
/// row missing any input gets a null result rather than a partial sum. A NaN
/// input is missing too and also yields null.
pub fn points_expr(rules: &[ScoringRule]) -> Option<Expr> {
    rules
        .iter()
        .map(|rule| col(rule.column).cast(DataType::Float64) * lit(rule.weight))
        .reduce(|acc, term| acc + term)
        .map(|sum| sum.fill_nan(lit(NULL)))
}

/// Add (or replace) the `Points` column.
///
/// Fails with a [`super::SchemaError`] before evaluating anything if a scoring
/// column is absent or non-numeric.
pub fn add_points(df: DataFrame, rules: &[ScoringRule]) -> Result<DataFrame> {
    validate_scoring_columns(&df, rules)?;

    let expr = points_expr(rules)
        .ok_or_else(|| anyhow::anyhow!("Scoring rules are empty - nothing to compute"))?;

    df.lazy()
        .with_column(expr.alias(POINTS_COLUMN))
        .collect()
        .context("Failed to compute Points column")
}

/// Count rows whose Points value is missing (null or NaN).
pub fn missing_points_count(df: &DataFrame) -> Result<usize> {
    let points = df.column(POINTS_COLUMN)?.cast(&DataType::Float64)?;
    Ok(points
        .f64()?
        .iter()
        .filter(|v| v.map_or(true, f64::is_nan))
        .count())
}
