//! Ingestion-time validation of the batting table

use polars::prelude::*;
use thiserror::Error;

use super::scoring::ScoringRule;

/// Plate appearances column, used for the qualification threshold.
pub const PA_COLUMN: &str = "PA";

/// Season column, present in multi-season exports.
pub const SEASON_COLUMN: &str = "Season";

/// Errors raised when a fetched table does not have the shape scoring needs.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    /// One or more required columns are absent.
    #[error("missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// A required column exists but cannot be used in arithmetic.
    #[error("column '{column}' must be numeric, found {dtype}")]
    NonNumericColumn { column: String, dtype: String },

    /// The provider returned no rows for the requested season.
    #[error("no batting data for season {season}")]
    EmptyDataset { season: u16 },
}

/// Check that every scoring column is present and numeric.
///
/// Missing values inside those columns are allowed; they propagate into a
/// missing Points value instead of failing here.
pub fn validate_scoring_columns(df: &DataFrame, rules: &[ScoringRule]) -> Result<(), SchemaError> {
    let columns: Vec<&str> = rules.iter().map(|rule| rule.column).collect();
    require_numeric_columns(df, &columns)
}

/// Check that the named columns exist and have a numeric dtype.
pub fn require_numeric_columns(df: &DataFrame, columns: &[&str]) -> Result<(), SchemaError> {
    let missing: Vec<String> = columns
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns { missing });
    }

    for name in columns {
        let column = df
            .column(name)
            .map_err(|_| SchemaError::MissingColumns {
                missing: vec![name.to_string()],
            })?;
        if !column.dtype().is_primitive_numeric() {
            return Err(SchemaError::NonNumericColumn {
                column: name.to_string(),
                dtype: column.dtype().to_string(),
            });
        }
    }

    Ok(())
}

/// Fail with [`SchemaError::EmptyDataset`] when the table has no rows.
pub fn ensure_not_empty(df: &DataFrame, season: u16) -> Result<(), SchemaError> {
    if df.height() == 0 {
        Err(SchemaError::EmptyDataset { season })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::scoring::YAHOO_BATTING_RULES;

    #[test]
    fn reports_every_missing_column() {
        let df = df! {
            "R" => [1.0f64],
            "H" => [1.0f64],
        }
        .unwrap();

        let err = validate_scoring_columns(&df, &YAHOO_BATTING_RULES).unwrap_err();
        match err {
            SchemaError::MissingColumns { missing } => {
                assert!(missing.contains(&"HR".to_string()));
                assert!(missing.contains(&"SO".to_string()));
                assert!(!missing.contains(&"R".to_string()));
                assert_eq!(missing.len(), YAHOO_BATTING_RULES.len() - 2);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn rejects_string_stat_column() {
        let df = df! {
            "PA" => ["12", "40"],
        }
        .unwrap();

        let err = require_numeric_columns(&df, &[PA_COLUMN]).unwrap_err();
        assert!(matches!(err, SchemaError::NonNumericColumn { .. }));
    }

    #[test]
    fn empty_table_is_an_error() {
        let df = df! { "PA" => Vec::<f64>::new() }.unwrap();
        assert_eq!(
            ensure_not_empty(&df, 2021),
            Err(SchemaError::EmptyDataset { season: 2021 })
        );
    }
}
