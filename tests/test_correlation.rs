//! Unit tests for correlation ranking

use batter_points::pipeline::{
    add_points, rank_correlations, CorrelationRanking, FeatureCorrelation, POINTS_COLUMN,
    YAHOO_BATTING_RULES,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

fn ranking_of(entries: &[(&str, f64)]) -> CorrelationRanking {
    CorrelationRanking {
        target: POINTS_COLUMN.to_string(),
        ranked: entries
            .iter()
            .map(|(name, c)| FeatureCorrelation {
                feature: name.to_string(),
                correlation: *c,
            })
            .collect(),
        undefined: Vec::new(),
    }
}

#[test]
fn test_points_ranks_first_with_unit_correlation() {
    let df = common::create_batting_dataframe(30, 3);
    let df = add_points(df, &YAHOO_BATTING_RULES).unwrap();

    let ranking = rank_correlations(&df, POINTS_COLUMN).unwrap();

    assert_eq!(ranking.ranked[0].feature, POINTS_COLUMN);
    assert!((ranking.ranked[0].correlation - 1.0).abs() < 1e-12);
    assert!(ranking.candidates(30, 10).contains(&POINTS_COLUMN.to_string()));
}

#[test]
fn test_constant_and_text_columns_are_not_ranked() {
    let df = common::create_batting_dataframe(30, 3);
    let df = add_points(df, &YAHOO_BATTING_RULES).unwrap();

    let ranking = rank_correlations(&df, POINTS_COLUMN).unwrap();

    assert!(ranking.get("Season").is_none(), "constant Season has no correlation");
    assert!(ranking.undefined.contains(&"Season".to_string()));
    assert!(ranking.get("Name").is_none());
    assert!(!ranking.undefined.contains(&"Name".to_string()), "text columns are skipped");
    assert!(ranking.ranked.iter().all(|c| c.correlation.is_finite()));
}

#[test]
fn test_ranking_is_sorted_descending() {
    let df = common::create_batting_dataframe(40, 9);
    let df = add_points(df, &YAHOO_BATTING_RULES).unwrap();

    let ranking = rank_correlations(&df, POINTS_COLUMN).unwrap();

    for pair in ranking.ranked.windows(2) {
        assert!(pair[0].correlation >= pair[1].correlation);
    }
}

#[test]
fn test_pairwise_complete_rows() {
    let df = df! {
        "Points" => [2.0f64, 100.0, 6.0, 8.0],
        "x" => [Some(1.0f64), None, Some(3.0), Some(4.0)],
    }
    .unwrap();

    let ranking = rank_correlations(&df, "Points").unwrap();

    // The outlier row has no x value, so it is ignored for this pair
    let corr = ranking.get("x").unwrap();
    assert!((corr - 1.0).abs() < 1e-12, "expected 1.0, got {}", corr);
}

#[test]
fn test_all_missing_column_is_undefined() {
    let df = df! {
        "Points" => [1.0f64, 2.0, 3.0],
        "empty" => [None::<f64>, None, None],
        "x" => [3.0f64, 1.0, 2.0],
    }
    .unwrap();

    let ranking = rank_correlations(&df, "Points").unwrap();

    assert_eq!(ranking.undefined, vec!["empty".to_string()]);
    assert_eq!(ranking.len(), 2);
}

#[test]
fn test_negative_correlation_sorts_last() {
    let df = df! {
        "Points" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "down" => [10.0f64, 8.0, 6.0, 4.0, 2.0],
        "noise" => [3.0f64, 1.0, 4.0, 1.0, 5.0],
    }
    .unwrap();

    let ranking = rank_correlations(&df, "Points").unwrap();

    let last = ranking.ranked.last().unwrap();
    assert_eq!(last.feature, "down");
    assert!((last.correlation + 1.0).abs() < 1e-12);
}

#[test]
fn test_target_keeps_rank_one_on_ties() {
    let df = df! {
        "double" => [2.0f64, 4.0, 6.0, 8.0],
        "Points" => [1.0f64, 2.0, 3.0, 4.0],
    }
    .unwrap();

    let ranking = rank_correlations(&df, "Points").unwrap();

    assert_eq!(ranking.ranked[0].feature, "Points");
    assert_eq!(ranking.ranked[1].feature, "double");
}

#[test]
fn test_missing_target_is_an_error() {
    let df = df! { "x" => [1.0f64, 2.0] }.unwrap();
    assert!(rank_correlations(&df, "Points").is_err());
}

#[test]
fn test_candidates_take_top_then_bottom() {
    let ranking = ranking_of(&[
        ("Points", 1.0),
        ("R", 0.9),
        ("H", 0.8),
        ("AVG", 0.3),
        ("Age", 0.0),
        ("SO", -0.2),
        ("GB%", -0.4),
    ]);

    let candidates = ranking.candidates(2, 2);

    assert_eq!(candidates, vec!["Points", "R", "SO", "GB%"]);
}

#[test]
fn test_candidates_deduplicate_overlapping_windows() {
    let ranking = ranking_of(&[("Points", 1.0), ("R", 0.9), ("SO", -0.2)]);

    let candidates = ranking.candidates(30, 10);

    assert_eq!(candidates, vec!["Points", "R", "SO"]);
}

#[test]
fn test_top_and_bottom_windows_clamp() {
    let ranking = ranking_of(&[("Points", 1.0), ("R", 0.9)]);

    assert_eq!(ranking.top(30).len(), 2);
    assert_eq!(ranking.bottom(10).len(), 2);
    assert!(ranking_of(&[]).candidates(30, 10).is_empty());
}

#[test]
fn test_candidates_accept_huge_window_sizes() {
    let ranking = ranking_of(&[("Points", 1.0), ("R", 0.9), ("SO", -0.2)]);

    assert_eq!(ranking.candidates(usize::MAX, 10), vec!["Points", "R", "SO"]);
    assert_eq!(ranking.candidates(1, usize::MAX), vec!["Points", "R", "SO"]);
}
