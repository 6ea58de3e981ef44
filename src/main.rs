//! Batter-points CLI
//!
//! Fetches a season of batting stats, derives fantasy points, exports the
//! enriched table, ranks every statistic by correlation with the points and
//! fits an OLS regression on the strongest candidates.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use batter_points::cli::Cli;
use batter_points::pipeline::{
    add_points, backward_eliminate, export_with_index, fit_ols, missing_points_count,
    rank_correlations, FanGraphsSource, FileSource, StatsSource, POINTS_COLUMN,
    YAHOO_BATTING_RULES,
};
use batter_points::report::{
    export_regression_report, print_elimination, print_insignificant_hint,
    print_regression_summary, ReportParams, RunSummary,
};
use batter_points::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success, print_warning,
    ConfigCard,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let source: Box<dyn StatsSource> = match &cli.input {
        Some(path) => Box::new(
            FileSource::new(path.clone()).with_infer_schema_length(cli.infer_schema_length),
        ),
        None => Box::new(
            FanGraphsSource::new(cli.source_url.clone())?
                .with_cache_dir(cli.cache_path())
                .with_refresh(cli.refresh),
        ),
    };
    let source_description = source.describe();
    let exclusions = cli.exclusions();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        source: &source_description,
        season: cli.season,
        min_pa: cli.min_pa,
        output: &cli.output,
        top: cli.top,
        bottom: cli.bottom,
        exclusions: exclusions.len(),
        eliminate: cli.eliminate.then_some(cli.alpha),
    });

    // Step 1: Fetch season stats, derive points, export
    print_step_header(1, "Load Season & Score");

    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Fetching {} batting stats...", cli.season));
    let df = source.batting_stats(cli.season, cli.min_pa)?;
    finish_with_success(&spinner, "Season stats loaded");

    let (rows, cols) = df.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Players: {}", rows);
    println!("      Columns: {}", cols);

    let df = add_points(df, &YAHOO_BATTING_RULES)?;
    let mut summary = RunSummary::new(rows, cols);
    summary.missing_points = missing_points_count(&df)?;
    if summary.missing_points > 0 {
        print_warning(&format!(
            "{} player(s) have no Points (missing scoring stats)",
            summary.missing_points
        ));
    }
    print_success("Points column added");

    // Export the enriched table
    export_with_index(&df, &cli.output)?;
    print_success(&format!("Saved to {}", cli.output.display()));

    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Correlation ranking and exclusion
    print_step_header(2, "Correlation Ranking");

    let step_start = Instant::now();
    let ranking = rank_correlations(&df, POINTS_COLUMN)?;
    summary.correlated_columns = ranking.len();
    summary.undefined_correlations = ranking.undefined.clone();

    print_count(
        "column(s) with a defined correlation",
        ranking.len(),
        Some(&format!("({} undefined, dropped)", ranking.undefined.len())),
    );

    let candidates = ranking.candidates(cli.top, cli.bottom);
    let excluded = exclusions.matched(&candidates);
    let predictors = exclusions.apply(&candidates);
    summary.candidates = candidates.len();
    summary.excluded = excluded;
    summary.predictors = predictors.len();

    println!(
        "      {} candidate(s) (top {}, bottom {}), {} after exclusions",
        style(candidates.len()).yellow().bold(),
        cli.top,
        cli.bottom,
        style(predictors.len()).yellow().bold()
    );
    for entry in ranking.top(5) {
        print_info(&format!("{:<16} r = {:+.3}", entry.feature, entry.correlation));
    }

    let analysis_elapsed = step_start.elapsed();
    summary.set_analysis_time(analysis_elapsed);
    print_step_time(analysis_elapsed);

    // Step 3: Regression
    print_step_header(3, "OLS Regression");

    let step_start = Instant::now();
    let spinner = create_spinner("Fitting model...");
    let (fit, eliminated) = if cli.eliminate {
        let result = backward_eliminate(&df, POINTS_COLUMN, &predictors, cli.alpha)?;
        (result.fit, Some(result.removed))
    } else {
        (fit_ols(&df, POINTS_COLUMN, &predictors)?, None)
    };
    finish_with_success(&spinner, "Model fitted");

    summary.predictors = fit.coefficients.len();
    summary.eliminated = eliminated.as_ref().map_or(0, Vec::len);

    print_regression_summary(&fit, cli.alpha);
    if let Some(removed) = &eliminated {
        print_elimination(removed, cli.alpha);
    }
    print_insignificant_hint(&fit, cli.alpha);

    if let Some(path) = &cli.report_json {
        let candidate_entries: Vec<_> = ranking
            .ranked
            .iter()
            .filter(|c| candidates.contains(&c.feature))
            .cloned()
            .collect();
        export_regression_report(
            &fit,
            &candidate_entries,
            exclusions.names(),
            eliminated.as_deref(),
            path,
            &ReportParams {
                season: cli.season,
                min_pa: cli.min_pa,
                source: &source_description,
                export_file: &cli.output,
                alpha: cli.alpha,
            },
        )?;
        print_success(&format!("Report written to {}", path.display()));
    }

    let fit_elapsed = step_start.elapsed();
    summary.set_fit_time(fit_elapsed);
    print_step_time(fit_elapsed);

    summary.display();
    print_completion();

    Ok(())
}
