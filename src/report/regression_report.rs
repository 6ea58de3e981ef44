//! Plain-text regression summary

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{EliminationStep, OlsFit};

/// Render the fit as a two-table summary: model diagnostics, then coefficients.
///
/// P-values above `alpha` are highlighted.
pub fn render_regression_summary(fit: &OlsFit, alpha: f64) -> String {
    let mut model = Table::new();
    model.load_preset(UTF8_FULL_CONDENSED);
    model.set_header(vec![
        Cell::new("OLS Regression Results").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
    ]);
    model.add_row(vec![
        Cell::new("Dep. Variable:"),
        Cell::new(&fit.response),
        Cell::new("R-squared (uncentered):"),
        Cell::new(format!("{:.3}", fit.r_squared)),
    ]);
    model.add_row(vec![
        Cell::new("Model:"),
        Cell::new("OLS"),
        Cell::new("Adj. R-squared (uncentered):"),
        Cell::new(format!("{:.3}", fit.adj_r_squared)),
    ]);
    model.add_row(vec![
        Cell::new("Method:"),
        Cell::new("Least Squares"),
        Cell::new("F-statistic:"),
        Cell::new(format_stat(fit.f_statistic)),
    ]);
    model.add_row(vec![
        Cell::new("No. Observations:"),
        Cell::new(fit.n_obs),
        Cell::new("Prob (F-statistic):"),
        Cell::new(format_p(fit.f_p_value)),
    ]);
    model.add_row(vec![
        Cell::new("Df Residuals:"),
        Cell::new(fit.df_resid),
        Cell::new("Log-Likelihood:"),
        Cell::new(format!("{:.2}", fit.log_likelihood)),
    ]);
    model.add_row(vec![
        Cell::new("Df Model:"),
        Cell::new(fit.df_model),
        Cell::new("AIC:"),
        Cell::new(format!("{:.1}", fit.aic)),
    ]);
    model.add_row(vec![
        Cell::new("Rows dropped (missing):"),
        Cell::new(fit.n_dropped),
        Cell::new("BIC:"),
        Cell::new(format!("{:.1}", fit.bic)),
    ]);
    model.add_row(vec![
        Cell::new("Covariance Type:"),
        Cell::new("nonrobust"),
        Cell::new("Durbin-Watson:"),
        Cell::new(format!("{:.3}", fit.durbin_watson)),
    ]);

    let mut coefs = Table::new();
    coefs.load_preset(UTF8_FULL_CONDENSED);
    coefs.set_header(
        ["", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"]
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    for c in &fit.coefficients {
        let p_cell = Cell::new(format_p(c.p_value)).set_alignment(CellAlignment::Right);
        let p_cell = if c.is_significant(alpha) {
            p_cell
        } else {
            p_cell.fg(Color::Yellow)
        };
        coefs.add_row(vec![
            Cell::new(&c.name),
            number_cell(c.estimate),
            number_cell(c.std_error),
            number_cell(c.t_statistic),
            p_cell,
            number_cell(c.ci_lower),
            number_cell(c.ci_upper),
        ]);
    }

    format!("{}\n{}", model, coefs)
}

/// Print the summary, indented like the other step output.
pub fn print_regression_summary(fit: &OlsFit, alpha: f64) {
    println!();
    for line in render_regression_summary(fit, alpha).lines() {
        println!("    {}", line);
    }
}

/// Print the predictors a human should consider dropping before re-running.
pub fn print_insignificant_hint(fit: &OlsFit, alpha: f64) {
    let weak = fit.insignificant(alpha);
    println!();
    if weak.is_empty() {
        println!(
            "    {} All predictors significant at p <= {}",
            style("✓").green().bold(),
            alpha
        );
        return;
    }

    println!(
        "    {} {} predictor(s) with p > {} (candidates to drop and re-run with --exclude):",
        style("!").yellow().bold(),
        style(weak.len()).yellow().bold(),
        alpha
    );
    for c in weak {
        println!(
            "        {} {} {}",
            style("•").dim(),
            c.name,
            style(format!("(p = {})", format_p(c.p_value))).dim()
        );
    }
}

/// Print the backward-elimination history.
pub fn print_elimination(removed: &[EliminationStep], alpha: f64) {
    println!();
    if removed.is_empty() {
        println!(
            "    {} Backward elimination removed nothing (alpha = {})",
            style("✓").green().bold(),
            alpha
        );
        return;
    }
    println!(
        "    {} Backward elimination removed {} predictor(s) (alpha = {}):",
        style("✧").cyan(),
        style(removed.len()).yellow().bold(),
        alpha
    );
    for (i, step) in removed.iter().enumerate() {
        println!(
            "        {}. {} {}",
            i + 1,
            step.predictor,
            style(format!("(p = {})", format_p(step.p_value))).dim()
        );
    }
}

fn number_cell(value: f64) -> Cell {
    Cell::new(format_stat(value)).set_alignment(CellAlignment::Right)
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if value != 0.0 && (value.abs() >= 1e5 || value.abs() < 1e-3) {
        format!("{:.3e}", value)
    } else {
        format!("{:.4}", value)
    }
}

fn format_p(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value < 1e-3 {
        format!("{:.2e}", value)
    } else {
        format!("{:.3}", value)
    }
}
