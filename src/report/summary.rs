//! Run summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Counts and timings collected across the pipeline steps
#[derive(Debug, Default)]
pub struct RunSummary {
    pub players: usize,
    pub columns: usize,
    pub missing_points: usize,
    pub correlated_columns: usize,
    pub undefined_correlations: Vec<String>,
    pub candidates: usize,
    pub excluded: Vec<String>,
    pub predictors: usize,
    pub eliminated: usize,
    pub load_time: Duration,
    pub analysis_time: Duration,
    pub fit_time: Duration,
}

impl RunSummary {
    pub fn new(players: usize, columns: usize) -> Self {
        Self {
            players,
            columns,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_analysis_time(&mut self, elapsed: Duration) {
        self.analysis_time = elapsed;
    }

    pub fn set_fit_time(&mut self, elapsed: Duration) {
        self.fit_time = elapsed;
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("⚾ Players"), Cell::new(self.players)]);
        table.add_row(vec![Cell::new("📁 Columns"), Cell::new(self.columns)]);
        table.add_row(vec![
            Cell::new("❔ Missing Points"),
            Cell::new(self.missing_points).fg(if self.missing_points == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("🔗 Correlated Columns"),
            Cell::new(self.correlated_columns),
        ]);
        table.add_row(vec![
            Cell::new("🚫 Undefined Correlations"),
            Cell::new(self.undefined_correlations.len()),
        ]);
        table.add_row(vec![Cell::new("🎯 Candidates"), Cell::new(self.candidates)]);
        table.add_row(vec![
            Cell::new("🗑️  Excluded"),
            Cell::new(self.excluded.len()).fg(if self.excluded.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        if self.eliminated > 0 {
            table.add_row(vec![
                Cell::new("✂️  Eliminated"),
                Cell::new(self.eliminated).fg(Color::Red),
            ]);
        }
        table.add_row(vec![
            Cell::new("✅ Predictors"),
            Cell::new(self.predictors)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format!(
                "{:.2}s",
                (self.load_time + self.analysis_time + self.fit_time).as_secs_f64()
            )),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.excluded.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Excluded Candidates").yellow(),
                style(format!("({})", self.excluded.len())).dim()
            );
            for feature in &self.excluded {
                println!("        {} {}", style("•").dim(), feature);
            }
        }
    }
}
