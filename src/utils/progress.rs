//! Spinners shown while a pipeline step runs

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TICKS: &str = "◐◓◑◒●";

/// Start a spinner for a step whose duration is unknown (fetching, fitting).
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_message(message.to_string());
    if let Ok(template) = ProgressStyle::with_template("    {spinner:.cyan} {msg} {elapsed:.dim}") {
        pb.set_style(template.tick_chars(SPINNER_TICKS));
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Replace the spinner line with a check mark and `message`.
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    if let Ok(template) = ProgressStyle::with_template("    {msg}") {
        pb.set_style(template);
    }
    pb.finish_with_message(format!("{} {}", style("✓").green().bold(), message));
}
