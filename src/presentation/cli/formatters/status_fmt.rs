use colored::{ColoredString, Colorize};

use crate::domain::rules::{Direction, FieldDrift};

#[must_use]
pub fn colorize_percent(value: f64) -> ColoredString {
    let text = format!("{value:.1}%");
    if value >= 90.0 {
        text.red().bold()
    } else if value >= 75.0 {
        text.yellow()
    } else {
        text.green()
    }
}

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}

/// One drift line: `Memory usage  80 (was 50, +30)`.
#[must_use]
pub fn format_drift_line(drift: &FieldDrift) -> String {
    let label = format!("{:<14}", drift.field.label());
    let current = trim_number(drift.current);
    match (drift.prior, drift.delta.annotation()) {
        (Some(prior), Some(annotation)) => {
            let annotation = match drift.delta.direction {
                Direction::Up if drift.significant => annotation.red().bold(),
                Direction::Down if drift.significant => annotation.green().bold(),
                _ => annotation.dimmed(),
            };
            format!("{label} {current} (was {}, {annotation})", trim_number(prior))
        }
        _ => format!("{label} {current}"),
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
