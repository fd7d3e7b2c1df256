use anyhow::Context;
use colored::Colorize;

use crate::application::services::diagnostic::{DiagnosticReport, DiagnosticService};
use crate::application::services::history::PersistOutcome;
use crate::presentation::cli::formatters::finding_fmt;
use crate::presentation::cli::formatters::status_fmt::{
    colorize_percent, format_drift_line, print_section_header,
};
use crate::presentation::cli::formatters::table_fmt::{
    format_aggregation_table, format_entity_table,
};

/// Runs a one-shot diagnostic scan and prints the report.
///
/// # Errors
///
/// Returns an error if the threshold configuration is invalid or JSON
/// serialization fails.
pub fn run_scan(service: &DiagnosticService<'_>, json: bool) -> anyhow::Result<DiagnosticReport> {
    let report = service.run().context("Invalid threshold configuration")?;

    if json {
        print_report_json(&report)?;
    } else {
        print_report_human(&report);
    }

    Ok(report)
}

fn print_report_json(report: &DiagnosticReport) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(report)?;
    println!("{output}");
    Ok(())
}

fn print_report_human(report: &DiagnosticReport) {
    print_section_header("Host health");
    finding_fmt::format_findings(&report.findings);
    println!(
        "Memory {}  Disk {}  Load {:.2}  Processes {}",
        colorize_percent(report.snapshot.mem_pct),
        colorize_percent(report.snapshot.disk_pct),
        report.snapshot.cpu_load,
        report.snapshot.processes
    );

    if !report.top_cpu.is_empty() {
        println!();
        print_section_header("Top CPU");
        println!("{}", format_entity_table(&report.top_cpu));
        println!();
        print_section_header("Top memory");
        println!("{}", format_entity_table(&report.top_memory));
    }

    if let Some(helpers) = &report.app_helpers {
        println!();
        print_section_header("Application helpers");
        println!("{}", format_aggregation_table(helpers));
    }

    if let Some(scripts) = &report.scripts {
        println!();
        print_section_header("Interpreter scripts");
        println!("{}", format_aggregation_table(scripts));
    }

    if !report.drift.is_empty() {
        println!();
        print_section_header("Since last run");
        for drift in &report.drift {
            println!("{}", format_drift_line(drift));
        }
    }

    if !report.fixes.is_empty() {
        println!();
        print_section_header("Suggested fixes");
        for action in report.fixes.list() {
            println!("{}", finding_fmt::format_fix(action));
        }
        println!("{}", "Run `hostcheck fixes --select <indices>` to print their commands".dimmed());
    }

    if let PersistOutcome::Failed(reason) = &report.persist {
        println!();
        println!("{} {reason}", "Snapshot not saved:".yellow());
    }

    finding_fmt::print_summary(report.issues_found, report.warnings_found);
}
