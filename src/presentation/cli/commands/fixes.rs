use anyhow::Context;
use colored::Colorize;

use crate::application::services::diagnostic::DiagnosticService;
use crate::domain::entities::fix_action::{FixAction, FixRegistry, Selection};
use crate::presentation::cli::formatters::finding_fmt::format_fix;
use crate::presentation::cli::formatters::status_fmt::print_section_header;

/// Runs a diagnostic pass and shows the queued fixes.
///
/// Without a selection every queued fix is listed. With one, the matching
/// commands are printed one per line for the operator to run. Nothing is
/// ever executed.
///
/// # Errors
///
/// Returns an error if the threshold configuration is invalid or JSON
/// serialization fails.
pub fn run_fixes(
    service: &DiagnosticService<'_>,
    select: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let report = service.run().context("Invalid threshold configuration")?;
    let selected = select_fixes(&report.fixes, select);

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else if select.is_some() {
        print_commands(&selected);
    } else {
        print_listing(&report.fixes);
    }
    Ok(())
}

/// Fixes picked by `select`, every fix when there is no selection.
#[must_use]
pub fn select_fixes<'r>(fixes: &'r FixRegistry, select: Option<&str>) -> Vec<&'r FixAction> {
    let selection = select.map_or(Selection::All, Selection::parse);
    fixes.resolve(&selection)
}

fn print_listing(fixes: &FixRegistry) {
    print_section_header("Queued fixes");
    if fixes.is_empty() {
        println!("{}", "Nothing to fix".green());
        return;
    }
    for action in fixes.list() {
        println!("{}", format_fix(action));
    }
}

fn print_commands(selected: &[&FixAction]) {
    for action in selected {
        println!("# {}", action.label);
        println!("{}", action.command);
    }
}
