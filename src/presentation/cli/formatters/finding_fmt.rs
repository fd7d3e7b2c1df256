use colored::Colorize;

use crate::domain::entities::finding::Finding;
use crate::domain::entities::fix_action::FixAction;
use crate::domain::value_objects::severity::Severity;

/// Strips ANSI/OSC escape sequences from a string to prevent terminal injection.
fn sanitize_terminal(input: &str) -> String {
    input.chars().filter(|c| *c != '\x1b').collect()
}

fn severity_badge(severity: Severity) -> String {
    let label = format!(" {severity:<8} ");
    match severity {
        Severity::Critical => format!("{}", label.on_red().white().bold()),
        Severity::Warning => format!("{}", label.on_yellow().black().bold()),
        Severity::Ok => format!("{}", label.green()),
        Severity::Info => format!("{}", label.blue()),
    }
}

/// One finding as a single line: badge, symbol and message.
#[must_use]
pub fn format_finding(finding: &Finding) -> String {
    let message = sanitize_terminal(&finding.message);
    let message = if finding.severity.is_actionable() {
        message.bold().to_string()
    } else {
        message
    };
    format!(
        "{} {} {}",
        severity_badge(finding.severity),
        finding.severity.symbol(),
        message
    )
}

pub fn format_findings(findings: &[Finding]) {
    for finding in findings {
        println!("{}", format_finding(finding));
    }
}

/// A queued fix as `[index] label  command`.
#[must_use]
pub fn format_fix(action: &FixAction) -> String {
    format!(
        "[{}] {}  {}",
        action.index,
        sanitize_terminal(&action.label),
        sanitize_terminal(&action.command).cyan()
    )
}

pub fn print_summary(issues: u32, warnings: u32) {
    println!();
    if issues == 0 && warnings == 0 {
        println!("{}", "✔ Host looks healthy".green().bold());
    } else {
        let issues = format!("{issues} issue(s)");
        let warnings = format!("{warnings} warning(s)");
        println!("{} and {}", issues.red().bold(), warnings.yellow().bold());
    }
}
