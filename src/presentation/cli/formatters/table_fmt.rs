use crate::domain::entities::process::{Aggregation, LogicalEntity};
use colored::Colorize;

const NAME_WIDTH: usize = 28;

/// Formats ranked entities as an aligned table, in the order given.
///
/// # Returns
///
/// A multi-line string with header, separator, and entity rows.
#[must_use]
pub fn format_entity_table(entities: &[LogicalEntity]) -> String {
    let header = format!(
        "{:<w$} {:>6} {:>7} {:>10}",
        "NAME",
        "PROCS",
        "CPU%",
        "RAM(MB)",
        w = NAME_WIDTH
    );
    let separator = "─".repeat(header.chars().count());

    let mut rows = vec![header, separator];
    rows.extend(entities.iter().map(entity_row));
    rows.join("\n")
}

/// Ranked groups followed by the bold `TOTAL` row.
#[must_use]
pub fn format_aggregation_table(aggregation: &Aggregation) -> String {
    let mut table = format_entity_table(&aggregation.entities);
    table.push('\n');
    table.push_str(&entity_row(&aggregation.total).bold().to_string());
    table
}

fn entity_row(entity: &LogicalEntity) -> String {
    let name: String = entity
        .group_key
        .chars()
        .filter(|c| *c != '\x1b')
        .take(NAME_WIDTH - 1)
        .collect();
    format!(
        "{:<w$} {:>6} {:>7.1} {:>10.1}",
        name,
        entity.member_count,
        entity.total_cpu_pct,
        entity.total_rss_mb,
        w = NAME_WIDTH
    )
}
