//! Plain-text rendering of query results.

use super::ResultSet;

/// No-rows message, distinct from an empty table.
pub const NO_RESULTS: &str = "Query returned no results.";

/// Render a result page as a fixed-width pipe-delimited table with a
/// row-count footer. The consumer is an NL agent that reads plain text,
/// so each column is padded to the widest of its header and cells.
pub fn render_table(results: &ResultSet, cap: usize) -> String {
    if results.rows.len() <= 1 {
        return NO_RESULTS.to_string();
    }

    let header = &results.rows[0];
    let data: Vec<&Vec<String>> = results.rows[1..].iter().take(cap).collect();
    let truncated = results.has_more || results.rows.len() - 1 > cap;

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &data {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let pad_row = |row: &[String]| -> String {
        row.iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                format!("{:<1$}", cell, width)
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut lines = Vec::with_capacity(data.len() + 2);
    lines.push(pad_row(header));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &data {
        lines.push(pad_row(row));
    }

    let count = data.len();
    let mut footer = format!(
        "\n({} row{} returned)",
        count,
        if count == 1 { "" } else { "s" }
    );
    if truncated {
        footer.push_str(&format!(" [truncated to {} rows]", cap));
    }

    format!("{}{}", lines.join("\n"), footer)
}
