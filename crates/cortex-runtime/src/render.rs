//! Fixed-width markdown table rendering.
//!
//! ```text
//! | REGION | TOTAL |
//! |--------|-------|
//! | Norte  | 10    |
//! ```
//!
//! Widths are measured in chars. Cells longer than the column cap are
//! cropped, never wrapped.

use cortex_settings::AugmenterSettings;
use cortex_sql::QueryResult;
use serde_json::Value;

/// Render up to `max_rows` rows of `result` as a table.
///
/// Returns `None` when there are no columns or no rows. When the result
/// holds more rows than were rendered, `footnote` is appended after a blank
/// line with `{shown}` and `{total}` substituted.
pub fn render_table(
    result: &QueryResult,
    max_rows: usize,
    max_column_width: usize,
    footnote: &str,
) -> Option<String> {
    if result.is_empty() {
        return None;
    }

    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .take(max_rows)
        .map(|row| {
            (0..result.columns.len())
                .map(|i| row.get(i).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let longest = rows.iter().map(|row| row[i].chars().count()).max().unwrap_or(0);
            header.chars().count().max(longest).min(max_column_width)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(result.columns.iter().map(String::as_str), &widths));
    lines.push(separator(&widths));
    for row in &rows {
        lines.push(line(row.iter().map(String::as_str), &widths));
    }
    let mut table = lines.join("\n");

    let total = result.total_rows.max(result.rows.len());
    if total > rows.len() {
        let note = footnote
            .replace("{shown}", &rows.len().to_string())
            .replace("{total}", &total.to_string());
        table.push_str("\n\n");
        table.push_str(&note);
    }
    Some(table)
}

/// Render `result` as the labeled block appended to an answer.
pub fn render_block(result: &QueryResult, settings: &AugmenterSettings) -> Option<String> {
    let table = render_table(
        result,
        settings.max_rows,
        settings.max_column_width,
        &settings.footnote,
    )?;
    Some(format!(
        "\n\n📊 **{}:**\n\n```\n{table}\n```\n",
        settings.block_label
    ))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn fit(cell: &str, width: usize) -> String {
    let cropped: String = cell.chars().take(width).collect();
    format!("{cropped:<width$}")
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let cells: Vec<String> = cells.zip(widths).map(|(cell, &w)| fit(cell, w)).collect();
    format!("| {} |", cells.join(" | "))
}

fn separator(widths: &[usize]) -> String {
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("|{}|", dashes.join("|"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
