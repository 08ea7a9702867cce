//! Text Rendering
//!
//! Aligned plain-text tables: the label column is left-aligned, every other
//! column right-aligned, with a dashed rule under the headers.

use crate::report::Report;
use crate::table::{Cell, Table};

/// Decimal places used for numbers unless configured otherwise
pub const DEFAULT_PRECISION: usize = 3;

const COLUMN_SEPARATOR: &str = "   ";
const INDENT: &str = "  ";

/// Format one cell. Non-finite numbers print as `inf`, `-inf` or `NaN`.
pub fn format_cell(cell: &Cell, precision: usize) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Number(value) => format!("{:.*}", precision, value),
    }
}

/// Render one table, indented by its depth.
pub fn render_table(table: &Table, precision: usize) -> String {
    let line_start = INDENT.repeat(table.depth);
    let formatted: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|c| format_cell(c, precision)).collect())
        .collect();

    let mut widths: Vec<usize> = table.headers().iter().map(|h| h.chars().count()).collect();
    for row in &formatted {
        for (width, field) in widths.iter_mut().zip(row) {
            *width = (*width).max(field.chars().count());
        }
    }

    let mut output = String::new();
    if let Some(title) = &table.title {
        output.push_str(&format!("{}{}:\n", line_start, title));
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut output, &line_start, table.headers(), &widths);
    push_line(&mut output, &line_start, &rule, &widths);
    for row in &formatted {
        push_line(&mut output, &line_start, row, &widths);
    }
    output
}

fn push_line(output: &mut String, line_start: &str, fields: &[String], widths: &[usize]) {
    let line = fields
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (field, width))| {
            if i == 0 {
                format!("{:<width$}", field, width = width)
            } else {
                format!("{:>width$}", field, width = width)
            }
        })
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR);

    output.push_str(line_start);
    output.push_str(line.trim_end());
    output.push('\n');
}

/// Render every table of a report, separated by blank lines.
pub fn generate_human_report(report: &Report, precision: usize) -> String {
    report
        .tables
        .iter()
        .filter(|table| !table.is_empty())
        .map(|table| render_table(table, precision))
        .collect::<Vec<_>>()
        .join("\n")
}
