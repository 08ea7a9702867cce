//! CSV Output
//!
//! Every table is written as a block: a header record followed by its rows.
//! The first column holds the table title so blocks can be told apart.

use crate::report::Report;
use crate::table::Cell;

const TABLE_COLUMN: &str = "table";

/// Generate a CSV report.
///
/// Numbers are written with full precision.
pub fn generate_csv_report(report: &Report) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for table in &report.tables {
        let title = table.title.as_deref().unwrap_or_default();

        let mut header = Vec::with_capacity(table.headers().len() + 1);
        header.push(TABLE_COLUMN.to_string());
        header.extend(table.headers().iter().cloned());
        wtr.write_record(&header)?;

        for row in table.rows() {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(title.to_string());
            record.extend(row.iter().map(csv_field));
            wtr.write_record(&record)?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn csv_field(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Number(value) => value.to_string(),
    }
}
