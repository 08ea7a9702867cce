//! Table Data Contract
//!
//! A [`Table`] is a header row plus rows of [`Cell`]s of the same arity. The
//! first column labels the row; the rest are usually numbers.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors from building tables
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    /// A row does not have one cell per header
    #[error("Expected {expected} fields, found {found}")]
    ArityMismatch {
        /// Number of headers
        expected: usize,
        /// Number of cells in the rejected row
        found: usize,
    },
}

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Free text, left as-is
    Text(String),
    /// A number, formatted at render time
    Number(f64),
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Number(value) if value.is_finite() => serializer.serialize_f64(*value),
            // JSON has no inf/NaN
            Cell::Number(value) => serializer.collect_str(value),
        }
    }
}

/// A titled table of cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Printed above the table when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Nesting depth, used to indent the table
    pub depth: usize,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given column headers
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: None,
            depth: 0,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the nesting depth
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Append a row, which must have exactly one cell per header.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), TableError> {
        if row.len() != self.headers.len() {
            return Err(TableError::ArityMismatch {
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column headers
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_checks_arity() {
        let mut table = Table::new(["name", "mean"]);
        assert!(table.push_row(vec!["a".into(), 1.0.into()]).is_ok());

        let err = table.push_row(vec!["b".into()]).unwrap_err();
        assert_eq!(
            err,
            TableError::ArityMismatch {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(err.to_string(), "Expected 2 fields, found 1");
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn test_cell_serialization() {
        let cells = vec![
            Cell::from("x"),
            Cell::from(1.5),
            Cell::from(f64::INFINITY),
            Cell::from(f64::NAN),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"["x",1.5,"inf","NaN"]"#);
    }

    #[test]
    fn test_table_serialization() {
        let mut table = Table::new(["name", "mean"]).with_title("suite").with_depth(1);
        table.push_row(vec!["a".into(), 2.0.into()]).unwrap();

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["title"], "suite");
        assert_eq!(value["depth"], 1);
        assert_eq!(value["headers"][1], "mean");
        assert_eq!(value["rows"][0][1], 2.0);
    }
}
