//! Report Data Structures

use crate::table::Table;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Version of the JSON report layout
pub const SCHEMA_VERSION: u32 = 1;

/// Which pipeline produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Summary of one result file
    Report,
    /// Comparison of two result files
    Compare,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub mode: ReportMode,
    /// Input files, in command-line order
    pub inputs: Vec<String>,
}

/// Complete report: metadata plus every table in print order
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub tables: Vec<Table>,
}

impl Report {
    /// Create a report stamped with the current time
    pub fn new(mode: ReportMode, inputs: Vec<String>, tables: Vec<Table>) -> Self {
        Self {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                mode,
                inputs,
            },
            tables,
        }
    }
}
