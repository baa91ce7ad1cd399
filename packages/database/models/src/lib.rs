#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Tabular query-result types.
//!
//! Results come back from the store as untyped tables: a list of column
//! names plus rows of loosely typed cells. An empty table is a normal,
//! successful outcome and is distinct from a query execution error, which
//! surfaces as an `Err` on the query call itself.

use serde::{Deserialize, Serialize};

/// A single loosely typed cell in a query result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum CellValue {
    /// SQL NULL.
    Null,
    /// Boolean column value.
    Bool(bool),
    /// Any integer-typed column value, widened to 64 bits.
    Int(i64),
    /// Any floating-point column value.
    Float(f64),
    /// Text column value.
    Text(String),
}

impl CellValue {
    /// Renders the cell for plain-text table output.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f:.2}"),
            Self::Text(s) => s.clone(),
        }
    }
}

/// A tabular query result: ordered column names plus rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularResult {
    /// Column names in output order.
    pub columns: Vec<String>,
    /// Result rows; each row has one cell per column.
    pub rows: Vec<Vec<CellValue>>,
}

impl TabularResult {
    /// Creates a result from static column names and rows.
    #[must_use]
    pub fn new(columns: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows,
        }
    }

    /// Returns `true` when the query matched no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of result rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
