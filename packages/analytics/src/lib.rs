#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Aggregate analytics over loaded stop datasets.
//!
//! The analytics surface is a fixed catalog of named queries plus a small
//! set of headline counters. There is no free-form SQL entry point; the
//! dataset identity is the only caller-supplied value that reaches query
//! text, and it is validated as an identifier first.

use duckdb::Connection;
use stop_ledger_analytics_models::{QueryName, StopSummary};
use stop_ledger_database::{DbError, query::run_query, validate_dataset_name};
use stop_ledger_database_models::{CellValue, TabularResult};

pub mod cache;
pub mod catalog;

/// Errors from running catalog queries.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Query execution failed. Distinct from an empty result, which is a
    /// successful [`TabularResult`] with no rows.
    #[error("query execution failed: {0}")]
    Query(#[from] DbError),
}

/// Runs a named catalog query against a loaded dataset.
///
/// # Errors
///
/// Returns [`AnalyticsError::Query`] if the dataset identity is invalid or
/// execution fails. An empty result set is `Ok`.
pub fn run(
    conn: &Connection,
    dataset: &str,
    name: QueryName,
) -> Result<TabularResult, AnalyticsError> {
    validate_dataset_name(dataset).map_err(AnalyticsError::Query)?;

    let entry = catalog::entry(name);
    let sql = entry.sql.replace("{table}", dataset);
    log::debug!("Running catalog query '{name}' on dataset '{dataset}'");

    let rows = run_query(conn, &sql, entry.columns.len())?;
    Ok(TabularResult::new(entry.columns, rows))
}

/// Computes the headline counters for a dataset: total stops, arrests,
/// warnings and drug-related stops. Outcome matching is a case-insensitive
/// substring test, mirroring how the catalog queries classify outcomes.
///
/// # Errors
///
/// Returns [`AnalyticsError::Query`] if the dataset identity is invalid or
/// execution fails.
pub fn summary(conn: &Connection, dataset: &str) -> Result<StopSummary, AnalyticsError> {
    validate_dataset_name(dataset).map_err(AnalyticsError::Query)?;

    let sql = format!(
        "SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN stop_outcome ILIKE '%arrest%' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN stop_outcome ILIKE '%warning%' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN drugs_related_stop THEN 1 ELSE 0 END), 0)
         FROM \"{dataset}\""
    );

    let rows = run_query(conn, &sql, 4)?;
    let row = rows.first().ok_or_else(|| {
        AnalyticsError::Query(DbError::Conversion {
            message: "summary query returned no rows".to_string(),
        })
    })?;

    Ok(StopSummary {
        total_stops: cell_to_count(&row[0])?,
        arrests: cell_to_count(&row[1])?,
        warnings: cell_to_count(&row[2])?,
        drug_related_stops: cell_to_count(&row[3])?,
    })
}

fn cell_to_count(cell: &CellValue) -> Result<u64, AnalyticsError> {
    match cell {
        CellValue::Int(i) => u64::try_from(*i).map_err(|_| {
            AnalyticsError::Query(DbError::Conversion {
                message: format!("negative count: {i}"),
            })
        }),
        other => Err(AnalyticsError::Query(DbError::Conversion {
            message: format!("expected integer count, got {other:?}"),
        })),
    }
}
