//! Store connection utilities.
//!
//! The connection is an explicitly constructed object that callers open,
//! pass around, and drop when done — there is no process-wide singleton.

use std::path::Path;

use duckdb::Connection;

use crate::DbError;

/// Opens (or creates) the ledger database file at the given path.
///
/// # Errors
///
/// Returns [`DbError`] if the parent directory cannot be created or the
/// connection fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| DbError::Conversion {
            message: format!("Failed to create {}: {e}", parent.display()),
        })?;
    }

    let conn = Connection::open(path)?;
    log::debug!("Opened ledger database at {}", path.display());
    Ok(conn)
}

/// Opens an in-memory database, used by tests and throwaway sessions.
///
/// # Errors
///
/// Returns [`DbError`] if the connection fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    Ok(Connection::open_in_memory()?)
}

/// Returns the ledger database path from the `STOP_LEDGER_DB` environment
/// variable, falling back to `data/stop_ledger.duckdb`.
#[must_use]
pub fn default_path() -> std::path::PathBuf {
    std::env::var("STOP_LEDGER_DB")
        .map_or_else(|_| "data/stop_ledger.duckdb".into(), Into::into)
}
