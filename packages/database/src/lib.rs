#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `DuckDB`-backed record store for the stop ledger.
//!
//! Each normalized dataset is loaded exactly once under a dataset identity
//! (its table name). A second load against the same identity fails with
//! [`DbError::DuplicateDataset`] and leaves the existing data untouched —
//! that existence check is the only mutual exclusion the single-writer
//! model needs. Everything after the load is read-only.

pub mod datasets;
pub mod db;
pub mod query;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// A dataset with this identity has already been loaded.
    #[error("dataset '{dataset}' already exists; load refuses to overwrite")]
    DuplicateDataset {
        /// The dataset identity that was already present.
        dataset: String,
    },

    /// The dataset identity is not a valid table name.
    #[error("invalid dataset name '{dataset}': expected [A-Za-z_][A-Za-z0-9_]*")]
    InvalidDatasetName {
        /// The rejected dataset identity.
        dataset: String,
    },

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Validates a dataset identity for use as a table name.
///
/// Dataset identities are interpolated into query text (table names cannot
/// be bound as parameters), so only identifier characters are accepted.
///
/// # Errors
///
/// Returns [`DbError::InvalidDatasetName`] for empty names, names starting
/// with a digit, or names containing non-identifier characters.
pub fn validate_dataset_name(dataset: &str) -> Result<(), DbError> {
    let mut chars = dataset.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidDatasetName {
            dataset: dataset.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifier_dataset_names() {
        assert!(validate_dataset_name("traffic_stops").is_ok());
        assert!(validate_dataset_name("_v2").is_ok());
        assert!(validate_dataset_name("stops2024").is_ok());
    }

    #[test]
    fn rejects_injectable_dataset_names() {
        assert!(validate_dataset_name("").is_err());
        assert!(validate_dataset_name("2024stops").is_err());
        assert!(validate_dataset_name("stops; DROP TABLE x").is_err());
        assert!(validate_dataset_name("stops\"").is_err());
    }
}
