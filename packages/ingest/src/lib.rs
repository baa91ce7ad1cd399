#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CSV ingestion and normalization for traffic-stop records.
//!
//! Ingestion is a pure pipeline: read raw rows from a delimited file,
//! normalize each one (or reject it for missing critical fields), and
//! write the normalized rows back out or hand them to the store loader.
//! Normalization never consults the store and has no hidden state, so
//! running it twice over the same input produces identical output.

pub mod csv_file;
pub mod normalize;
pub mod pipeline;
pub mod progress;

/// Errors from reading, normalizing or writing stop records.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// CSV parse or serialization error.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input header carries a column this schema does not know.
    #[error("unknown column '{column}' in input header")]
    UnknownColumn {
        /// The unrecognized header name.
        column: String,
    },
}
