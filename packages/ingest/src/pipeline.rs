//! The clean step: raw file in, normalized artifact out.

use std::path::Path;

use crate::progress::ProgressCallback;
use crate::{IngestError, csv_file, normalize};

/// Counters from a clean run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Raw rows read from the input file.
    pub rows_read: u64,
    /// Normalized rows written to the output artifact.
    pub rows_written: u64,
    /// Rows rejected for missing critical fields.
    pub rows_rejected: u64,
}

/// Reads a raw delimited file, normalizes it and writes the cleaned
/// artifact.
///
/// # Errors
///
/// Returns [`IngestError`] if the input cannot be read or the output
/// cannot be written. Rejected rows are counted, never an error.
pub fn clean_file(
    input: &Path,
    output: &Path,
    progress: &dyn ProgressCallback,
) -> Result<CleanStats, IngestError> {
    log::info!("Cleaning {} -> {}", input.display(), output.display());

    let raw = csv_file::read_raw_records_from_path(input)?;
    let rows_read = raw.len() as u64;

    let outcome = normalize::normalize(&raw, progress);
    csv_file::write_normalized_to_path(output, &outcome.records)?;

    Ok(CleanStats {
        rows_read,
        rows_written: outcome.records.len() as u64,
        rows_rejected: outcome.rejected,
    })
}
