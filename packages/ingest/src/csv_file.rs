//! Delimited-file reading and writing.
//!
//! Raw input files must carry a header row; any header this schema does
//! not know fails the whole file, so schema drift surfaces immediately
//! instead of silently dropping a column. Normalized output uses a fixed
//! snake_case column order with absent-markers written as empty cells,
//! and can be read back losslessly for the load step.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use stop_ledger_stop_models::{NormalizedStopRecord, RawStopRecord};

use crate::IngestError;

/// Column order of the normalized artifact.
pub const NORMALIZED_COLUMNS: &[&str] = &[
    "stop_date",
    "stop_time",
    "country_name",
    "driver_gender",
    "driver_age",
    "driver_race",
    "violation",
    "search_conducted",
    "search_type",
    "stop_duration",
    "drugs_related_stop",
    "stop_outcome",
    "vehicle_number",
];

/// Reads raw stop rows from a delimited source.
///
/// # Errors
///
/// Returns [`IngestError::UnknownColumn`] if the header carries a column
/// outside the known schema, or a CSV error for malformed input.
pub fn read_raw_records<R: Read>(reader: R) -> Result<Vec<RawStopRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    for header in csv_reader.headers()? {
        if !RawStopRecord::COLUMNS.contains(&header) {
            return Err(IngestError::UnknownColumn {
                column: header.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        records.push(row?);
    }

    log::debug!("Read {} raw rows", records.len());
    Ok(records)
}

/// Reads raw stop rows from a file path.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or parsed.
pub fn read_raw_records_from_path(path: &Path) -> Result<Vec<RawStopRecord>, IngestError> {
    read_raw_records(File::open(path)?)
}

/// Writes normalized records as the cleaned intermediate artifact.
///
/// # Errors
///
/// Returns [`IngestError`] on any write failure.
pub fn write_normalized<W: Write>(
    writer: W,
    records: &[NormalizedStopRecord],
) -> Result<(), IngestError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(NormalizedRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes normalized records to a file path, creating parent directories.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be created or written.
pub fn write_normalized_to_path(
    path: &Path,
    records: &[NormalizedStopRecord],
) -> Result<(), IngestError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    write_normalized(File::create(path)?, records)
}

/// Reads a cleaned intermediate artifact back into normalized records.
///
/// # Errors
///
/// Returns [`IngestError`] for malformed input.
pub fn read_normalized<R: Read>(reader: R) -> Result<Vec<NormalizedStopRecord>, IngestError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize::<NormalizedRow>() {
        records.push(row?.into());
    }
    Ok(records)
}

/// Reads a cleaned intermediate artifact from a file path.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or parsed.
pub fn read_normalized_from_path(path: &Path) -> Result<Vec<NormalizedStopRecord>, IngestError> {
    read_normalized(File::open(path)?)
}

/// The flat serialization shape of the normalized artifact. Dates and
/// times are stored as text so absent-markers round-trip as empty cells.
#[derive(Debug, Serialize, Deserialize)]
struct NormalizedRow {
    stop_date: Option<NaiveDate>,
    stop_time: Option<NaiveTime>,
    country_name: String,
    driver_gender: String,
    driver_age: Option<f64>,
    driver_race: String,
    violation: String,
    search_conducted: bool,
    search_type: String,
    stop_duration: String,
    drugs_related_stop: bool,
    stop_outcome: String,
    vehicle_number: String,
}

impl From<&NormalizedStopRecord> for NormalizedRow {
    fn from(record: &NormalizedStopRecord) -> Self {
        Self {
            stop_date: record.stop_date,
            stop_time: record.stop_time,
            country_name: record.country_name.clone(),
            driver_gender: record.driver_gender.clone(),
            driver_age: record.driver_age,
            driver_race: record.driver_race.clone(),
            violation: record.violation.clone(),
            search_conducted: record.search_conducted,
            search_type: record.search_type.clone(),
            stop_duration: record.stop_duration.clone(),
            drugs_related_stop: record.drugs_related_stop,
            stop_outcome: record.stop_outcome.clone(),
            vehicle_number: record.vehicle_number.clone(),
        }
    }
}

impl From<NormalizedRow> for NormalizedStopRecord {
    fn from(row: NormalizedRow) -> Self {
        Self {
            stop_date: row.stop_date,
            stop_time: row.stop_time,
            country_name: row.country_name,
            driver_gender: row.driver_gender,
            driver_age: row.driver_age,
            driver_race: row.driver_race,
            violation: row.violation,
            search_conducted: row.search_conducted,
            search_type: row.search_type,
            stop_duration: row.stop_duration,
            drugs_related_stop: row.drugs_related_stop,
            stop_outcome: row.stop_outcome,
            vehicle_number: row.vehicle_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_CSV: &str = "\
stop_date,stop_time,country_name,driver_gender,driver_age,violation,search_conducted,stop_duration,drugs_related_stop,stop_outcome,vehicle_number
2020-01-04,14:30:00,Canada,male,27,Speeding,0,16-30 Min,FALSE,Citation,KA01AB1234
2020-01-05,,India,female,34,Signal,1,0-15 Min,0,Warning,
";

    #[test]
    fn reads_raw_rows_with_a_partial_header() {
        let records = read_raw_records(RAW_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].driver_gender.as_deref(), Some("male"));
        assert_eq!(records[0].driver_age_raw, None);
        assert_eq!(records[1].stop_time, None);
        assert_eq!(records[1].vehicle_number, None);
    }

    #[test]
    fn rejects_unknown_columns_for_the_whole_file() {
        let csv = "stop_date,stop_speed\n2020-01-04,88\n";
        let result = read_raw_records(csv.as_bytes());
        assert!(matches!(
            result,
            Err(IngestError::UnknownColumn { column }) if column == "stop_speed"
        ));
    }

    #[test]
    fn normalized_artifact_round_trips() {
        let record = NormalizedStopRecord {
            stop_date: chrono::NaiveDate::from_ymd_opt(2020, 1, 4),
            stop_time: None,
            country_name: "Canada".to_string(),
            driver_gender: "male".to_string(),
            driver_age: Some(27.0),
            driver_race: String::new(),
            violation: "Speeding".to_string(),
            search_conducted: false,
            search_type: String::new(),
            stop_duration: "16-30 Min".to_string(),
            drugs_related_stop: false,
            stop_outcome: "Citation".to_string(),
            vehicle_number: "KA01AB1234".to_string(),
        };

        let mut buffer = Vec::new();
        write_normalized(&mut buffer, std::slice::from_ref(&record)).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with(&NORMALIZED_COLUMNS.join(",")));

        let read_back = read_normalized(buffer.as_slice()).unwrap();
        assert_eq!(read_back, vec![record]);
    }
}
