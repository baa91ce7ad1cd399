//! One-time dataset loading and full-dataset readback.
//!
//! A dataset identity maps to a single table. Loading creates the table
//! and bulk-inserts the normalized records with a `seq` column recording
//! insertion order, so readback can reproduce the exact order the
//! normalizer emitted — the predictor's tie-break rule depends on it.

use chrono::{NaiveDate, NaiveTime};
use duckdb::Connection;
use stop_ledger_stop_models::NormalizedStopRecord;

use crate::{DbError, validate_dataset_name};

/// Number of rows per INSERT chunk.
const CHUNK_SIZE: usize = 2_000;

/// Number of bound parameters per inserted row (`seq` plus 13 columns).
const PARAMS_PER_ROW: usize = 14;

/// Returns whether a dataset with this identity has already been loaded.
///
/// # Errors
///
/// Returns [`DbError`] if the catalog query fails.
pub fn dataset_exists(conn: &Connection, dataset: &str) -> Result<bool, DbError> {
    let mut stmt = conn.prepare(
        "SELECT COUNT(*) FROM information_schema.tables
         WHERE table_schema = 'main' AND table_name = ?",
    )?;
    let count: i64 = stmt.query_row([dataset], |row| row.get(0))?;
    Ok(count > 0)
}

/// Loads a normalized dataset into the store under the given identity.
///
/// The load is one-time: if the identity already exists the call fails
/// with [`DbError::DuplicateDataset`] before touching any data. Records
/// are inserted in chunks via prepared multi-row statements, preserving
/// their order in a `seq` column.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError`] if the identity is invalid, already loaded, or any
/// statement fails.
pub fn load_dataset(
    conn: &Connection,
    dataset: &str,
    records: &[NormalizedStopRecord],
) -> Result<u64, DbError> {
    validate_dataset_name(dataset)?;

    if dataset_exists(conn, dataset)? {
        return Err(DbError::DuplicateDataset {
            dataset: dataset.to_string(),
        });
    }

    conn.execute_batch(&format!(
        "CREATE TABLE \"{dataset}\" (
            seq BIGINT NOT NULL,
            stop_date DATE,
            stop_time TIME,
            country_name TEXT NOT NULL,
            driver_gender TEXT NOT NULL,
            driver_age DOUBLE,
            driver_race TEXT NOT NULL,
            violation TEXT NOT NULL,
            search_conducted BOOLEAN NOT NULL,
            search_type TEXT NOT NULL,
            stop_duration TEXT NOT NULL,
            drugs_related_stop BOOLEAN NOT NULL,
            stop_outcome TEXT NOT NULL,
            vehicle_number TEXT NOT NULL
        )"
    ))?;

    let mut total_inserted = 0u64;
    let mut seq = 0i64;

    for chunk in records.chunks(CHUNK_SIZE) {
        let mut sql = format!(
            "INSERT INTO \"{dataset}\" (
                seq, stop_date, stop_time, country_name, driver_gender,
                driver_age, driver_race, violation, search_conducted,
                search_type, stop_duration, drugs_related_stop,
                stop_outcome, vehicle_number
            ) VALUES "
        );

        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str("(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
        }

        let mut stmt = conn.prepare(&sql)?;
        let mut param_idx = 1usize;

        for record in chunk {
            let date_text = record
                .stop_date
                .map(|d| d.format("%Y-%m-%d").to_string());
            let time_text = record
                .stop_time
                .map(|t| t.format("%H:%M:%S").to_string());

            stmt.raw_bind_parameter(param_idx, seq)?;
            stmt.raw_bind_parameter(param_idx + 1, date_text.as_deref())?;
            stmt.raw_bind_parameter(param_idx + 2, time_text.as_deref())?;
            stmt.raw_bind_parameter(param_idx + 3, &record.country_name)?;
            stmt.raw_bind_parameter(param_idx + 4, &record.driver_gender)?;
            stmt.raw_bind_parameter(param_idx + 5, record.driver_age)?;
            stmt.raw_bind_parameter(param_idx + 6, &record.driver_race)?;
            stmt.raw_bind_parameter(param_idx + 7, &record.violation)?;
            stmt.raw_bind_parameter(param_idx + 8, record.search_conducted)?;
            stmt.raw_bind_parameter(param_idx + 9, &record.search_type)?;
            stmt.raw_bind_parameter(param_idx + 10, &record.stop_duration)?;
            stmt.raw_bind_parameter(param_idx + 11, record.drugs_related_stop)?;
            stmt.raw_bind_parameter(param_idx + 12, &record.stop_outcome)?;
            stmt.raw_bind_parameter(param_idx + 13, &record.vehicle_number)?;

            param_idx += PARAMS_PER_ROW;
            seq += 1;
        }

        let rows = stmt.raw_execute()?;
        total_inserted += u64::try_from(rows).unwrap_or(0);
    }

    log::info!("Loaded {total_inserted} records into dataset '{dataset}'");
    Ok(total_inserted)
}

/// Returns the number of records stored under a dataset identity.
///
/// # Errors
///
/// Returns [`DbError`] if the identity is invalid or the query fails.
pub fn dataset_row_count(conn: &Connection, dataset: &str) -> Result<u64, DbError> {
    validate_dataset_name(dataset)?;
    let mut stmt = conn.prepare(&format!("SELECT COUNT(*) FROM \"{dataset}\""))?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Reads the full dataset back in insertion (`seq`) order.
///
/// Dates and times come back as text casts and are re-parsed; a stored
/// NULL stays an absent-marker.
///
/// # Errors
///
/// Returns [`DbError`] if the identity is invalid or the query fails.
pub fn fetch_dataset(
    conn: &Connection,
    dataset: &str,
) -> Result<Vec<NormalizedStopRecord>, DbError> {
    validate_dataset_name(dataset)?;

    let mut stmt = conn.prepare(&format!(
        "SELECT stop_date::TEXT, stop_time::TEXT, country_name, driver_gender,
                driver_age, driver_race, violation, search_conducted,
                search_type, stop_duration, drugs_related_stop, stop_outcome,
                vehicle_number
         FROM \"{dataset}\"
         ORDER BY seq"
    ))?;

    let mut rows = stmt.query([])?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        let date_text: Option<String> = row.get(0)?;
        let time_text: Option<String> = row.get(1)?;

        records.push(NormalizedStopRecord {
            stop_date: date_text.as_deref().and_then(parse_stored_date),
            stop_time: time_text.as_deref().and_then(parse_stored_time),
            country_name: row.get(2)?,
            driver_gender: row.get(3)?,
            driver_age: row.get(4)?,
            driver_race: row.get(5)?,
            violation: row.get(6)?,
            search_conducted: row.get(7)?,
            search_type: row.get(8)?,
            stop_duration: row.get(9)?,
            drugs_related_stop: row.get(10)?,
            stop_outcome: row.get(11)?,
            vehicle_number: row.get(12)?,
        });
    }

    Ok(records)
}

/// Parses a `DuckDB` `DATE::TEXT` cast (`YYYY-MM-DD`).
fn parse_stored_date(s: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            log::warn!("Failed to parse stored date: {s:?}");
            None
        }
    }
}

/// Parses a `DuckDB` `TIME::TEXT` cast, with or without fractional
/// seconds.
fn parse_stored_time(s: &str) -> Option<NaiveTime> {
    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return Some(time);
    }
    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M:%S%.f") {
        return Some(time);
    }
    log::warn!("Failed to parse stored time: {s:?}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn record(gender: &str, outcome: &str) -> NormalizedStopRecord {
        NormalizedStopRecord {
            stop_date: NaiveDate::from_ymd_opt(2019, 1, 1),
            stop_time: NaiveTime::from_hms_opt(14, 30, 0),
            country_name: "Canada".to_string(),
            driver_gender: gender.to_string(),
            driver_age: Some(30.0),
            driver_race: "Asian".to_string(),
            violation: "Speeding".to_string(),
            search_conducted: false,
            search_type: String::new(),
            stop_duration: "0-15 Min".to_string(),
            drugs_related_stop: false,
            stop_outcome: outcome.to_string(),
            vehicle_number: "NA".to_string(),
        }
    }

    #[test]
    fn load_then_fetch_round_trips_in_order() {
        let conn = open_in_memory().unwrap();
        let records = vec![
            record("male", "Warning"),
            record("female", "Citation"),
            record("male", "Arrest"),
        ];

        let inserted = load_dataset(&conn, "stops_v1", &records).unwrap();
        assert_eq!(inserted, 3);

        let fetched = fetch_dataset(&conn, "stops_v1").unwrap();
        assert_eq!(fetched, records);
    }

    #[test]
    fn duplicate_load_fails_and_leaves_data_untouched() {
        let conn = open_in_memory().unwrap();
        let records = vec![record("male", "Warning")];

        load_dataset(&conn, "stops_v1", &records).unwrap();

        let second = load_dataset(&conn, "stops_v1", &records);
        assert!(matches!(
            second,
            Err(DbError::DuplicateDataset { dataset }) if dataset == "stops_v1"
        ));
        assert_eq!(dataset_row_count(&conn, "stops_v1").unwrap(), 1);
    }

    #[test]
    fn absent_markers_survive_the_round_trip() {
        let conn = open_in_memory().unwrap();
        let mut rec = record("male", "Warning");
        rec.stop_date = None;
        rec.stop_time = None;
        rec.driver_age = None;

        load_dataset(&conn, "stops_v1", std::slice::from_ref(&rec)).unwrap();

        let fetched = fetch_dataset(&conn, "stops_v1").unwrap();
        assert_eq!(fetched[0].stop_date, None);
        assert_eq!(fetched[0].stop_time, None);
        assert_eq!(fetched[0].driver_age, None);
    }

    #[test]
    fn missing_dataset_is_not_reported_as_loaded() {
        let conn = open_in_memory().unwrap();
        assert!(!dataset_exists(&conn, "nope").unwrap());
    }
}
