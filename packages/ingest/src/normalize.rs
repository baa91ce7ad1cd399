//! Field normalization rules.
//!
//! A raw row either becomes a [`NormalizedStopRecord`] or is rejected for
//! missing a critical field. Within a kept row, parse failures on
//! non-critical coercions become `None` absent-markers and missing
//! optional text gets a deterministic default, so the output schema has
//! no surprises for the store or the predictor.

use chrono::{NaiveDate, NaiveTime};
use stop_ledger_stop_models::{
    DEFAULT_COUNTRY_NAME, DEFAULT_STOP_DURATION, DEFAULT_STOP_OUTCOME, DEFAULT_VEHICLE_NUMBER,
    NormalizedStopRecord, RawStopRecord,
};

use crate::progress::ProgressCallback;

/// The result of normalizing a batch of raw rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    /// Rows that passed the critical-field check, in input order.
    pub records: Vec<NormalizedStopRecord>,
    /// Number of rows rejected for missing critical fields.
    pub rejected: u64,
}

/// Normalizes a batch of raw rows, preserving input order.
#[must_use]
pub fn normalize(raw: &[RawStopRecord], progress: &dyn ProgressCallback) -> NormalizeOutcome {
    progress.set_total(raw.len() as u64);

    let mut records = Vec::with_capacity(raw.len());
    let mut rejected = 0u64;

    for row in raw {
        match normalize_record(row) {
            Some(record) => records.push(record),
            None => rejected += 1,
        }
        progress.inc(1);
    }

    if rejected > 0 {
        log::warn!("Rejected {rejected} rows with missing critical fields");
    }
    progress.finish(format!(
        "Normalized {} rows ({rejected} rejected)",
        records.len()
    ));

    NormalizeOutcome { records, rejected }
}

/// Normalizes a single raw row, or rejects it when any critical field
/// (`stop_date`, `stop_time`, `driver_gender`, `driver_age`, `violation`)
/// is missing as raw text. The legacy columns (`driver_age_raw`,
/// `violation_raw`, `is_arrested`) are discarded here.
#[must_use]
pub fn normalize_record(raw: &RawStopRecord) -> Option<NormalizedStopRecord> {
    let stop_date = present(&raw.stop_date)?;
    let stop_time = present(&raw.stop_time)?;
    let driver_gender = present(&raw.driver_gender)?;
    let driver_age = present(&raw.driver_age)?;
    let violation = present(&raw.violation)?;

    Some(NormalizedStopRecord {
        stop_date: parse_date(stop_date),
        stop_time: parse_time(stop_time),
        country_name: text_or(&raw.country_name, DEFAULT_COUNTRY_NAME),
        driver_gender: driver_gender.to_string(),
        driver_age: parse_age(driver_age),
        driver_race: text_or(&raw.driver_race, ""),
        violation: violation.to_string(),
        search_conducted: truthy(&raw.search_conducted),
        search_type: text_or(&raw.search_type, ""),
        stop_duration: text_or(&raw.stop_duration, DEFAULT_STOP_DURATION),
        drugs_related_stop: truthy(&raw.drugs_related_stop),
        stop_outcome: text_or(&raw.stop_outcome, DEFAULT_STOP_OUTCOME),
        vehicle_number: text_or(&raw.vehicle_number, DEFAULT_VEHICLE_NUMBER),
    })
}

/// Returns the trimmed text of a field, treating empty as missing.
fn present(field: &Option<String>) -> Option<&str> {
    match field.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Parses a stop date, accepting ISO `YYYY-MM-DD` with a `MM/DD/YYYY`
/// fallback. Unparseable text becomes an absent-marker, not a rejection.
fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some(date);
    }
    log::debug!("Unparseable stop_date kept as absent: {s:?}");
    None
}

/// Parses a stop time, strict `HH:MM:SS` only.
fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S").ok()
}

/// Parses a driver age as a float; non-numeric and non-finite values
/// become absent-markers.
fn parse_age(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|age| age.is_finite())
}

/// Coerces truthy source text into a flag. Missing text, `0`, numeric
/// zero and any casing of `false` are false; everything else is true.
fn truthy(field: &Option<String>) -> bool {
    let Some(s) = present(field) else {
        return false;
    };
    if s == "0" || s.eq_ignore_ascii_case("false") {
        return false;
    }
    if let Ok(n) = s.parse::<f64>()
        && n == 0.0
    {
        return false;
    }
    true
}

/// Returns the trimmed field text, or the default when missing.
fn text_or(field: &Option<String>, default: &str) -> String {
    present(field).unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use crate::progress::NullProgress;

    use super::*;

    fn raw() -> RawStopRecord {
        RawStopRecord {
            stop_date: Some("2020-01-04".to_string()),
            stop_time: Some("14:30:00".to_string()),
            country_name: Some("Canada".to_string()),
            driver_gender: Some("male".to_string()),
            driver_age_raw: Some("34".to_string()),
            driver_age: Some("27".to_string()),
            driver_race: Some("Asian".to_string()),
            violation_raw: Some("Speeding".to_string()),
            violation: Some("Speeding".to_string()),
            search_conducted: Some("0".to_string()),
            search_type: None,
            stop_duration: Some("16-30 Min".to_string()),
            drugs_related_stop: Some("FALSE".to_string()),
            stop_outcome: Some("Citation".to_string()),
            is_arrested: Some("false".to_string()),
            vehicle_number: Some("KA01AB1234".to_string()),
        }
    }

    #[test]
    fn normalizes_a_complete_row() {
        let record = normalize_record(&raw()).unwrap();
        assert_eq!(record.stop_date, NaiveDate::from_ymd_opt(2020, 1, 4));
        assert_eq!(record.stop_time, NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(record.driver_age, Some(27.0));
        assert!(!record.search_conducted);
        assert!(!record.drugs_related_stop);
        assert_eq!(record.search_type, "");
        assert_eq!(record.stop_outcome, "Citation");
    }

    #[test]
    fn rejects_rows_missing_critical_fields() {
        let strips: [fn(&mut RawStopRecord); 5] = [
            |r| r.stop_date = None,
            |r| r.stop_time = Some("  ".to_string()),
            |r| r.driver_gender = None,
            |r| r.driver_age = Some(String::new()),
            |r| r.violation = None,
        ];
        for strip in strips {
            let mut row = raw();
            strip(&mut row);
            assert_eq!(normalize_record(&row), None);
        }
    }

    #[test]
    fn unparseable_date_keeps_the_row_with_an_absent_marker() {
        let mut row = raw();
        row.stop_date = Some("sometime last week".to_string());
        let record = normalize_record(&row).unwrap();
        assert_eq!(record.stop_date, None);
    }

    #[test]
    fn slash_dates_are_accepted() {
        let mut row = raw();
        row.stop_date = Some("01/04/2020".to_string());
        let record = normalize_record(&row).unwrap();
        assert_eq!(record.stop_date, NaiveDate::from_ymd_opt(2020, 1, 4));
    }

    #[test]
    fn non_numeric_age_keeps_the_row_with_an_absent_marker() {
        let mut row = raw();
        row.driver_age = Some("unknown".to_string());
        let record = normalize_record(&row).unwrap();
        assert_eq!(record.driver_age, None);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let mut row = raw();
        row.country_name = None;
        row.stop_duration = Some(String::new());
        row.stop_outcome = None;
        row.vehicle_number = None;
        row.driver_race = None;

        let record = normalize_record(&row).unwrap();
        assert_eq!(record.country_name, DEFAULT_COUNTRY_NAME);
        assert_eq!(record.stop_duration, DEFAULT_STOP_DURATION);
        assert_eq!(record.stop_outcome, DEFAULT_STOP_OUTCOME);
        assert_eq!(record.vehicle_number, DEFAULT_VEHICLE_NUMBER);
        assert_eq!(record.driver_race, "");
    }

    #[test]
    fn truthy_coercion_handles_numeric_and_text_forms() {
        for falsy in [None, Some(""), Some("0"), Some("0.0"), Some("FALSE"), Some("false")] {
            assert!(!truthy(&falsy.map(ToString::to_string)), "{falsy:?}");
        }
        for true_ish in [Some("1"), Some("true"), Some("TRUE"), Some("yes"), Some("2")] {
            assert!(truthy(&true_ish.map(ToString::to_string)), "{true_ish:?}");
        }
    }

    #[test]
    fn defaulted_rows_end_up_fully_populated() {
        let row = RawStopRecord {
            stop_date: Some("2019-01-01".to_string()),
            stop_time: Some("14:30:00".to_string()),
            driver_gender: Some("male".to_string()),
            driver_age: Some("30".to_string()),
            violation: Some("Speeding".to_string()),
            search_conducted: Some(String::new()),
            stop_duration: Some(String::new()),
            stop_outcome: Some(String::new()),
            ..RawStopRecord::default()
        };

        let record = normalize_record(&row).unwrap();
        assert!(!record.search_conducted);
        assert_eq!(record.stop_duration, "0-15 Min");
        assert_eq!(record.stop_outcome, "Warning");
        for field in [
            &record.country_name,
            &record.stop_duration,
            &record.stop_outcome,
            &record.vehicle_number,
        ] {
            assert!(!field.is_empty());
        }
    }

    /// Re-expresses a normalized record as raw source text.
    fn raw_from_normalized(record: &NormalizedStopRecord) -> RawStopRecord {
        RawStopRecord {
            stop_date: record.stop_date.map(|d| d.format("%Y-%m-%d").to_string()),
            stop_time: record.stop_time.map(|t| t.format("%H:%M:%S").to_string()),
            country_name: Some(record.country_name.clone()),
            driver_gender: Some(record.driver_gender.clone()),
            driver_age_raw: None,
            driver_age: record.driver_age.map(|age| age.to_string()),
            driver_race: Some(record.driver_race.clone()),
            violation_raw: None,
            violation: Some(record.violation.clone()),
            search_conducted: Some(record.search_conducted.to_string()),
            search_type: Some(record.search_type.clone()),
            stop_duration: Some(record.stop_duration.clone()),
            drugs_related_stop: Some(record.drugs_related_stop.to_string()),
            stop_outcome: Some(record.stop_outcome.clone()),
            is_arrested: None,
            vehicle_number: Some(record.vehicle_number.clone()),
        }
    }

    #[test]
    fn renormalizing_normalized_output_is_a_no_op() {
        let first = normalize_record(&raw()).unwrap();
        let again = normalize_record(&raw_from_normalized(&first)).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn batch_normalization_counts_rejections() {
        let mut bad = raw();
        bad.driver_gender = None;

        let outcome = normalize(&[raw(), bad, raw()], &NullProgress);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.records.len(), 2);
    }
}
