#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Case-based predictor for stop outcome and violation.
//!
//! The predictor filters the dataset down to records that exactly match
//! the request on gender, age, search flag, duration bucket and drug flag,
//! then takes a majority vote over the matches. Ties break to the value
//! first encountered in dataset order, so the same dataset and request
//! always produce the same answer. Zero matches fall back to the most
//! common overall answer, a warning for speeding.

use std::str::FromStr as _;

use serde::{Deserialize, Serialize};
use stop_ledger_stop_models::{
    DEFAULT_STOP_OUTCOME, DEFAULT_VIOLATION, Gender, NormalizedStopRecord, StopDuration,
};

/// A rejected prediction filter value.
///
/// Raised only while parsing untyped form input; a well-typed request is
/// always answerable, however implausible its values.
#[derive(Debug, thiserror::Error)]
pub enum InvalidFilterError {
    /// The gender string is not a known gender.
    #[error("unknown gender '{value}': expected male or female")]
    Gender {
        /// The rejected input.
        value: String,
    },

    /// The duration string is not a known duration bucket.
    #[error("unknown stop duration '{value}': expected 0-15 Min, 16-30 Min or 30+ Min")]
    Duration {
        /// The rejected input.
        value: String,
    },

    /// The age string is not an integer.
    #[error("invalid driver age '{value}': expected an integer")]
    Age {
        /// The rejected input.
        value: String,
    },

    /// The boolean string is not a recognized yes/no value.
    #[error("invalid boolean '{value}': expected yes/no or true/false")]
    Boolean {
        /// The rejected input.
        value: String,
    },
}

/// The exact-match filter a prediction runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    /// Driver gender to match.
    pub driver_gender: Gender,
    /// Driver age to match, in whole years.
    pub driver_age: i64,
    /// Whether a search was conducted.
    pub search_conducted: bool,
    /// Stop duration bucket to match.
    pub stop_duration: StopDuration,
    /// Whether the stop was drug-related.
    pub drugs_related_stop: bool,
}

impl PredictionRequest {
    /// Parses a request from untyped form strings.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilterError`] for an unknown gender or duration
    /// bucket, a non-integer age, or an unrecognized boolean — before any
    /// matching runs.
    pub fn parse(
        gender: &str,
        age: &str,
        search_conducted: &str,
        duration: &str,
        drugs_related: &str,
    ) -> Result<Self, InvalidFilterError> {
        let driver_gender =
            Gender::from_str(gender.trim()).map_err(|_| InvalidFilterError::Gender {
                value: gender.to_string(),
            })?;
        let driver_age = age
            .trim()
            .parse::<i64>()
            .map_err(|_| InvalidFilterError::Age {
                value: age.to_string(),
            })?;
        let stop_duration =
            StopDuration::from_str(duration.trim()).map_err(|_| InvalidFilterError::Duration {
                value: duration.to_string(),
            })?;

        Ok(Self {
            driver_gender,
            driver_age,
            search_conducted: parse_bool(search_conducted)?,
            stop_duration,
            drugs_related_stop: parse_bool(drugs_related)?,
        })
    }
}

/// The predicted outcome and violation for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    /// Predicted stop outcome.
    pub predicted_outcome: String,
    /// Predicted violation.
    pub predicted_violation: String,
    /// Number of dataset records the request matched.
    pub match_count: usize,
}

/// Predicts the stop outcome and violation for a request against a
/// dataset in its original load order.
///
/// Zero matches yield the default `("Warning", "Speeding")` answer with a
/// match count of zero.
#[must_use]
pub fn predict(dataset: &[NormalizedStopRecord], request: &PredictionRequest) -> PredictionResponse {
    let gender = request.driver_gender.to_string();
    let duration = request.stop_duration.to_string();
    #[allow(clippy::cast_precision_loss)]
    let age = request.driver_age as f64;

    let mut outcomes: Vec<(&str, usize)> = Vec::new();
    let mut violations: Vec<(&str, usize)> = Vec::new();
    let mut match_count = 0;

    for record in dataset {
        let matches = record.driver_gender == gender
            && record.driver_age == Some(age)
            && record.search_conducted == request.search_conducted
            && record.stop_duration == duration
            && record.drugs_related_stop == request.drugs_related_stop;
        if !matches {
            continue;
        }

        match_count += 1;
        tally(&mut outcomes, &record.stop_outcome);
        tally(&mut violations, &record.violation);
    }

    log::debug!("Prediction request matched {match_count} records");

    PredictionResponse {
        predicted_outcome: majority(&outcomes).unwrap_or(DEFAULT_STOP_OUTCOME).to_string(),
        predicted_violation: majority(&violations).unwrap_or(DEFAULT_VIOLATION).to_string(),
        match_count,
    }
}

/// Increments the count for a value, appending it on first sight so the
/// vector preserves first-seen order.
fn tally<'a>(counts: &mut Vec<(&'a str, usize)>, value: &'a str) {
    if let Some(entry) = counts.iter_mut().find(|(v, _)| *v == value) {
        entry.1 += 1;
    } else {
        counts.push((value, 1));
    }
}

/// Returns the value with the highest count; ties go to the value that
/// appeared first.
fn majority<'a>(counts: &[(&'a str, usize)]) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for &(value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

fn parse_bool(value: &str) -> Result<bool, InvalidFilterError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(InvalidFilterError::Boolean {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(
        gender: &str,
        age: f64,
        outcome: &str,
        violation: &str,
    ) -> NormalizedStopRecord {
        NormalizedStopRecord {
            stop_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            stop_time: None,
            country_name: "Canada".to_string(),
            driver_gender: gender.to_string(),
            driver_age: Some(age),
            driver_race: "Other".to_string(),
            violation: violation.to_string(),
            search_conducted: false,
            search_type: String::new(),
            stop_duration: "0-15 Min".to_string(),
            drugs_related_stop: false,
            stop_outcome: outcome.to_string(),
            vehicle_number: "NA".to_string(),
        }
    }

    fn request(age: i64) -> PredictionRequest {
        PredictionRequest {
            driver_gender: Gender::Male,
            driver_age: age,
            search_conducted: false,
            stop_duration: StopDuration::Short,
            drugs_related_stop: false,
        }
    }

    #[test]
    fn majority_vote_among_exact_matches() {
        let dataset = vec![
            record("male", 30.0, "Citation", "Speeding"),
            record("male", 30.0, "Citation", "Signal"),
            record("male", 30.0, "Warning", "Speeding"),
            record("female", 30.0, "Arrest", "DUI"),
            record("male", 45.0, "Arrest", "DUI"),
        ];

        let response = predict(&dataset, &request(30));
        assert_eq!(response.predicted_outcome, "Citation");
        assert_eq!(response.predicted_violation, "Speeding");
        assert_eq!(response.match_count, 3);
    }

    #[test]
    fn ties_break_to_first_seen_dataset_order() {
        let dataset = vec![
            record("male", 30.0, "Warning", "Signal"),
            record("male", 30.0, "Citation", "Speeding"),
            record("male", 30.0, "Citation", "Signal"),
            record("male", 30.0, "Warning", "Speeding"),
        ];

        let response = predict(&dataset, &request(30));
        // Warning and Citation are tied 2-2; Warning appeared first.
        assert_eq!(response.predicted_outcome, "Warning");
        // Signal and Speeding are tied 2-2; Signal appeared first.
        assert_eq!(response.predicted_violation, "Signal");
    }

    #[test]
    fn zero_matches_fall_back_to_defaults() {
        let dataset = vec![record("male", 30.0, "Citation", "DUI")];

        let request = PredictionRequest {
            driver_gender: Gender::Female,
            driver_age: 999,
            search_conducted: true,
            stop_duration: StopDuration::Short,
            drugs_related_stop: false,
        };
        let response = predict(&dataset, &request);
        assert_eq!(response.predicted_outcome, "Warning");
        assert_eq!(response.predicted_violation, "Speeding");
        assert_eq!(response.match_count, 0);
    }

    #[test]
    fn empty_dataset_falls_back_to_defaults() {
        let response = predict(&[], &request(30));
        assert_eq!(response.predicted_outcome, "Warning");
        assert_eq!(response.predicted_violation, "Speeding");
    }

    #[test]
    fn parses_form_strings() {
        let request =
            PredictionRequest::parse("male", "27", "No", "16-30 Min", "Yes").unwrap();
        assert_eq!(request.driver_gender, Gender::Male);
        assert_eq!(request.driver_age, 27);
        assert!(!request.search_conducted);
        assert_eq!(request.stop_duration, StopDuration::Medium);
        assert!(request.drugs_related_stop);
    }

    #[test]
    fn rejects_malformed_form_strings() {
        assert!(matches!(
            PredictionRequest::parse("other", "27", "no", "0-15 Min", "no"),
            Err(InvalidFilterError::Gender { .. })
        ));
        assert!(matches!(
            PredictionRequest::parse("male", "twenty", "no", "0-15 Min", "no"),
            Err(InvalidFilterError::Age { .. })
        ));
        assert!(matches!(
            PredictionRequest::parse("male", "27", "no", "about an hour", "no"),
            Err(InvalidFilterError::Duration { .. })
        ));
        assert!(matches!(
            PredictionRequest::parse("male", "27", "maybe", "0-15 Min", "no"),
            Err(InvalidFilterError::Boolean { .. })
        ));
    }

    #[test]
    fn implausible_age_is_answerable_not_an_error() {
        // The [16, 100] age range is a form constraint; the predictor
        // itself answers any well-typed request.
        let request = PredictionRequest::parse("male", "999", "no", "0-15 Min", "no").unwrap();
        let response = predict(&[], &request);
        assert_eq!(response.predicted_outcome, "Warning");
        assert_eq!(response.predicted_violation, "Speeding");
    }
}
