#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical traffic-stop record types.
//!
//! This crate defines the raw input shape as it arrives from delimited
//! files and the normalized form every downstream consumer (store loader,
//! query catalog, predictor) works with. Field coercion rules live in
//! `stop_ledger_ingest`; this crate only carries the types, the fixed
//! enumerations, and the deterministic default values.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default substituted for a missing `country_name`.
pub const DEFAULT_COUNTRY_NAME: &str = "Unknown";

/// Default substituted for a missing `stop_duration`.
pub const DEFAULT_STOP_DURATION: &str = "0-15 Min";

/// Default substituted for a missing `stop_outcome`, and the fallback
/// outcome when a prediction request matches no historical records.
pub const DEFAULT_STOP_OUTCOME: &str = "Warning";

/// Default substituted for a missing `vehicle_number`.
pub const DEFAULT_VEHICLE_NUMBER: &str = "NA";

/// Fallback violation when a prediction request matches no historical
/// records.
pub const DEFAULT_VIOLATION: &str = "Speeding";

/// Driver gender as accepted by the prediction filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Gender {
    /// Male driver.
    Male,
    /// Female driver.
    Female,
}

impl Gender {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Male, Self::Female]
    }
}

/// The fixed stop-duration buckets used throughout the dataset.
///
/// Raw records carry these as free text; the normalizer defaults missing
/// values to [`DEFAULT_STOP_DURATION`] but never rewrites a present value,
/// so the stored column stays a string. This enum is the declared domain
/// for prediction filters and the duration-to-minutes mapping used by the
/// average-duration query.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum StopDuration {
    /// Up to fifteen minutes.
    #[serde(rename = "0-15 Min")]
    #[strum(serialize = "0-15 Min")]
    Short,
    /// Sixteen to thirty minutes.
    #[serde(rename = "16-30 Min")]
    #[strum(serialize = "16-30 Min")]
    Medium,
    /// More than thirty minutes.
    #[serde(rename = "30+ Min")]
    #[strum(serialize = "30+ Min")]
    Long,
}

impl StopDuration {
    /// Returns the midpoint duration in minutes for this bucket, used
    /// when averaging durations across stops.
    #[must_use]
    pub const fn midpoint_minutes(self) -> f64 {
        match self {
            Self::Short => 7.5,
            Self::Medium => 23.0,
            Self::Long => 40.0,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Short, Self::Medium, Self::Long]
    }
}

/// An untyped traffic-stop row as read from a delimited input file.
///
/// Every field is optional text; cells may be missing or malformed. The
/// legacy columns (`driver_age_raw`, `violation_raw`, `is_arrested`) are
/// accepted on input and discarded before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStopRecord {
    /// Calendar date of the stop as source text.
    pub stop_date: Option<String>,
    /// Time of day of the stop as source text.
    pub stop_time: Option<String>,
    /// Country where the stop occurred.
    pub country_name: Option<String>,
    /// Driver gender as source text.
    pub driver_gender: Option<String>,
    /// Legacy unused age column, dropped before any processing.
    pub driver_age_raw: Option<String>,
    /// Driver age as source text.
    pub driver_age: Option<String>,
    /// Driver race as source text.
    pub driver_race: Option<String>,
    /// Legacy unused violation column, dropped before any processing.
    pub violation_raw: Option<String>,
    /// Violation the driver was stopped for.
    pub violation: Option<String>,
    /// Whether a search was conducted (truthy source text).
    pub search_conducted: Option<String>,
    /// Type of search performed, if any.
    pub search_type: Option<String>,
    /// Duration bucket of the stop.
    pub stop_duration: Option<String>,
    /// Whether the stop was drug related (truthy source text).
    pub drugs_related_stop: Option<String>,
    /// Outcome of the stop (warning, citation, arrest, ...).
    pub stop_outcome: Option<String>,
    /// Legacy arrest flag, redundant with `stop_outcome` and dropped.
    pub is_arrested: Option<String>,
    /// Vehicle registration number.
    pub vehicle_number: Option<String>,
}

impl RawStopRecord {
    /// Every column name this record shape accepts. Input files carrying
    /// any other header are rejected at the normalization boundary.
    pub const COLUMNS: &'static [&'static str] = &[
        "stop_date",
        "stop_time",
        "country_name",
        "driver_gender",
        "driver_age_raw",
        "driver_age",
        "driver_race",
        "violation_raw",
        "violation",
        "search_conducted",
        "search_type",
        "stop_duration",
        "drugs_related_stop",
        "stop_outcome",
        "is_arrested",
        "vehicle_number",
    ];
}

/// A traffic-stop record normalized to the canonical schema.
///
/// Rows missing a critical field (`stop_date`, `stop_time`,
/// `driver_gender`, `driver_age`, `violation` as raw text) never reach
/// this type. Parse failures on non-critical coercions become `None`
/// absent-markers; every other field carries a deterministic default
/// instead of a null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStopRecord {
    /// Calendar date of the stop. `None` when the raw text was present
    /// but unparseable.
    pub stop_date: Option<NaiveDate>,
    /// Time of day of the stop. `None` when the raw text was present
    /// but not strict `HH:MM:SS`.
    pub stop_time: Option<NaiveTime>,
    /// Country where the stop occurred, defaulted to
    /// [`DEFAULT_COUNTRY_NAME`].
    pub country_name: String,
    /// Driver gender, non-empty (critical field).
    pub driver_gender: String,
    /// Driver age. `None` when the raw text was present but non-numeric.
    pub driver_age: Option<f64>,
    /// Driver race, empty string when missing.
    pub driver_race: String,
    /// Violation the driver was stopped for, non-empty (critical field).
    pub violation: String,
    /// Whether a search was conducted.
    pub search_conducted: bool,
    /// Type of search performed, empty string when missing.
    pub search_type: String,
    /// Duration bucket of the stop, defaulted to
    /// [`DEFAULT_STOP_DURATION`].
    pub stop_duration: String,
    /// Whether the stop was drug related.
    pub drugs_related_stop: bool,
    /// Outcome of the stop, defaulted to [`DEFAULT_STOP_OUTCOME`].
    pub stop_outcome: String,
    /// Vehicle registration number, defaulted to
    /// [`DEFAULT_VEHICLE_NUMBER`].
    pub vehicle_number: String,
}
