#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Names and metric models for the aggregate query catalog.

use serde::{Deserialize, Serialize};

/// Every named query in the catalog.
///
/// Names are stable kebab-case identifiers; there is no free-form SQL
/// surface, so this enum is the complete analytics API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "kebab-case")]
pub enum QueryName {
    /// Top ten vehicles involved in drug-related stops.
    TopDrugStopVehicles,
    /// Top ten most frequently searched vehicles.
    MostSearchedVehicles,
    /// Driver age with the highest arrest count.
    HighestArrestAge,
    /// Gender distribution of stopped drivers per country.
    GenderByCountry,
    /// Race and gender combination with the most searches.
    TopSearchRateByRaceGender,
    /// Hour of day with the most stops.
    BusiestHour,
    /// Average stop duration (in minutes) per violation.
    AvgDurationPerViolation,
    /// Arrest count for night-time stops (20:00-05:59).
    NightArrests,
    /// Violations most associated with searches or arrests.
    ViolationsWithSearchOrArrest,
    /// Most common violations among drivers under 25.
    ViolationsUnder25,
    /// Violation that most rarely results in a search or arrest.
    ViolationRarelySearchedOrArrested,
    /// Drug-related stop counts per country.
    DrugStopsByCountry,
    /// Country with the most searches conducted.
    CountryWithMostSearches,
    /// Yearly stop and arrest breakdown per country.
    YearlyStopsArrestsByCountry,
    /// Violation trends by driver race and age group.
    ViolationTrendsByAgeRace,
    /// Stop counts broken down by year, month and hour.
    StopsByYearMonthHour,
    /// Violations with high search and arrest rates.
    ViolationsHighSearchArrestRates,
    /// Driver demographics (gender, race, average age) per country.
    DriverDemographicsByCountry,
    /// Top five violations by arrest rate.
    TopViolationsByArrestRate,
}

/// Headline counters over a loaded dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSummary {
    /// Total number of stop records.
    pub total_stops: u64,
    /// Stops whose outcome mentions an arrest.
    pub arrests: u64,
    /// Stops whose outcome mentions a warning.
    pub warnings: u64,
    /// Stops flagged as drug-related.
    pub drug_related_stops: u64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn query_names_round_trip_through_strings() {
        for name in QueryName::iter() {
            let text = name.to_string();
            assert_eq!(QueryName::from_str(&text).unwrap(), name);
        }
    }

    #[test]
    fn query_names_are_kebab_case() {
        assert_eq!(
            QueryName::TopDrugStopVehicles.to_string(),
            "top-drug-stop-vehicles"
        );
        assert_eq!(QueryName::BusiestHour.to_string(), "busiest-hour");
    }

    #[test]
    fn unknown_query_name_is_rejected() {
        assert!(QueryName::from_str("drop-table").is_err());
    }
}
