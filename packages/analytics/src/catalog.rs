//! The fixed catalog of named aggregate queries.
//!
//! Every entry is static SQL parameterized only by the dataset table name
//! (spliced in after identifier validation). Rate and average expressions
//! are cast to `DOUBLE` so cells come back as floats rather than decimals,
//! and outcome matching uses `ILIKE` because stored outcomes are free text
//! with mixed casing.

use stop_ledger_analytics_models::QueryName;

/// A single catalog entry: human title, SQL template and output columns.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    /// The stable query name.
    pub name: QueryName,
    /// Human-readable title for listings.
    pub title: &'static str,
    /// SQL text with a `{table}` placeholder for the dataset.
    pub sql: &'static str,
    /// Output column names, in select order.
    pub columns: &'static [&'static str],
}

/// Looks up the catalog entry for a query name. Every name has an entry.
#[must_use]
pub const fn entry(name: QueryName) -> &'static CatalogEntry {
    &CATALOG[position(name)]
}

/// Position of each query in [`CATALOG`]. Kept in listing order; the
/// catalog tests verify the mapping.
const fn position(name: QueryName) -> usize {
    match name {
        QueryName::TopDrugStopVehicles => 0,
        QueryName::MostSearchedVehicles => 1,
        QueryName::HighestArrestAge => 2,
        QueryName::GenderByCountry => 3,
        QueryName::TopSearchRateByRaceGender => 4,
        QueryName::BusiestHour => 5,
        QueryName::AvgDurationPerViolation => 6,
        QueryName::NightArrests => 7,
        QueryName::ViolationsWithSearchOrArrest => 8,
        QueryName::ViolationsUnder25 => 9,
        QueryName::ViolationRarelySearchedOrArrested => 10,
        QueryName::DrugStopsByCountry => 11,
        QueryName::CountryWithMostSearches => 12,
        QueryName::YearlyStopsArrestsByCountry => 13,
        QueryName::ViolationTrendsByAgeRace => 14,
        QueryName::StopsByYearMonthHour => 15,
        QueryName::ViolationsHighSearchArrestRates => 16,
        QueryName::DriverDemographicsByCountry => 17,
        QueryName::TopViolationsByArrestRate => 18,
    }
}

/// All catalog entries, in listing order.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: QueryName::TopDrugStopVehicles,
        title: "Top 10 vehicles involved in drug-related stops",
        sql: "SELECT vehicle_number, COUNT(*) AS stop_count
              FROM \"{table}\"
              WHERE drugs_related_stop = TRUE
              GROUP BY vehicle_number
              ORDER BY stop_count DESC, vehicle_number
              LIMIT 10",
        columns: &["vehicle_number", "stop_count"],
    },
    CatalogEntry {
        name: QueryName::MostSearchedVehicles,
        title: "Vehicles most frequently searched",
        sql: "SELECT vehicle_number, COUNT(*) AS search_count
              FROM \"{table}\"
              WHERE search_conducted = TRUE
              GROUP BY vehicle_number
              ORDER BY search_count DESC, vehicle_number
              LIMIT 10",
        columns: &["vehicle_number", "search_count"],
    },
    CatalogEntry {
        name: QueryName::HighestArrestAge,
        title: "Driver age with the highest arrest count",
        sql: "SELECT driver_age, COUNT(*) AS arrest_count
              FROM \"{table}\"
              WHERE stop_outcome ILIKE '%arrest%'
              GROUP BY driver_age
              ORDER BY arrest_count DESC
              LIMIT 1",
        columns: &["driver_age", "arrest_count"],
    },
    CatalogEntry {
        name: QueryName::GenderByCountry,
        title: "Gender distribution of drivers stopped in each country",
        sql: "SELECT country_name, driver_gender, COUNT(*) AS total
              FROM \"{table}\"
              GROUP BY country_name, driver_gender
              ORDER BY country_name, driver_gender",
        columns: &["country_name", "driver_gender", "total"],
    },
    CatalogEntry {
        name: QueryName::TopSearchRateByRaceGender,
        title: "Race and gender combination with the most searches",
        sql: "SELECT driver_race, driver_gender, COUNT(*) AS search_count
              FROM \"{table}\"
              WHERE search_conducted = TRUE
              GROUP BY driver_race, driver_gender
              ORDER BY search_count DESC
              LIMIT 1",
        columns: &["driver_race", "driver_gender", "search_count"],
    },
    CatalogEntry {
        name: QueryName::BusiestHour,
        title: "Time of day with the most traffic stops",
        sql: "SELECT hour(stop_time) AS hour_of_day, COUNT(*) AS stop_count
              FROM \"{table}\"
              GROUP BY hour_of_day
              ORDER BY stop_count DESC
              LIMIT 1",
        columns: &["hour_of_day", "stop_count"],
    },
    CatalogEntry {
        name: QueryName::AvgDurationPerViolation,
        title: "Average stop duration for different violations",
        sql: "SELECT violation, AVG(
                  CASE
                      WHEN stop_duration = '0-15 Min' THEN 7.5
                      WHEN stop_duration = '16-30 Min' THEN 23
                      WHEN stop_duration = '30+ Min' THEN 40
                      ELSE 15
                  END
              )::DOUBLE AS avg_duration_minutes
              FROM \"{table}\"
              GROUP BY violation
              ORDER BY avg_duration_minutes DESC",
        columns: &["violation", "avg_duration_minutes"],
    },
    CatalogEntry {
        name: QueryName::NightArrests,
        title: "Arrests from night-time stops (20:00-05:59)",
        sql: "SELECT COUNT(*) AS arrest_count
              FROM \"{table}\"
              WHERE (hour(stop_time) >= 20 OR hour(stop_time) <= 5)
                AND stop_outcome ILIKE '%arrest%'",
        columns: &["arrest_count"],
    },
    CatalogEntry {
        name: QueryName::ViolationsWithSearchOrArrest,
        title: "Violations most associated with searches or arrests",
        sql: "SELECT violation, COUNT(*) AS incident_count
              FROM \"{table}\"
              WHERE search_conducted = TRUE OR stop_outcome ILIKE '%arrest%'
              GROUP BY violation
              ORDER BY incident_count DESC",
        columns: &["violation", "incident_count"],
    },
    CatalogEntry {
        name: QueryName::ViolationsUnder25,
        title: "Violations most common among drivers under 25",
        sql: "SELECT violation, COUNT(*) AS violation_count
              FROM \"{table}\"
              WHERE driver_age < 25
              GROUP BY violation
              ORDER BY violation_count DESC",
        columns: &["violation", "violation_count"],
    },
    CatalogEntry {
        name: QueryName::ViolationRarelySearchedOrArrested,
        title: "Violation that rarely results in a search or arrest",
        sql: "SELECT violation, COUNT(*) AS count
              FROM \"{table}\"
              WHERE search_conducted = FALSE AND stop_outcome NOT ILIKE '%arrest%'
              GROUP BY violation
              ORDER BY count ASC
              LIMIT 1",
        columns: &["violation", "count"],
    },
    CatalogEntry {
        name: QueryName::DrugStopsByCountry,
        title: "Drug-related stop counts per country",
        sql: "SELECT country_name, COUNT(*) AS drug_stop_count
              FROM \"{table}\"
              WHERE drugs_related_stop = TRUE
              GROUP BY country_name
              ORDER BY drug_stop_count DESC",
        columns: &["country_name", "drug_stop_count"],
    },
    CatalogEntry {
        name: QueryName::CountryWithMostSearches,
        title: "Country with the most searches conducted",
        sql: "SELECT country_name, COUNT(*) AS search_count
              FROM \"{table}\"
              WHERE search_conducted = TRUE
              GROUP BY country_name
              ORDER BY search_count DESC
              LIMIT 1",
        columns: &["country_name", "search_count"],
    },
    CatalogEntry {
        name: QueryName::YearlyStopsArrestsByCountry,
        title: "Yearly breakdown of stops and arrests by country",
        sql: "SELECT
                  country_name,
                  year(stop_date) AS stop_year,
                  COUNT(*) AS total_stops,
                  SUM(CASE WHEN stop_outcome ILIKE '%arrest%' THEN 1 ELSE 0 END) AS total_arrests,
                  ROUND(100.0 * SUM(CASE WHEN stop_outcome ILIKE '%arrest%' THEN 1 ELSE 0 END) / COUNT(*), 2)::DOUBLE AS arrest_rate
              FROM \"{table}\"
              GROUP BY country_name, stop_year
              ORDER BY country_name, stop_year",
        columns: &[
            "country_name",
            "stop_year",
            "total_stops",
            "total_arrests",
            "arrest_rate",
        ],
    },
    CatalogEntry {
        name: QueryName::ViolationTrendsByAgeRace,
        title: "Driver violation trends based on age and race",
        sql: "SELECT
                  driver_race,
                  CASE
                      WHEN driver_age < 25 THEN '<25'
                      WHEN driver_age BETWEEN 25 AND 40 THEN '25-40'
                      WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
                      ELSE '60+'
                  END AS age_group,
                  violation,
                  COUNT(*) AS count
              FROM \"{table}\"
              GROUP BY driver_race, age_group, violation
              ORDER BY driver_race, age_group, count DESC",
        columns: &["driver_race", "age_group", "violation", "count"],
    },
    CatalogEntry {
        name: QueryName::StopsByYearMonthHour,
        title: "Time period analysis of stops",
        sql: "SELECT
                  year(stop_date) AS year,
                  month(stop_date) AS month,
                  hour(stop_time) AS hour,
                  COUNT(*) AS stop_count
              FROM \"{table}\"
              GROUP BY year, month, hour
              ORDER BY year, month, hour",
        columns: &["year", "month", "hour", "stop_count"],
    },
    CatalogEntry {
        name: QueryName::ViolationsHighSearchArrestRates,
        title: "Violations with high search and arrest rates",
        sql: "SELECT
                  violation,
                  COUNT(*) AS total_stops,
                  SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END) AS total_searches,
                  SUM(CASE WHEN stop_outcome ILIKE '%arrest%' THEN 1 ELSE 0 END) AS total_arrests,
                  ROUND(100.0 * SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END) / COUNT(*), 2)::DOUBLE AS search_rate,
                  ROUND(100.0 * SUM(CASE WHEN stop_outcome ILIKE '%arrest%' THEN 1 ELSE 0 END) / COUNT(*), 2)::DOUBLE AS arrest_rate
              FROM \"{table}\"
              GROUP BY violation
              HAVING COUNT(*) > 10
              ORDER BY arrest_rate DESC",
        columns: &[
            "violation",
            "total_stops",
            "total_searches",
            "total_arrests",
            "search_rate",
            "arrest_rate",
        ],
    },
    CatalogEntry {
        name: QueryName::DriverDemographicsByCountry,
        title: "Driver demographics by country",
        sql: "SELECT
                  country_name,
                  driver_gender,
                  driver_race,
                  AVG(driver_age) AS avg_age,
                  COUNT(*) AS total_stops
              FROM \"{table}\"
              GROUP BY country_name, driver_gender, driver_race
              ORDER BY country_name, total_stops DESC",
        columns: &[
            "country_name",
            "driver_gender",
            "driver_race",
            "avg_age",
            "total_stops",
        ],
    },
    CatalogEntry {
        name: QueryName::TopViolationsByArrestRate,
        title: "Top 5 violations with the highest arrest rates",
        sql: "SELECT
                  violation,
                  COUNT(*) AS total_stops,
                  SUM(CASE WHEN stop_outcome ILIKE '%arrest%' THEN 1 ELSE 0 END) AS arrest_count,
                  ROUND(100.0 * SUM(CASE WHEN stop_outcome ILIKE '%arrest%' THEN 1 ELSE 0 END) / COUNT(*), 2)::DOUBLE AS arrest_rate
              FROM \"{table}\"
              GROUP BY violation
              HAVING COUNT(*) > 10
              ORDER BY arrest_rate DESC
              LIMIT 5",
        columns: &["violation", "total_stops", "arrest_count", "arrest_rate"],
    },
];

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn every_query_name_has_an_entry() {
        for name in QueryName::iter() {
            let e = entry(name);
            assert_eq!(e.name, name);
            assert!(e.sql.contains("{table}"));
            assert!(!e.columns.is_empty());
        }
    }

    #[test]
    fn catalog_covers_every_name_exactly_once() {
        assert_eq!(CATALOG.len(), QueryName::iter().count());
    }
}
