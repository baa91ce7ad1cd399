#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the stop ledger toolchain.
//!
//! Drives the full flow: clean a raw delimited file into the normalized
//! artifact, load it once under a dataset identity, run catalog queries
//! and summaries, and answer prediction requests.
//!
//! Uses `indicatif-log-bridge` (via [`stop_ledger_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

use std::path::PathBuf;
use std::str::FromStr as _;

use clap::{Parser, Subcommand};
use stop_ledger_analytics::catalog::CATALOG;
use stop_ledger_analytics_models::QueryName;
use stop_ledger_cli_utils::IndicatifProgress;
use stop_ledger_database::{datasets, db};
use stop_ledger_database_models::{CellValue, TabularResult};
use stop_ledger_ingest::{csv_file, normalize, pipeline};
use stop_ledger_predict::PredictionRequest;

/// Declared age range of the prediction form.
const MIN_FORM_AGE: i64 = 16;
const MAX_FORM_AGE: i64 = 100;

#[derive(Parser)]
#[command(name = "stop_ledger", about = "Traffic-stop records toolchain")]
struct Cli {
    /// Path to the ledger database file (defaults to `STOP_LEDGER_DB` or
    /// `data/stop_ledger.duckdb`)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw delimited file into the cleaned artifact
    Clean {
        /// Raw input file
        input: PathBuf,
        /// Cleaned output file
        output: PathBuf,
    },
    /// Load a cleaned artifact into the store under a dataset identity
    Load {
        /// Cleaned input file (output of `clean`)
        input: PathBuf,
        /// Dataset identity to load under (one-time; never overwrites)
        dataset: String,
    },
    /// Clean a raw file and load it in one step
    Pipeline {
        /// Raw input file
        input: PathBuf,
        /// Dataset identity to load under
        dataset: String,
        /// Also write the cleaned artifact to this path
        #[arg(long)]
        cleaned: Option<PathBuf>,
    },
    /// List the available catalog queries
    Queries,
    /// Run a named catalog query against a loaded dataset
    Query {
        /// Dataset identity
        dataset: String,
        /// Query name (see `queries`)
        name: String,
        /// Emit the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print headline counters for a loaded dataset
    Summary {
        /// Dataset identity
        dataset: String,
        /// Emit the counters as JSON
        #[arg(long)]
        json: bool,
    },
    /// Predict stop outcome and violation for a driver profile
    Predict {
        /// Dataset identity
        dataset: String,
        /// Driver gender (male / female)
        #[arg(long)]
        gender: String,
        /// Driver age in whole years
        #[arg(long)]
        age: String,
        /// Was a search conducted? (yes / no)
        #[arg(long, default_value = "no")]
        search_conducted: String,
        /// Stop duration bucket (0-15 Min / 16-30 Min / 30+ Min)
        #[arg(long, default_value = "0-15 Min")]
        stop_duration: String,
        /// Was the stop drug-related? (yes / no)
        #[arg(long, default_value = "no")]
        drugs_related: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = stop_ledger_cli_utils::init_logger();
    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(db::default_path);

    match cli.command {
        Commands::Clean { input, output } => {
            let progress = IndicatifProgress::records_bar(&multi, "Normalizing records");
            let stats = pipeline::clean_file(&input, &output, progress.as_ref())?;
            println!(
                "Cleaned {}: {} rows read, {} written, {} rejected",
                input.display(),
                stats.rows_read,
                stats.rows_written,
                stats.rows_rejected
            );
        }
        Commands::Load { input, dataset } => {
            log::info!("Loading {} into dataset '{dataset}'...", input.display());
            let records = csv_file::read_normalized_from_path(&input)?;
            let conn = db::open(&db_path)?;
            let inserted = datasets::load_dataset(&conn, &dataset, &records)?;
            log::info!("Load complete: {inserted} records.");
            println!("Loaded {inserted} records into dataset '{dataset}'");
        }
        Commands::Pipeline {
            input,
            dataset,
            cleaned,
        } => {
            let progress = IndicatifProgress::records_bar(&multi, "Normalizing records");
            let raw = csv_file::read_raw_records_from_path(&input)?;
            let outcome = normalize::normalize(&raw, progress.as_ref());
            if let Some(path) = &cleaned {
                csv_file::write_normalized_to_path(path, &outcome.records)?;
            }

            let conn = db::open(&db_path)?;
            let inserted = datasets::load_dataset(&conn, &dataset, &outcome.records)?;
            println!(
                "Loaded {inserted} records into dataset '{dataset}' ({} rows rejected)",
                outcome.rejected
            );

            let summary = stop_ledger_analytics::summary(&conn, &dataset)?;
            print_summary(&summary);
        }
        Commands::Queries => {
            for entry in CATALOG {
                println!("{:<36} {}", entry.name.to_string(), entry.title);
            }
        }
        Commands::Query { dataset, name, json } => {
            let name = QueryName::from_str(&name)
                .map_err(|_| format!("unknown query '{name}'; run `queries` for the list"))?;
            log::info!("Running '{name}' against dataset '{dataset}'...");
            let conn = db::open(&db_path)?;
            // One-shot process: results come straight from the store.
            // Long-lived consumers go through `QueryCache` instead and
            // invalidate it after any load.
            let result = stop_ledger_analytics::run(&conn, &dataset, name)?;
            log::info!("Query returned {} rows.", result.row_count());
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_table(&result);
            }
        }
        Commands::Summary { dataset, json } => {
            let conn = db::open(&db_path)?;
            let summary = stop_ledger_analytics::summary(&conn, &dataset)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Predict {
            dataset,
            gender,
            age,
            search_conducted,
            stop_duration,
            drugs_related,
        } => {
            let request = PredictionRequest::parse(
                &gender,
                &age,
                &search_conducted,
                &stop_duration,
                &drugs_related,
            )?;
            if !(MIN_FORM_AGE..=MAX_FORM_AGE).contains(&request.driver_age) {
                return Err(format!(
                    "driver age must be between {MIN_FORM_AGE} and {MAX_FORM_AGE}"
                )
                .into());
            }

            let conn = db::open(&db_path)?;
            let records = datasets::fetch_dataset(&conn, &dataset)?;
            let response = stop_ledger_predict::predict(&records, &request);

            println!(
                "Predicted outcome:   {} ({} matching stops)",
                response.predicted_outcome, response.match_count
            );
            println!("Predicted violation: {}", response.predicted_violation);
        }
    }

    Ok(())
}

/// Prints a query result as an aligned plain-text table.
fn print_table(result: &TabularResult) {
    if result.is_empty() {
        println!("No results.");
        return;
    }

    let rendered: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(CellValue::render).collect())
        .collect();

    let mut widths: Vec<usize> = result.columns.iter().map(String::len).collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, &width)| format!("{name:<width$}"))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));

    for row in &rendered {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        println!("{}", line.join("  "));
    }
    println!("({} rows)", result.row_count());
}

fn print_summary(summary: &stop_ledger_analytics_models::StopSummary) {
    println!("Total stops:        {}", summary.total_stops);
    println!("Arrests:            {}", summary.arrests);
    println!("Warnings:           {}", summary.warnings);
    println!("Drug-related stops: {}", summary.drug_related_stops);
}
