mod bootstrap;
mod render;

use anyhow::{bail, Result};
use ppd_core::settings::{CohortArgs, Command, Settings, SourceArgs};
use ppd_data::reader::{load_transactions, IngestConfig};
use ppd_data::snapshot::write_snapshot;
use ppd_reports::comparison::{compare_filtered, CohortFilter};
use ppd_reports::extremes::most_expensive_by_county;
use ppd_reports::quarterly::top_districts_by_quarter;
use ppd_reports::value_share::top_value_share_at;
use serde::Serialize;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("PPD analysis v{} starting", env!("CARGO_PKG_VERSION"));

    let json = settings.json_output();

    match settings.command {
        Command::Ingest {
            input,
            output,
            source,
        } => {
            let transactions = load_transactions(&input, &ingest_config(&source))?;
            tracing::info!(
                "Writing {} transactions to {}",
                transactions.len(),
                output.display()
            );
            write_snapshot(&output, &transactions)?;
            println!(
                "Wrote {} transactions to {}",
                transactions.len(),
                output.display()
            );
        }

        Command::Extremes { source, input } => {
            let transactions = bootstrap::load_input(&input, &ingest_config(&source))?;
            let rows = most_expensive_by_county(&transactions);
            emit(json, &rows, || render::extremes(&rows))?;
        }

        Command::TopDistricts { source, input, top } => {
            let transactions = bootstrap::load_input(&input, &ingest_config(&source))?;
            let rows = top_districts_by_quarter(&transactions, top as usize);
            emit(json, &rows, || render::top_districts(&rows))?;
        }

        Command::ValueShare {
            source,
            input,
            share,
        } => {
            let transactions = bootstrap::load_input(&input, &ingest_config(&source))?;
            let rows = top_value_share_at(&transactions, share);
            emit(json, &rows, || render::value_share(&rows, share))?;
        }

        Command::Compare {
            source,
            input,
            cohorts,
        } => {
            if cohorts.is_empty() {
                bail!("compare needs at least one --old-* or --new-* criterion");
            }
            let (old, new) = cohort_filters(cohorts);
            let transactions = bootstrap::load_input(&input, &ingest_config(&source))?;
            let cmp = compare_filtered(&transactions, &old, &new)?;
            emit(json, &cmp, || render::comparison(&cmp, &old, &new))?;
        }
    }

    Ok(())
}

fn ingest_config(source: &SourceArgs) -> IngestConfig {
    IngestConfig {
        expect_record_status: source.record_status,
    }
}

fn cohort_filters(args: CohortArgs) -> (CohortFilter, CohortFilter) {
    (
        CohortFilter {
            town_city: args.old_town,
            county: args.old_county,
            year: args.old_year,
        },
        CohortFilter {
            town_city: args.new_town,
            county: args.new_county,
            year: args.new_year,
        },
    )
}

/// Print `value` as pretty JSON, or the text table built by `table`.
fn emit<T, F>(json: bool, value: &T, table: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", table());
    }
    Ok(())
}
