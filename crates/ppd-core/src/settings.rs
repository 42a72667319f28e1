use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Aggregate reports over HM Land Registry Price Paid Data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ppd-analysis",
    about = "Aggregate reports over HM Land Registry Price Paid Data",
    version
)]
pub struct Settings {
    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Output format for reports
    #[arg(long, global = true, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per report, plus snapshot creation.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert raw PPD CSV file(s) into a columnar snapshot
    Ingest {
        /// CSV file or directory of CSV files
        input: PathBuf,

        /// Snapshot file to write
        #[arg(long, short)]
        output: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Most expensive sale in each county
    Extremes {
        #[command(flatten)]
        source: SourceArgs,

        /// Snapshot, CSV file or directory of CSV files
        input: PathBuf,
    },

    /// Postcode districts with the highest total sales in each quarter
    TopDistricts {
        #[command(flatten)]
        source: SourceArgs,

        /// Snapshot, CSV file or directory of CSV files
        input: PathBuf,

        /// Districts to keep per quarter
        #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
        top: u32,
    },

    /// Share of transactions making up the top slice of value, per year and property type
    ValueShare {
        #[command(flatten)]
        source: SourceArgs,

        /// Snapshot, CSV file or directory of CSV files
        input: PathBuf,

        /// Percentage of cumulative value that defines the top slice (1-100)
        #[arg(long, default_value = "80", value_parser = clap::value_parser!(u8).range(1..=100))]
        share: u8,
    },

    /// Compare counts and median prices per price bucket between two cohorts
    Compare {
        #[command(flatten)]
        source: SourceArgs,

        /// Snapshot, CSV file or directory of CSV files
        input: PathBuf,

        #[command(flatten)]
        cohorts: CohortArgs,
    },
}

/// Options describing the raw CSV layout.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceArgs {
    /// Expect the trailing Record_status column of monthly update files
    #[arg(long)]
    pub record_status: bool,
}

/// Selection criteria for the two cohorts of `compare`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CohortArgs {
    /// Town/city of the baseline cohort
    #[arg(long)]
    pub old_town: Option<String>,
    /// County of the baseline cohort
    #[arg(long)]
    pub old_county: Option<String>,
    /// Transfer year of the baseline cohort
    #[arg(long)]
    pub old_year: Option<i32>,
    /// Town/city of the cohort compared against the baseline
    #[arg(long)]
    pub new_town: Option<String>,
    /// County of the cohort compared against the baseline
    #[arg(long)]
    pub new_county: Option<String>,
    /// Transfer year of the cohort compared against the baseline
    #[arg(long)]
    pub new_year: Option<i32>,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// `true` when reports should be emitted as JSON.
    pub fn json_output(&self) -> bool {
        self.format == "json"
    }
}

impl CohortArgs {
    /// `true` when neither cohort has any criterion, which would compare
    /// the whole dataset with itself.
    pub fn is_empty(&self) -> bool {
        *self == CohortArgs::default()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
