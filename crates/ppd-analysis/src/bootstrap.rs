use std::path::Path;

use anyhow::Context;
use ppd_core::models::Transaction;
use ppd_data::reader::{load_transactions, IngestConfig};
use ppd_data::snapshot::read_snapshot;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unrecognised names pass through lowercased so that a full filter
/// directive such as `ppd_data=debug` still works.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Falls back to `"info"` if the level does not parse as a filter. Output
/// goes to stderr; stdout is reserved for report output.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("failed to initialise logging")?;

    Ok(())
}

// ── Input loading ──────────────────────────────────────────────────────────────

/// `true` when `path` names an Arrow IPC snapshot rather than raw CSV.
pub fn is_snapshot_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("arrow") || e.eq_ignore_ascii_case("feather"))
}

/// Load transactions from a snapshot file, a CSV file or a directory of CSV
/// files, chosen by extension.
pub fn load_input(path: &Path, config: &IngestConfig) -> anyhow::Result<Vec<Transaction>> {
    if is_snapshot_path(path) {
        tracing::info!("Reading snapshot {}", path.display());
        read_snapshot(path).with_context(|| format!("failed to read snapshot {}", path.display()))
    } else {
        tracing::info!("Reading CSV from {}", path.display());
        Ok(load_transactions(path, config)?)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
