//! Data ingestion layer for the Price Paid Data tools.
//!
//! Reads raw PPD CSV files (single files or directories of yearly files)
//! into typed [`Transaction`](ppd_core::models::Transaction)s, and writes or
//! reloads the Arrow IPC snapshot used for fast repeated analysis.

pub mod reader;
pub mod snapshot;

pub use ppd_core as core;
