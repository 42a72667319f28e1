//! Shared domain layer for the Price Paid Data analysis tools.
//!
//! Holds the transaction model, the fixed price buckets, the numeric helpers
//! the reports are built on, number formatting and the command-line settings.

pub mod buckets;
pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{PpdError, Result};
