//! Aggregate reports over a transaction collection.
//!
//! Every report is a pure function of the transactions passed to it: nothing
//! is cached and the input is never modified.

pub mod comparison;
pub mod extremes;
pub mod quarterly;
pub mod value_share;

pub use ppd_core as core;
