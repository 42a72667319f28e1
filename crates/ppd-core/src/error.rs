use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Price Paid Data tools.
#[derive(Error, Debug)]
pub enum PpdError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer could not tokenise a record.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A raw record did not have the number of columns the schema expects.
    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A column value could not be converted to its typed form.
    #[error("Line {line}: invalid value {value:?} in column {column}")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// Two series that must be compared elementwise have different lengths.
    #[error("Series length mismatch: old has {old} values, new has {new}")]
    LengthMismatch { old: usize, new: usize },

    /// The input path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No CSV files were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PpdError>;
