use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' is missing from the header")]
    MissingColumn(String),

    #[error("Line {line}: invalid value {value:?} in column '{column}': {reason}")]
    InvalidField {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    #[error("Line {line}: {source}")]
    InvalidRecord {
        line: u64,
        #[source]
        source: CoreError,
    },

    #[error("Invalid loader options: {0}")]
    InvalidOptions(String),
}
