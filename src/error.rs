//! Error types for rusty_fx

use thiserror::Error;

/// Main error type for rusty_fx
///
/// Only conditions that stop an operation from completing live here. Outcomes a
/// caller is expected to branch on (duplicate add, spike rejection, deleting a
/// missing code) are returned as values, see [`crate::fx::repository`].
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Malformed currency code: {0}")]
    MalformedCode(String),

    #[error("Invalid price data: {0}")]
    InvalidData(String),

    #[error("No FX data stored for {0}")]
    NonexistentEntry(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type alias for rusty_fx operations
pub type Result<T> = std::result::Result<T, FxError>;
