use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Input directory not found: {}", .0.display())]
    MissingInputDirectory(PathBuf),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Reasons a single raw sensor file is skipped. None of these abort a run.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file is empty")]
    EmptyFile,

    #[error("malformed file: {0}")]
    Parse(String),

    #[error("file is neither valid UTF-8 nor Windows-1252")]
    Encoding,

    #[error("expected at least 3 columns, found {found}")]
    TooFewColumns { found: usize },

    #[error("no row with a valid timestamp")]
    NoValidRows,

    #[error("unreadable file: {0}")]
    Io(#[from] std::io::Error),
}
