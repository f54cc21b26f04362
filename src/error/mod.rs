//! Error handling for the cohort pipeline.

use std::{fmt, io};

use arrow::error::ArrowError;

/// Specialized error type for the cohort pipeline
#[derive(Debug)]
pub enum CohortError {
    /// Error opening or reading a file
    IoError(io::Error),
    /// Error reading or writing delimited data
    CsvError(ArrowError),
    /// Error with the shape of a source table (missing required columns)
    SchemaError(String),
    /// Error with an input location (missing file, root directory or manifest)
    InputError(String),
}

impl From<io::Error> for CohortError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error)
    }
}

impl From<ArrowError> for CohortError {
    fn from(error: ArrowError) -> Self {
        Self::CsvError(error)
    }
}

impl From<serde_json::Error> for CohortError {
    fn from(error: serde_json::Error) -> Self {
        Self::InputError(format!("Invalid manifest: {error}"))
    }
}

impl fmt::Display for CohortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::CsvError(e) => write!(f, "CSV error: {e}"),
            Self::SchemaError(msg) => write!(f, "Schema error: {msg}"),
            Self::InputError(msg) => write!(f, "Input error: {msg}"),
        }
    }
}

impl std::error::Error for CohortError {}

/// Result type for cohort pipeline operations
pub type Result<T> = std::result::Result<T, CohortError>;
