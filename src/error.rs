use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for parser construction and row decoding.
#[derive(Error, Debug)]
pub enum ParserError {
    /// IO error while opening or reading the file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing error (malformed record, or invalid UTF-8 in text mode).
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// No dialect could be inferred from the sample.
    #[error("Could not detect CSV dialect: {0}")]
    DetectionFailed(String),

    /// Keyword scan reached end of input without a matching first field.
    #[error("No row starting with {keyword:?} found in {}", path.display())]
    KeywordNotFound { keyword: String, path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;
