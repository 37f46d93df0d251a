//! Error types for slide tree extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during slide tree extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// The input PDF does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The banner pattern is not a valid regular expression.
    #[error("Invalid banner pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The external word extraction tool is not installed.
    #[error("{0} not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    ToolNotFound(String),

    /// The external word extraction tool exited with an error.
    #[error("pdftotext failed with exit code {code}: {stderr}")]
    ToolFailed { code: i32, stderr: String },

    /// The word layout output could not be parsed.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Failed to extract words from a page.
    #[error("Text extraction error: {0}")]
    ExtractionError(String),
}
