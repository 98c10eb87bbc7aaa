//! Error types for the EVA pipeline.
//!
//! Every error is fatal to a run: nothing in the pipeline catches one stage's
//! error and carries on with the next.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum EvaError {
    /// Input file missing, unreadable, or not in the expected layout.
    #[error("failed to read source '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    /// A field could not be coerced to the type the pipeline needs.
    #[error("row {row}: field '{field}' value {value} is not {expected}")]
    TypeConversion {
        row: usize,
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Duration text (or other structured text) is malformed.
    #[error("row {row}: cannot parse field '{field}': {source}")]
    Parse {
        row: usize,
        field: &'static str,
        #[source]
        source: ParseError,
    },

    /// Destination file could not be created or written.
    #[error("failed to write '{path}': {source}")]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: SinkError,
    },
}

/// Why the input source could not be read.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Valid JSON, but not the records-oriented layout we expect.
    #[error("unexpected layout: {0}")]
    Shape(String),
}

/// Why an output artifact could not be written.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Chart drawing or PNG encoding failed.
    #[error("chart rendering failed: {0}")]
    Chart(String),
}

/// Malformed `H:MM` duration text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("'{0}' has no ':' separator")]
    MissingSeparator(String),

    #[error("'{0}' has more than one ':' separator")]
    TooManySeparators(String),

    #[error("{part} '{text}' is not a non-negative integer")]
    InvalidNumber { part: &'static str, text: String },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, EvaError>;
