//! Error types for pdfstruct library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while classifying a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The span dump (or the rendered output) is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing tabular data.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input is neither a PDF nor a span dump.
    #[error("Unknown input format: expected a PDF or a JSON span dump")]
    UnknownFormat,

    /// The input kind is recognized but cannot be classified directly.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// The document has no text spans, so no paragraph baseline exists.
    #[error("Zero discriminating fonts found: document has no text spans")]
    NoDiscriminatingStyle,

    /// A span is missing required fields or carries unusable values.
    #[error("Malformed span on page {page}: {reason}")]
    MalformedSpan {
        /// Page number (1-indexed) the span was found on
        page: u32,
        /// What was wrong with it
        reason: String,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error extracting or persisting an image.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error extracting or persisting a table.
    #[error("Table extraction error: {0}")]
    TableExtract(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}
