//! Error types for calsheet.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting or exporting calendar events.
#[derive(Error, Debug)]
pub enum CalSheetError {
    #[error("Calendar file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid calendar data: {0}")]
    Format(String),

    #[error("No events to export")]
    EmptyInput,

    #[error("Too many events for one worksheet: {0} (limit {limit})", limit = crate::export::MAX_DATA_ROWS)]
    TooManyEvents(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Delimited(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calsheet operations.
pub type CalSheetResult<T> = Result<T, CalSheetError>;
