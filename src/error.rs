use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

pub type DivisasResult<T> = Result<T, DivisasError>;

/// Expected user date format, shown in every format error.
pub const DATE_PATTERN_HINT: &str = "dd/mm/yyyy";

#[derive(Error, Debug)]
pub enum DivisasError {
    #[error("Invalid date '{input}': expected format dd/mm/yyyy")]
    DateFormat { input: String },

    #[error("No data for period {start} - {end}: the market may have been closed or there is a connection problem")]
    EmptyResult { start: NaiveDate, end: NaiveDate },

    #[error("No valid closing prices for the period after dropping incomplete rows")]
    EmptyAfterCleaning,

    #[error("Excel export engine is not available: rebuild with `cargo build --features xlsx`")]
    MissingExportEngine,

    #[error("Failed to save Excel file {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("Market data error: {0}")]
    Fetch(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("A download is already running")]
    WorkerBusy,

    #[error("Input closed before a valid {0} was entered")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reporting category for a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DateFormat,
    EmptyResult,
    EmptyAfterCleaning,
    MissingExportEngine,
    Write,
    Unclassified,
}

impl DivisasError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DateFormat { .. } => ErrorKind::DateFormat,
            Self::EmptyResult { .. } => ErrorKind::EmptyResult,
            Self::EmptyAfterCleaning => ErrorKind::EmptyAfterCleaning,
            Self::MissingExportEngine => ErrorKind::MissingExportEngine,
            Self::Write { .. } => ErrorKind::Write,
            Self::Fetch(_)
            | Self::Task(_)
            | Self::WorkerBusy
            | Self::Prompt(_)
            | Self::Io(_) => {
                ErrorKind::Unclassified
            }
        }
    }

    /// Short status-line text for a failed run.
    pub fn status_text(&self) -> &'static str {
        match self.kind() {
            ErrorKind::DateFormat => "Date format error.",
            ErrorKind::EmptyResult => "Download error.",
            ErrorKind::EmptyAfterCleaning => "No valid data.",
            ErrorKind::MissingExportEngine => "Error: Excel engine missing.",
            ErrorKind::Write => "Error while saving.",
            ErrorKind::Unclassified => "General error.",
        }
    }
}
