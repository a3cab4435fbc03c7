//! Error types shared by the pipeline and the dashboard binary.
//!
//! Structural problems (an unreadable workbook, a missing sheet, a ticker without
//! history) each have their own enum so callers can tell which stage failed.
//! `DashboardError` unifies them, allowing crates to propagate a single error type
//! with `?`. Value-level coercion failures are never errors: they surface as
//! `None` fields in the model.
use std::io;

use thiserror::Error;

/// Failure while reading the source workbook.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The workbook file could not be opened or its metadata could not be read.
    #[error("Cannot open workbook {path}: {reason}")]
    Open {
        /// Path as given by the caller.
        path: String,
        /// Underlying reader or I/O message.
        reason: String,
    },

    /// A sheet exists but its contents could not be decoded.
    #[error("Cannot read sheet {sheet}: {reason}")]
    Read {
        /// Sheet name.
        sheet: String,
        /// Underlying reader message.
        reason: String,
    },

    /// The metadata sheet or a per-ticker sheet is absent.
    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    /// A column needed to locate the per-ticker sheets is absent.
    #[error("Sheet {sheet} has no column {column}")]
    MissingColumn {
        /// Sheet name.
        sheet: String,
        /// Normalized column name.
        column: String,
    },
}

/// Failure while turning raw sheets into typed records.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    /// A ticker listed in the metadata sheet has no history table.
    #[error("Ticker {0} has no history table")]
    MissingHistory(String),

    /// A required column is absent after name normalization.
    #[error("Table {table} has no column {column}")]
    MissingColumn {
        /// `ticker` for the metadata table, otherwise the ticker symbol.
        table: String,
        /// Normalized column name.
        column: String,
    },

    /// A non-empty metadata row has a blank symbol.
    #[error("Metadata row {row} has no ticker symbol")]
    MissingSymbol {
        /// Zero-based data row index (header excluded).
        row: usize,
    },

    /// The same symbol appears on more than one metadata row.
    #[error("Ticker {0} is listed more than once")]
    DuplicateTicker(String),
}

/// Unified error type for the dashboard workspace.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The workbook could not be loaded.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Raw sheets did not match the expected structure.
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// A lookup referenced a ticker the dataset does not contain.
    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    /// I/O error originating from the standard library (stdin, output files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding JSON via serde_json.
    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_convert_into_dashboard_error() {
        let err: DashboardError = LoadError::MissingSheet("AAPL".to_string()).into();
        assert!(matches!(err, DashboardError::Load(LoadError::MissingSheet(ref s)) if s == "AAPL"));
        assert_eq!(err.to_string(), "Load error: Sheet not found: AAPL");
    }

    #[test]
    fn normalize_errors_name_the_ticker() {
        let err: DashboardError = NormalizeError::MissingHistory("MSFT".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Normalize error: Ticker MSFT has no history table"
        );
    }
}
