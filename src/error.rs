//! Error types for the vacation pay engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading tax tables,
//! validating inputs, computing a vacation result or persisting history.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the vacation pay engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use ferias_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/jurisdiction.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/jurisdiction.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No tax table is effective on the given date.
    #[error("No tax tables effective on {date}")]
    TablesNotFound {
        /// The date for which tables were requested.
        date: NaiveDate,
    },

    /// A vacation request field was out of range.
    #[error("Invalid vacation request field '{field}': {message}")]
    InvalidRequest {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An employment profile field was invalid.
    #[error("Invalid profile field '{field}': {message}")]
    InvalidProfile {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// The simulation history could not be read or written.
    #[error("History storage error at '{path}': {message}")]
    HistoryStorage {
        /// The path of the history file.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
