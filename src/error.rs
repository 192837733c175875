//! Error types for the cost engine.
//!
//! Only configuration problems are errors. Malformed shift input is
//! sanitized and reported as a [`CalculationWarning`](crate::models::CalculationWarning)
//! so that one bad shift never aborts a whole quote.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the cost engine.
///
/// # Example
///
/// ```
/// use cleaning_cost_engine::error::EngineError;
///
/// let error = EngineError::UnknownLevel { level: 9 };
/// assert_eq!(error.to_string(), "No base rate defined for employee level 9");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Settings could not be written to the settings store.
    #[error("Failed to write settings to '{path}': {message}")]
    SettingsWriteError {
        /// The destination that could not be written.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// Award settings failed validation.
    #[error("Invalid setting '{field}': {message}")]
    InvalidSettings {
        /// The offending settings field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Neither the settings nor the rate table define a base rate for a level.
    #[error("No base rate defined for employee level {level}")]
    UnknownLevel {
        /// The employee level that could not be resolved.
        level: u8,
    },

    /// The margin percentage would produce a negative or infinite price.
    #[error("Invalid margin percentage {percentage}: must not be negative, and an on-price margin must be below 100")]
    InvalidMargin {
        /// The rejected margin percentage.
        percentage: Decimal,
    },

    /// The overhead percentage is negative.
    #[error("Invalid overhead percentage {percentage}: must not be negative")]
    InvalidOverhead {
        /// The rejected overhead percentage.
        percentage: Decimal,
    },

    /// An amount grew beyond what a decimal can represent.
    #[error("Calculation overflowed while computing {stage}")]
    CalculationOverflow {
        /// The quantity being computed, e.g. "line cost" or "final price".
        stage: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
