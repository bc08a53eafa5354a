//! Error types for the punch reconciliation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Fatal errors are reserved for missing required inputs; everything else
//! degrades to per-record or per-day skips plus a finding or warning.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the reconciliation engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::EmptyRoster;
/// assert_eq!(error.to_string(), "No employees supplied for reconciliation");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The request contained no employees to reconcile.
    #[error("No employees supplied for reconciliation")]
    EmptyRoster,

    /// The requested date range is inverted or otherwise unusable.
    #[error("Invalid report period: {start} to {end}")]
    InvalidPeriod {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// A scanning loop exceeded its safety budget for one employee.
    ///
    /// This aborts that employee's computation only; other employees in the
    /// same batch are unaffected.
    #[error("Scan budget exceeded for employee {employee_id} while {context}")]
    ScanBudgetExceeded {
        /// The employee whose computation was abandoned.
        employee_id: i64,
        /// What the engine was doing when the budget ran out.
        context: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
