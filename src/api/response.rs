//! Response types for the reconciliation API.
//!
//! This module defines the success envelope, the error response structures
//! and the error mapping for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::EmployeeLedger;

/// Response body for a successful `/reconcile` call.
///
/// A batch degrades per employee: ledgers that computed cleanly are returned
/// alongside entries for employees whose computation was abandoned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileResponse {
    /// One ledger per successfully reconciled employee.
    pub ledgers: Vec<EmployeeLedger>,
    /// Employees whose computation was abandoned, with the reason.
    #[serde(default)]
    pub errors: Vec<EmployeeProcessingError>,
}

/// A non-fatal per-employee processing failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProcessingError {
    /// The employee whose computation was abandoned.
    pub employee_id: i64,
    /// Why the computation was abandoned.
    pub message: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration file not found",
                    path,
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    format!("Failed to parse configuration file '{path}'"),
                    message,
                ),
            },
            EngineError::EmptyRoster => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error("No employees supplied for reconciliation"),
            },
            EngineError::InvalidPeriod { start, end } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    "Invalid report period",
                    format!("{start} to {end}"),
                ),
            },
            EngineError::ScanBudgetExceeded {
                employee_id,
                context,
            } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "PROCESSING_ERROR",
                    format!("Scan budget exceeded for employee {employee_id}"),
                    context,
                ),
            },
        }
    }
}
