//! HTTP request handlers for the reconciliation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::collections::BTreeSet;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::ReportPeriod;
use crate::reconcile::build_ledger;

use super::request::ReconcileRequest;
use super::response::{ApiError, ApiErrorResponse, EmployeeProcessingError, ReconcileResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reconcile", post(reconcile_handler))
        .with_state(state)
}

/// Handler for POST /reconcile endpoint.
///
/// Accepts a reconcile request and returns one ledger per employee.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing reconcile request");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    // Check if it's a missing field error
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let start_time = Instant::now();
    match perform_reconciliation(&request, state.config()) {
        Ok(response) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                employees = request.employees.len(),
                ledgers = response.ledgers.len(),
                skipped = response.errors.len(),
                duration_us = duration.as_micros(),
                "Reconciliation completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Reconciliation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Reconciles every employee in the request.
///
/// Missing required inputs (empty roster, inverted period) are fatal; a
/// per-employee scan-budget overrun only skips that employee and is reported
/// in the response's error list.
fn perform_reconciliation(
    request: &ReconcileRequest,
    config: &EngineConfig,
) -> EngineResult<ReconcileResponse> {
    let period: ReportPeriod = request.period.clone().into();
    period.validate()?;

    if request.employees.is_empty() {
        return Err(EngineError::EmptyRoster);
    }

    let holidays: BTreeSet<NaiveDate> = request.holidays.iter().copied().collect();

    let mut ledgers = Vec::with_capacity(request.employees.len());
    let mut errors = Vec::new();

    for employee in &request.employees {
        let overrides = employee.override_map();
        match build_ledger(
            employee.id,
            &employee.punches,
            period,
            &holidays,
            &overrides,
            config,
        ) {
            Ok(ledger) => ledgers.push(ledger),
            Err(err @ EngineError::ScanBudgetExceeded { .. }) => {
                warn!(employee_id = employee.id, error = %err, "Employee skipped");
                errors.push(EmployeeProcessingError {
                    employee_id: employee.id,
                    message: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(ReconcileResponse { ledgers, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::{EmployeeRosterRequest, PeriodRequest};
    use crate::models::RawPunch;

    fn period() -> PeriodRequest {
        PeriodRequest {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
        }
    }

    fn punch(time: &str, is_entry: u8) -> RawPunch {
        RawPunch {
            employee_id: 31,
            date: "2025-03-17".to_string(),
            time: time.to_string(),
            is_entry,
            absence_code: None,
            explicit_start: None,
            explicit_end: None,
            day_type_flag: None,
            shift_hint: None,
        }
    }

    #[test]
    fn test_empty_roster_is_fatal() {
        let request = ReconcileRequest {
            period: period(),
            holidays: vec![],
            employees: vec![],
        };
        let result = perform_reconciliation(&request, &EngineConfig::default());
        assert!(matches!(result, Err(EngineError::EmptyRoster)));
    }

    #[test]
    fn test_inverted_period_is_fatal() {
        let request = ReconcileRequest {
            period: PeriodRequest {
                start_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            },
            holidays: vec![],
            employees: vec![EmployeeRosterRequest {
                id: 31,
                punches: vec![],
                calendar_overrides: vec![],
            }],
        };
        let result = perform_reconciliation(&request, &EngineConfig::default());
        assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_single_employee_reconciliation() {
        let request = ReconcileRequest {
            period: period(),
            holidays: vec![],
            employees: vec![EmployeeRosterRequest {
                id: 31,
                punches: vec![punch("07:00:00", 1), punch("15:00:00", 0)],
                calendar_overrides: vec![],
            }],
        };
        let response = perform_reconciliation(&request, &EngineConfig::default()).unwrap();
        assert_eq!(response.ledgers.len(), 1);
        assert!(response.errors.is_empty());
        assert_eq!(response.ledgers[0].employee_id, 31);
    }

    #[test]
    fn test_employees_are_independent() {
        // Bad data for one employee must not disturb the other's ledger.
        let mut bad = punch("not-a-time", 1);
        bad.employee_id = 32;
        let request = ReconcileRequest {
            period: period(),
            holidays: vec![],
            employees: vec![
                EmployeeRosterRequest {
                    id: 31,
                    punches: vec![punch("07:00:00", 1), punch("15:00:00", 0)],
                    calendar_overrides: vec![],
                },
                EmployeeRosterRequest {
                    id: 32,
                    punches: vec![bad],
                    calendar_overrides: vec![],
                },
            ],
        };
        let response = perform_reconciliation(&request, &EngineConfig::default()).unwrap();
        assert_eq!(response.ledgers.len(), 2);
        assert!(response.ledgers[0].warnings.is_empty());
        assert_eq!(response.ledgers[1].warnings.len(), 1);
    }
}
