//! HTTP API module for the reconciliation engine.
//!
//! This module provides the REST endpoint that accepts punch streams and
//! returns reconciled ledgers. All reconciliation logic lives in
//! [`crate::reconcile`]; the API is a thin serving shell.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalendarOverrideRequest, EmployeeRosterRequest, PeriodRequest, ReconcileRequest,
};
pub use response::{ApiError, EmployeeProcessingError, ReconcileResponse};
pub use state::AppState;
