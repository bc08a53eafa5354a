//! Request types for the reconciliation API.
//!
//! This module defines the JSON request structures for the `/reconcile`
//! endpoint.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DayOverride, RawPunch, ReportPeriod};

/// Request body for the `/reconcile` endpoint.
///
/// Contains the report period, the global holiday set and the roster of
/// employees with their punch streams and calendar overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// The report period to reconcile.
    pub period: PeriodRequest,
    /// Global company holidays.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// The employees to reconcile.
    pub employees: Vec<EmployeeRosterRequest>,
}

/// Report period information in a reconcile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

/// One employee's input in a reconcile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRosterRequest {
    /// The employee identifier.
    pub id: i64,
    /// The employee's punch stream; may cover the whole year to date.
    #[serde(default)]
    pub punches: Vec<RawPunch>,
    /// Per-date calendar overrides for this employee.
    #[serde(default)]
    pub calendar_overrides: Vec<CalendarOverrideRequest>,
}

/// A single calendar override in a reconcile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarOverrideRequest {
    /// The date the override applies to.
    pub date: NaiveDate,
    /// The day type: 1 = holiday, 2 = vacation, anything else = normal.
    pub day_type: u8,
}

impl From<PeriodRequest> for ReportPeriod {
    fn from(req: PeriodRequest) -> Self {
        ReportPeriod {
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

impl EmployeeRosterRequest {
    /// Builds the override map the ledger builder consumes.
    pub fn override_map(&self) -> BTreeMap<NaiveDate, DayOverride> {
        self.calendar_overrides
            .iter()
            .map(|o| (o.date, DayOverride::from_code(o.day_type)))
            .collect()
    }
}
