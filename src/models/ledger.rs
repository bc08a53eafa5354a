//! The reconciled per-employee ledger and its finding types.
//!
//! A ledger is a pure function of the punch stream, the report period, the
//! holiday set and the calendar overrides. It is created fresh on every run
//! and never mutated incrementally.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AbsenceCategory, ReportPeriod};

/// Hours worked per time-of-day/day-type bucket, reported to 2 decimals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBuckets {
    /// Hours in the day window (07:00–15:00).
    pub day: Decimal,
    /// Hours in the first overtime window of day shifts (15:00–20:00).
    pub overtime1: Decimal,
    /// Hours in the evening window (15:00–23:00).
    pub evening: Decimal,
    /// Hours in the night window.
    pub night: Decimal,
    /// Hours on festive days (holidays, weekends, overrides).
    pub festive: Decimal,
}

/// Short-break (TAJ) usage over the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortBreakSummary {
    /// Number of short breaks taken.
    pub count: u32,
    /// Total short-break hours.
    pub hours: Decimal,
}

/// Aggregate late-arrival totals over the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelaySummary {
    /// Number of accepted late arrivals.
    pub count: u32,
    /// Total residual delay in minutes.
    pub total_minutes: i64,
}

/// Annual entitlement consumption for one category.
///
/// `remaining` may go negative; over-consumption is surfaced for human
/// review, never blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualCredit {
    /// The category the credit covers.
    pub category: AbsenceCategory,
    /// The yearly entitlement (hours, or days for vacation-family).
    pub entitlement: Decimal,
    /// Consumption from 1 January through the period end.
    pub consumed_ytd: Decimal,
    /// `entitlement - consumed_ytd`.
    pub remaining: Decimal,
}

/// A first entry later than the resolved shift start plus grace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateArrival {
    /// Day of the late arrival.
    pub date: NaiveDate,
    /// Minute of day the shift was expected to start.
    pub expected_start: u16,
    /// Minute of day the first entry was recorded.
    pub actual_start: u16,
    /// Residual delay in minutes after justified cover is subtracted.
    pub minutes: i64,
}

/// An unexplained clock-off span inside a scheduled shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    /// Day the gap falls on.
    pub date: NaiveDate,
    /// Minute of day the gap starts.
    pub start: u16,
    /// Minute of day the gap ends.
    pub end: u16,
}

/// A day whose net worked hours fall short of the standard day without full
/// justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdayDeviation {
    /// Day of the deviation.
    pub date: NaiveDate,
    /// Net hours actually worked that day.
    pub actual_hours: Decimal,
    /// Minute of the first punch that day.
    pub first_punch: u16,
    /// Minute of the last punch that day.
    pub last_punch: u16,
}

/// An entry punch with no matching exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingClockOut {
    /// Day of the orphaned entry.
    pub date: NaiveDate,
    /// Minute of day the orphaned entry was recorded.
    pub time: u16,
}

/// A working day with no activity and no explanation of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsentDay {
    /// The fully absent date.
    pub date: NaiveDate,
}

/// A non-fatal problem encountered while reconciling one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

impl LedgerWarning {
    /// A data-quality warning for a record excluded during normalization.
    pub fn data_quality(message: impl Into<String>) -> Self {
        Self {
            code: "DATA_QUALITY".to_string(),
            message: message.into(),
        }
    }
}

/// The reconciled ledger for one employee over one report period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLedger {
    /// The employee the ledger belongs to.
    pub employee_id: i64,
    /// The period the ledger covers.
    pub period: ReportPeriod,
    /// Worked hours split across time-of-day/day-type buckets.
    pub buckets: HourBuckets,
    /// Absence totals for the period; vacation-family values are days,
    /// everything else hours.
    pub absences_period: BTreeMap<AbsenceCategory, Decimal>,
    /// Absence totals from 1 January through the period end.
    pub absences_ytd: BTreeMap<AbsenceCategory, Decimal>,
    /// Annual-credit snapshot for the entitled categories.
    pub credits: Vec<AnnualCredit>,
    /// Short-break usage.
    pub short_breaks: ShortBreakSummary,
    /// Late-arrival totals.
    pub delays: DelaySummary,
    /// Late-arrival findings, chronological.
    pub late_arrivals: Vec<LateArrival>,
    /// Gap findings, chronological.
    pub gaps: Vec<Gap>,
    /// Workday-deviation findings, chronological.
    pub deviations: Vec<WorkdayDeviation>,
    /// Missing clock-out findings, chronological.
    pub missing_clock_outs: Vec<MissingClockOut>,
    /// Fully absent working days, chronological.
    pub absent_days: Vec<AbsentDay>,
    /// Data-quality warnings for excluded records.
    pub warnings: Vec<LedgerWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_ledger() -> EmployeeLedger {
        let mut absences = BTreeMap::new();
        absences.insert(AbsenceCategory::Medical, dec("5.00"));
        EmployeeLedger {
            employee_id: 31,
            period: ReportPeriod {
                start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            },
            buckets: HourBuckets {
                day: dec("120.00"),
                overtime1: dec("4.50"),
                evening: Decimal::ZERO,
                night: Decimal::ZERO,
                festive: dec("8.00"),
            },
            absences_period: absences.clone(),
            absences_ytd: absences,
            credits: vec![AnnualCredit {
                category: AbsenceCategory::Medical,
                entitlement: dec("35"),
                consumed_ytd: dec("5.00"),
                remaining: dec("30.00"),
            }],
            short_breaks: ShortBreakSummary::default(),
            delays: DelaySummary {
                count: 1,
                total_minutes: 12,
            },
            late_arrivals: vec![LateArrival {
                date: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
                expected_start: 420,
                actual_start: 432,
                minutes: 12,
            }],
            gaps: vec![],
            deviations: vec![],
            missing_clock_outs: vec![],
            absent_days: vec![],
            warnings: vec![],
        }
    }

    #[test]
    fn test_credit_arithmetic_holds() {
        let ledger = sample_ledger();
        for credit in &ledger.credits {
            assert_eq!(credit.remaining, credit.entitlement - credit.consumed_ytd);
        }
    }

    #[test]
    fn test_negative_remaining_is_representable() {
        let credit = AnnualCredit {
            category: AbsenceCategory::FreeDisposal,
            entitlement: dec("24"),
            consumed_ytd: dec("30"),
            remaining: dec("-6"),
        };
        assert!(credit.remaining < Decimal::ZERO);
        let json = serde_json::to_string(&credit).unwrap();
        assert!(json.contains("\"-6\""));
    }

    #[test]
    fn test_ledger_serialization_round_trip() {
        let ledger = sample_ledger();
        let json = serde_json::to_string(&ledger).unwrap();
        let back: EmployeeLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(ledger, back);
    }

    #[test]
    fn test_absence_map_keys_serialize_as_category_names() {
        let ledger = sample_ledger();
        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.contains("\"medical\":\"5.00\""));
    }

    #[test]
    fn test_data_quality_warning() {
        let warning = LedgerWarning::data_quality("unparseable time '99:99'");
        assert_eq!(warning.code, "DATA_QUALITY");
        assert!(warning.message.contains("99:99"));
    }

    #[test]
    fn test_findings_serialize_with_dates() {
        let gap = Gap {
            date: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
            start: 420,
            end: 432,
        };
        let json = serde_json::to_string(&gap).unwrap();
        assert!(json.contains("\"date\":\"2025-03-17\""));
        assert!(json.contains("\"start\":420"));
    }
}
