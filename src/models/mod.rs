//! Core data models for the reconciliation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calendar;
mod interval;
mod ledger;
mod punch;

pub use calendar::{CalendarContext, DayOverride, ReportPeriod, is_weekend};
pub use interval::{Interval, IntervalKind};
pub use ledger::{
    AbsentDay, AnnualCredit, DelaySummary, EmployeeLedger, Gap, HourBuckets, LateArrival,
    LedgerWarning, MissingClockOut, ShortBreakSummary, WorkdayDeviation,
};
pub use punch::{
    AbsenceCategory, PunchKind, PunchRecord, RawPunch, SHORT_BREAK_CODE, parse_minute_of_day,
};
