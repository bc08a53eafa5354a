//! Typed intervals reconciled from punch pairs.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::AbsenceCategory;

/// Classification of a reconciled interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// Ordinary presence, bucketed by time of day.
    Work,
    /// A justified absence of the given category.
    Justified(AbsenceCategory),
    /// A short break (TAJ), tracked separately from work and absence.
    Break,
}

/// A reconciled `[start, end)` span derived from one punch pair.
///
/// The end is chronologically at or after the start once midnight crossing is
/// resolved: `end_date` may fall on the day after `start_date`, and duration
/// is always ≥ 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Calendar day the span starts on.
    pub start_date: NaiveDate,
    /// Minute of day the span starts at.
    pub start_minute: u16,
    /// Calendar day the span ends on.
    pub end_date: NaiveDate,
    /// Minute of day the span ends at.
    pub end_minute: u16,
    /// Classification of the span.
    pub kind: IntervalKind,
}

impl Interval {
    /// Builds an interval on a single start day, pushing the end to the next
    /// calendar day when the end minute precedes the start minute.
    pub fn on_day(date: NaiveDate, start_minute: u16, end_minute: u16, kind: IntervalKind) -> Self {
        let end_date = if end_minute < start_minute {
            date.checked_add_days(Days::new(1)).unwrap_or(date)
        } else {
            date
        };
        Interval {
            start_date: date,
            start_minute,
            end_date,
            end_minute,
            kind,
        }
    }

    /// Duration of the interval in whole minutes, never negative.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::{Interval, IntervalKind};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
    /// let shift = Interval::on_day(date, 1380, 420, IntervalKind::Work);
    /// assert_eq!(shift.duration_minutes(), 480); // 23:00 to 07:00 next day
    /// ```
    pub fn duration_minutes(&self) -> i64 {
        let days = (self.end_date - self.start_date).num_days();
        let minutes = days * 1440 + i64::from(self.end_minute) - i64::from(self.start_minute);
        minutes.max(0)
    }

    /// Returns the absence category for justified intervals.
    pub fn category(&self) -> Option<AbsenceCategory> {
        match self.kind {
            IntervalKind::Justified(category) => Some(category),
            _ => None,
        }
    }

    /// Returns true when the interval continues past midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.end_date > self.start_date
    }
}
