//! Report periods, holidays and per-employee calendar overrides.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A per-date override from the employee's personal calendar.
///
/// An override always wins over both the global holiday set and the weekend
/// default: `Holiday` forces a festive day, any other override forces a
/// normal working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOverride {
    /// Day type 1: treated as a festive day.
    Holiday,
    /// Day type 2: a whole-day vacation.
    Vacation,
    /// Any other day type: an ordinary working day.
    Normal,
}

impl DayOverride {
    /// Maps the numeric day type from the upstream system.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => DayOverride::Holiday,
            2 => DayOverride::Vacation,
            _ => DayOverride::Normal,
        }
    }
}

/// The inclusive date range a reconciliation run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl ReportPeriod {
    /// Validates that the range is usable.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidPeriod {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Checks whether a date falls within the period, inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// The period padded by one day on each side, used by the pairer so
    /// intervals crossing into or out of the window close correctly.
    pub fn padded(&self) -> ReportPeriod {
        ReportPeriod {
            start_date: self
                .start_date
                .checked_sub_days(Days::new(1))
                .unwrap_or(self.start_date),
            end_date: self
                .end_date
                .checked_add_days(Days::new(1))
                .unwrap_or(self.end_date),
        }
    }

    /// The range from 1 January of the period's end year through the period
    /// end, used for year-to-date credit consumption.
    pub fn year_to_date(&self) -> ReportPeriod {
        let january_first = NaiveDate::from_ymd_opt(self.end_date.year(), 1, 1)
            .expect("January 1st always exists");
        ReportPeriod {
            start_date: january_first.min(self.end_date),
            end_date: self.end_date,
        }
    }

    /// Iterates every calendar day of the period in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }
}

/// Read-only calendar context for one employee's computation.
///
/// Combines the global holiday set, punch-derived company-holiday flags and
/// the employee's personal overrides into one festive predicate.
#[derive(Debug, Clone, Default)]
pub struct CalendarContext {
    holidays: BTreeSet<NaiveDate>,
    overrides: BTreeMap<NaiveDate, DayOverride>,
}

impl CalendarContext {
    /// Builds a calendar context from the holiday set and override map.
    pub fn new(holidays: BTreeSet<NaiveDate>, overrides: BTreeMap<NaiveDate, DayOverride>) -> Self {
        Self {
            holidays,
            overrides,
        }
    }

    /// Adds a punch-derived company-holiday date.
    pub fn flag_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    /// Whether the date counts as festive for bucketing.
    ///
    /// An employee override always wins; without one the date is festive on
    /// a global holiday or weekend.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::CalendarContext;
    /// use chrono::NaiveDate;
    ///
    /// let calendar = CalendarContext::default();
    /// // 2025-03-15 is a Saturday
    /// assert!(calendar.is_festive(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
    /// assert!(!calendar.is_festive(NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()));
    /// ```
    pub fn is_festive(&self, date: NaiveDate) -> bool {
        match self.overrides.get(&date) {
            Some(DayOverride::Holiday) => true,
            Some(_) => false,
            None => self.holidays.contains(&date) || is_weekend(date),
        }
    }

    /// Whether the employee has a whole-day vacation override on the date.
    pub fn is_vacation_override(&self, date: NaiveDate) -> bool {
        self.overrides.get(&date) == Some(&DayOverride::Vacation)
    }
}

/// Saturday/Sunday predicate.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn test_day_override_from_code() {
        assert_eq!(DayOverride::from_code(1), DayOverride::Holiday);
        assert_eq!(DayOverride::from_code(2), DayOverride::Vacation);
        assert_eq!(DayOverride::from_code(0), DayOverride::Normal);
        assert_eq!(DayOverride::from_code(7), DayOverride::Normal);
    }

    #[test]
    fn test_period_validate() {
        let period = ReportPeriod {
            start_date: date(1),
            end_date: date(31),
        };
        assert!(period.validate().is_ok());

        let inverted = ReportPeriod {
            start_date: date(31),
            end_date: date(1),
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_period_contains_inclusive() {
        let period = ReportPeriod {
            start_date: date(10),
            end_date: date(20),
        };
        assert!(period.contains(date(10)));
        assert!(period.contains(date(20)));
        assert!(period.contains(date(15)));
        assert!(!period.contains(date(9)));
        assert!(!period.contains(date(21)));
    }

    #[test]
    fn test_period_padding() {
        let period = ReportPeriod {
            start_date: date(10),
            end_date: date(20),
        };
        let padded = period.padded();
        assert_eq!(padded.start_date, date(9));
        assert_eq!(padded.end_date, date(21));
    }

    #[test]
    fn test_year_to_date_starts_january_first() {
        let period = ReportPeriod {
            start_date: date(10),
            end_date: date(20),
        };
        let ytd = period.year_to_date();
        assert_eq!(ytd.start_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(ytd.end_date, date(20));
    }

    #[test]
    fn test_days_iteration() {
        let period = ReportPeriod {
            start_date: date(10),
            end_date: date(12),
        };
        let days: Vec<NaiveDate> = period.days().collect();
        assert_eq!(days, vec![date(10), date(11), date(12)]);
    }

    #[test]
    fn test_weekend_default_is_festive() {
        let calendar = CalendarContext::default();
        assert!(calendar.is_festive(date(15))); // Saturday
        assert!(calendar.is_festive(date(16))); // Sunday
        assert!(!calendar.is_festive(date(17))); // Monday
    }

    #[test]
    fn test_global_holiday_is_festive() {
        let mut holidays = BTreeSet::new();
        holidays.insert(date(19));
        let calendar = CalendarContext::new(holidays, BTreeMap::new());
        assert!(calendar.is_festive(date(19))); // Wednesday, company holiday
    }

    #[test]
    fn test_override_wins_both_ways() {
        let mut overrides = BTreeMap::new();
        overrides.insert(date(15), DayOverride::Normal); // Saturday forced normal
        overrides.insert(date(17), DayOverride::Holiday); // Monday forced festive
        let calendar = CalendarContext::new(BTreeSet::new(), overrides);
        assert!(!calendar.is_festive(date(15)));
        assert!(calendar.is_festive(date(17)));
    }

    #[test]
    fn test_vacation_override_is_not_festive() {
        let mut overrides = BTreeMap::new();
        overrides.insert(date(17), DayOverride::Vacation);
        let calendar = CalendarContext::new(BTreeSet::new(), overrides);
        assert!(!calendar.is_festive(date(17)));
        assert!(calendar.is_vacation_override(date(17)));
        assert!(!calendar.is_vacation_override(date(18)));
    }

    #[test]
    fn test_punch_flagged_holiday() {
        let mut calendar = CalendarContext::default();
        assert!(!calendar.is_festive(date(18)));
        calendar.flag_holiday(date(18));
        assert!(calendar.is_festive(date(18)));
    }
}
