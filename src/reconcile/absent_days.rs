//! Flagging of fully absent working days.
//!
//! A working day is absent only when nothing at all explains it: no punch
//! activity, no finding of any kind, no vacation override and no
//! medical/work-accident leave.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{
    AbsenceCategory, AbsentDay, CalendarContext, Interval, IntervalKind, MissingClockOut,
    ReportPeriod, is_weekend,
};

use super::anomalies::AnomalyReport;

/// Scans the period for fully absent working days.
///
/// Only Monday–Friday non-festive days whose shift window is observable
/// within the range are candidates.
pub fn scan_absent_days(
    period: &ReportPeriod,
    calendar: &CalendarContext,
    punch_dates: &BTreeSet<NaiveDate>,
    report: &AnomalyReport,
    missing_clock_outs: &[MissingClockOut],
    intervals: &[Interval],
) -> Vec<AbsentDay> {
    period
        .days()
        .filter(|&date| !is_weekend(date) && !calendar.is_festive(date))
        .filter(|&date| date <= period.end_date)
        .filter(|&date| !punch_dates.contains(&date))
        .filter(|&date| !report.gaps.iter().any(|g| g.date == date))
        .filter(|&date| !report.deviations.iter().any(|d| d.date == date))
        .filter(|&date| !missing_clock_outs.iter().any(|m| m.date == date))
        .filter(|&date| !calendar.is_vacation_override(date))
        .filter(|&date| !has_excusing_leave(intervals, date))
        .map(|date| AbsentDay { date })
        .collect()
}

/// Whether a vacation, medical or work-accident interval touches the day.
fn has_excusing_leave(intervals: &[Interval], date: NaiveDate) -> bool {
    intervals.iter().any(|interval| {
        let IntervalKind::Justified(category) = interval.kind else {
            return false;
        };
        let excusing = category.is_vacation_family()
            || matches!(
                category,
                AbsenceCategory::Medical | AbsenceCategory::WorkAccidentLeave
            );
        excusing && interval.start_date <= date && interval.end_date >= date
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayOverride, Gap};
    use std::collections::BTreeMap;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn week() -> ReportPeriod {
        // Monday 17th through Sunday 23rd.
        ReportPeriod {
            start_date: date(17),
            end_date: date(23),
        }
    }

    fn scan(
        calendar: &CalendarContext,
        punch_dates: &BTreeSet<NaiveDate>,
        report: &AnomalyReport,
        missing: &[MissingClockOut],
        intervals: &[Interval],
    ) -> Vec<NaiveDate> {
        scan_absent_days(&week(), calendar, punch_dates, report, missing, intervals)
            .into_iter()
            .map(|a| a.date)
            .collect()
    }

    #[test]
    fn test_empty_week_flags_all_weekdays() {
        let flagged = scan(
            &CalendarContext::default(),
            &BTreeSet::new(),
            &AnomalyReport::default(),
            &[],
            &[],
        );
        assert_eq!(
            flagged,
            vec![date(17), date(18), date(19), date(20), date(21)]
        );
    }

    #[test]
    fn test_days_with_punches_are_not_absent() {
        let mut punch_dates = BTreeSet::new();
        punch_dates.insert(date(17));
        punch_dates.insert(date(19));
        let flagged = scan(
            &CalendarContext::default(),
            &punch_dates,
            &AnomalyReport::default(),
            &[],
            &[],
        );
        assert_eq!(flagged, vec![date(18), date(20), date(21)]);
    }

    #[test]
    fn test_weekends_never_flagged() {
        let flagged = scan(
            &CalendarContext::default(),
            &BTreeSet::new(),
            &AnomalyReport::default(),
            &[],
            &[],
        );
        assert!(!flagged.contains(&date(22)));
        assert!(!flagged.contains(&date(23)));
    }

    #[test]
    fn test_festive_override_day_not_flagged() {
        let mut overrides = BTreeMap::new();
        overrides.insert(date(18), DayOverride::Holiday);
        let calendar = CalendarContext::new(BTreeSet::new(), overrides);
        let flagged = scan(
            &calendar,
            &BTreeSet::new(),
            &AnomalyReport::default(),
            &[],
            &[],
        );
        assert!(!flagged.contains(&date(18)));
    }

    #[test]
    fn test_vacation_override_day_not_flagged() {
        let mut overrides = BTreeMap::new();
        overrides.insert(date(18), DayOverride::Vacation);
        let calendar = CalendarContext::new(BTreeSet::new(), overrides);
        let flagged = scan(
            &calendar,
            &BTreeSet::new(),
            &AnomalyReport::default(),
            &[],
            &[],
        );
        assert!(!flagged.contains(&date(18)));
    }

    #[test]
    fn test_day_with_finding_not_flagged() {
        let report = AnomalyReport {
            gaps: vec![Gap {
                date: date(18),
                start: 420,
                end: 480,
            }],
            ..Default::default()
        };
        let flagged = scan(
            &CalendarContext::default(),
            &BTreeSet::new(),
            &report,
            &[],
            &[],
        );
        assert!(!flagged.contains(&date(18)));
    }

    #[test]
    fn test_day_with_missing_clock_out_not_flagged() {
        let missing = vec![MissingClockOut {
            date: date(20),
            time: 420,
        }];
        let flagged = scan(
            &CalendarContext::default(),
            &BTreeSet::new(),
            &AnomalyReport::default(),
            &missing,
            &[],
        );
        assert!(!flagged.contains(&date(20)));
    }

    #[test]
    fn test_medical_leave_day_not_flagged() {
        let intervals = vec![Interval::on_day(
            date(19),
            420,
            900,
            IntervalKind::Justified(AbsenceCategory::Medical),
        )];
        let flagged = scan(
            &CalendarContext::default(),
            &BTreeSet::new(),
            &AnomalyReport::default(),
            &[],
            &intervals,
        );
        assert!(!flagged.contains(&date(19)));
        assert!(flagged.contains(&date(20)));
    }

    #[test]
    fn test_non_excusing_leave_does_not_unflag() {
        // Union duties on a day with no punches do not excuse the absence.
        let intervals = vec![Interval::on_day(
            date(19),
            420,
            900,
            IntervalKind::Justified(AbsenceCategory::Union),
        )];
        let flagged = scan(
            &CalendarContext::default(),
            &BTreeSet::new(),
            &AnomalyReport::default(),
            &[],
            &intervals,
        );
        assert!(flagged.contains(&date(19)));
    }
}
