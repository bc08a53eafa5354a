//! Per-employee orchestration of the reconciliation passes.
//!
//! The builder is a pure function: normalize and sort the punches, resolve
//! one shift window per day, pair intervals, then let the allocator, the
//! accumulator, the anomaly detector and the absent-day scanner each consume
//! the intervals and emit their own results, merged into one ledger at the
//! end. All caches live for a single employee's computation and are
//! discarded with it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::config::{EngineConfig, ShiftWindow};
use crate::error::EngineResult;
use crate::models::{
    CalendarContext, DayOverride, DelaySummary, EmployeeLedger, HourBuckets, IntervalKind,
    LedgerWarning, PunchRecord, RawPunch, ReportPeriod, ShortBreakSummary,
};

use super::absence::{accumulate, annual_credits, totals_in_reporting_units};
use super::absent_days::scan_absent_days;
use super::anomalies::detect_anomalies;
use super::buckets::{BucketMinutes, allocate_interval};
use super::pairing::pair_punches;
use super::shift_resolver::resolve_shift;
use super::time_math::{day_ordinal, to_hours};

/// Builds the reconciled ledger for one employee.
///
/// The punch stream may cover the whole year to date; bucketing and findings
/// are reported for `period` only, while annual credits consume everything
/// from 1 January through the period end.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidPeriod`] for an inverted date
/// range and [`crate::error::EngineError::ScanBudgetExceeded`] when a scan
/// overruns its safety budget; the latter aborts this employee only.
pub fn build_ledger(
    employee_id: i64,
    raw_punches: &[RawPunch],
    period: ReportPeriod,
    holidays: &BTreeSet<NaiveDate>,
    overrides: &BTreeMap<NaiveDate, DayOverride>,
    config: &EngineConfig,
) -> EngineResult<EmployeeLedger> {
    period.validate()?;

    let year_to_date = period.year_to_date();
    let processing = ReportPeriod {
        start_date: year_to_date
            .padded()
            .start_date
            .min(period.padded().start_date),
        end_date: period.padded().end_date,
    };

    let mut warnings: Vec<LedgerWarning> = Vec::new();
    let mut punches: Vec<PunchRecord> = Vec::new();
    for raw in raw_punches {
        match PunchRecord::normalize(raw) {
            Ok(record) => {
                if record.employee_id != employee_id {
                    warnings.push(LedgerWarning::data_quality(format!(
                        "punch for employee {} in stream of employee {}",
                        record.employee_id, employee_id
                    )));
                    continue;
                }
                if processing.contains(record.date) {
                    punches.push(record);
                }
            }
            Err(message) => warnings.push(LedgerWarning::data_quality(message)),
        }
    }
    punches.sort_by_key(|p| (p.date, p.minute));

    let mut calendar = CalendarContext::new(holidays.clone(), overrides.clone());
    for punch in &punches {
        if punch.holiday_flagged {
            calendar.flag_holiday(punch.date);
        }
    }

    // One resolved window per day with punches, reused by every later pass.
    let mut windows: BTreeMap<i64, ShiftWindow> = BTreeMap::new();
    for day_punches in punches.chunk_by(|a, b| a.date == b.date) {
        let window = resolve_shift(&config.shifts, day_punches);
        windows.insert(day_ordinal(day_punches[0].date), window.clone());
    }

    let pairing = pair_punches(employee_id, &punches, &windows)?;

    let mut bucket_minutes = BucketMinutes::default();
    for interval in &pairing.intervals {
        if interval.kind != IntervalKind::Work {
            continue;
        }
        let Some(window) = windows.get(&day_ordinal(interval.start_date)) else {
            continue;
        };
        for contribution in allocate_interval(interval, window, &calendar) {
            if period.contains(contribution.date) {
                bucket_minutes.merge(&contribution.minutes);
            }
        }
    }

    let period_absences = accumulate(&pairing.intervals, &calendar, &period);
    let ytd_absences = accumulate(&pairing.intervals, &calendar, &year_to_date);

    // Festive short breaks also count as festive presence.
    for (date, minutes) in &period_absences.festive_break_credits {
        if period.contains(*date) {
            bucket_minutes.festive += minutes;
        }
    }

    let report = detect_anomalies(&punches, &pairing.intervals, &windows, &calendar, &period);

    let missing_clock_outs: Vec<_> = pairing
        .missing_clock_outs
        .into_iter()
        .filter(|m| period.contains(m.date))
        .collect();

    let punch_dates: BTreeSet<NaiveDate> = punches.iter().map(|p| p.date).collect();
    let absent_days = scan_absent_days(
        &period,
        &calendar,
        &punch_dates,
        &report,
        &missing_clock_outs,
        &pairing.intervals,
    );

    let ytd_totals = totals_in_reporting_units(&ytd_absences);
    let credits = annual_credits(&ytd_totals, &config.entitlements);

    let mut gaps = report.gaps;
    gaps.sort_by_key(|g| (g.date, g.start));

    let delays = DelaySummary {
        count: report.late_arrivals.len() as u32,
        total_minutes: report.late_arrivals.iter().map(|l| l.minutes).sum(),
    };

    Ok(EmployeeLedger {
        employee_id,
        period,
        buckets: HourBuckets {
            day: to_hours(bucket_minutes.day),
            overtime1: to_hours(bucket_minutes.overtime1),
            evening: to_hours(bucket_minutes.evening),
            night: to_hours(bucket_minutes.night),
            festive: to_hours(bucket_minutes.festive),
        },
        absences_period: totals_in_reporting_units(&period_absences),
        absences_ytd: ytd_totals,
        credits,
        short_breaks: ShortBreakSummary {
            count: period_absences.short_break_count,
            hours: to_hours(period_absences.short_break_minutes),
        },
        delays,
        late_arrivals: report.late_arrivals,
        gaps,
        deviations: report.deviations,
        missing_clock_outs,
        absent_days,
        warnings,
    })
}
