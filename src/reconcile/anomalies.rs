//! Detection of late arrivals, gaps and workday deviations.
//!
//! The detector consumes the same punch stream and interval list the other
//! passes use and emits its own finding lists; nothing here mutates shared
//! state. Missing clock-outs are produced by the pairer, not here.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::ShiftWindow;
use crate::models::{
    CalendarContext, Gap, Interval, IntervalKind, LateArrival, PunchRecord, ReportPeriod,
    WorkdayDeviation,
};

use super::absence::STANDARD_DAY_MINUTES;
use super::time_math::{MINUTES_PER_DAY, day_ordinal, overlap_minutes, to_hours};

/// Grace period past the shift start before an arrival counts as late.
pub const LATE_ARRIVAL_GRACE_MINUTES: i64 = 2;

/// Residual delays below this are discarded.
pub const MIN_DELAY_MINUTES: i64 = 2;

/// Gaps must be strictly longer than this.
pub const MIN_GAP_MINUTES: i64 = 1;

/// Gaps at or beyond this length are not mid-day gaps (5 hours).
pub const MAX_GAP_MINUTES: i64 = 300;

/// Exits within this window before the shift end are normal completion.
pub const CLOSING_WINDOW_MINUTES: i64 = 60;

/// Post-midnight departures up to 06:00 are night-shift overrun.
pub const NIGHT_OVERRUN_BAND_END: i64 = 360;

/// Shortfalls at or below this tolerance never become deviations.
pub const DEVIATION_TOLERANCE_MINUTES: i64 = 2;

/// The findings the detector produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnomalyReport {
    /// Accepted late arrivals, chronological.
    pub late_arrivals: Vec<LateArrival>,
    /// Gap findings, chronological.
    pub gaps: Vec<Gap>,
    /// Workday deviations, chronological.
    pub deviations: Vec<WorkdayDeviation>,
}

/// Detects anomalies for every non-festive day of the period that has punch
/// activity and a physical shift window.
pub fn detect_anomalies(
    punches: &[PunchRecord],
    intervals: &[Interval],
    windows: &BTreeMap<i64, ShiftWindow>,
    calendar: &CalendarContext,
    period: &ReportPeriod,
) -> AnomalyReport {
    let mut report = AnomalyReport::default();

    let mut punches_by_date: BTreeMap<NaiveDate, Vec<&PunchRecord>> = BTreeMap::new();
    for punch in punches {
        if period.contains(punch.date) {
            punches_by_date.entry(punch.date).or_default().push(punch);
        }
    }

    for (&date, day_punches) in &punches_by_date {
        if calendar.is_festive(date) {
            continue;
        }
        // A day without a single entry is not a started workday: its exits
        // only close intervals begun the day before (night-shift
        // continuations) or are unpairable strays.
        if !day_punches.iter().any(|p| p.kind.is_entry()) {
            continue;
        }
        let Some(window) = windows.get(&day_ordinal(date)) else {
            continue;
        };
        if window.is_virtual {
            continue;
        }

        let justified = justified_spans(intervals, date);
        let timeline = day_timeline(intervals, date);
        let mut day_gaps: Vec<Gap> = Vec::new();

        if let Some(late) = detect_late_arrival(date, day_punches, window, &justified) {
            if let Some(gap) = late_arrival_gap(&late, &justified) {
                day_gaps.push(gap);
            }
            report.late_arrivals.push(late);
        }

        detect_mid_day_gaps(date, &timeline, &justified, &mut day_gaps);
        detect_trailing_gap(date, &timeline, window, &justified, &mut day_gaps);

        if let Some(deviation) = detect_deviation(date, day_punches, &timeline, &day_gaps) {
            report.deviations.push(deviation);
        }
        report.gaps.append(&mut day_gaps);
    }

    report
}

/// Justified spans starting on `date`, as absolute minutes from that day's
/// midnight, sorted by start.
fn justified_spans(intervals: &[Interval], date: NaiveDate) -> Vec<(i64, i64)> {
    let mut spans: Vec<(i64, i64)> = intervals
        .iter()
        .filter(|i| i.start_date == date && matches!(i.kind, IntervalKind::Justified(_)))
        .map(|i| {
            let start = i64::from(i.start_minute);
            (start, start + i.duration_minutes())
        })
        .collect();
    spans.sort_unstable();
    spans
}

/// All intervals starting on `date`, as `(start, end, kind)` in absolute
/// minutes, sorted by start. Ends may exceed 1440 for midnight crossers.
fn day_timeline(intervals: &[Interval], date: NaiveDate) -> Vec<(i64, i64, IntervalKind)> {
    let mut timeline: Vec<(i64, i64, IntervalKind)> = intervals
        .iter()
        .filter(|i| i.start_date == date)
        .map(|i| {
            let start = i64::from(i.start_minute);
            (start, start + i.duration_minutes(), i.kind)
        })
        .collect();
    timeline.sort_unstable_by_key(|&(start, end, _)| (start, end));
    timeline
}

/// Total justified cover within `[from, to)`.
fn justified_cover(justified: &[(i64, i64)], from: i64, to: i64) -> i64 {
    justified
        .iter()
        .map(|&(start, end)| overlap_minutes(start, end, from, to))
        .sum()
}

/// Advances a point forward through every justified span that covers it,
/// returning where contiguous cover ends. Bounded by the span count.
fn contiguous_cover_end(mut point: i64, justified: &[(i64, i64)]) -> i64 {
    for _ in 0..=justified.len() {
        let mut advanced = false;
        for &(start, end) in justified {
            if start <= point && end > point {
                point = end;
                advanced = true;
            }
        }
        if !advanced {
            break;
        }
    }
    point
}

/// Late arrival: first entry after shift start plus grace, shrunk by any
/// justified cover of the delay window; residuals under 2 minutes drop.
fn detect_late_arrival(
    date: NaiveDate,
    day_punches: &[&PunchRecord],
    window: &ShiftWindow,
    justified: &[(i64, i64)],
) -> Option<LateArrival> {
    let first_entry = day_punches.iter().find(|p| p.kind.is_entry())?;
    let arrival = i64::from(first_entry.minute);
    let shift_start = i64::from(window.start_minute);

    if arrival <= shift_start + LATE_ARRIVAL_GRACE_MINUTES {
        return None;
    }

    let cover = justified_cover(justified, shift_start, arrival);
    let delay = arrival - shift_start - cover;
    if delay < MIN_DELAY_MINUTES {
        return None;
    }

    Some(LateArrival {
        date,
        expected_start: window.start_minute,
        actual_start: first_entry.minute,
        minutes: delay,
    })
}

/// The gap synthesized for an accepted delay, from the shift start (moved
/// forward past any justification covering the window's beginning) to the
/// actual arrival. Recorded so an operator can justify it later.
fn late_arrival_gap(late: &LateArrival, justified: &[(i64, i64)]) -> Option<Gap> {
    let start = contiguous_cover_end(i64::from(late.expected_start), justified);
    let end = i64::from(late.actual_start);
    if start >= end {
        return None;
    }
    Some(Gap {
        date: late.date,
        start: start as u16,
        end: end as u16,
    })
}

/// Mid-day gaps between consecutive same-day intervals.
fn detect_mid_day_gaps(
    date: NaiveDate,
    timeline: &[(i64, i64, IntervalKind)],
    justified: &[(i64, i64)],
    day_gaps: &mut Vec<Gap>,
) {
    for pair in timeline.windows(2) {
        let (_, prev_end, _) = pair[0];
        let (next_start, _, _) = pair[1];
        if prev_end >= MINUTES_PER_DAY {
            continue;
        }
        let length = next_start - prev_end;
        if length <= MIN_GAP_MINUTES || length >= MAX_GAP_MINUTES {
            continue;
        }
        let uncovered = length - justified_cover(justified, prev_end, next_start);
        if uncovered > MIN_GAP_MINUTES {
            day_gaps.push(Gap {
                date,
                start: prev_end as u16,
                end: next_start as u16,
            });
        }
    }
}

/// A final exit well before the shift end with no return.
///
/// Excluded as normal completion: exits within the shift's closing hour, and
/// post-midnight departures in the 00:00–06:00 overrun band.
fn detect_trailing_gap(
    date: NaiveDate,
    timeline: &[(i64, i64, IntervalKind)],
    window: &ShiftWindow,
    justified: &[(i64, i64)],
    day_gaps: &mut Vec<Gap>,
) {
    let Some(&(_, last_end, _)) = timeline.last() else {
        return;
    };
    let shift_end = i64::from(window.start_minute) + window.duration_minutes();

    if last_end >= shift_end - CLOSING_WINDOW_MINUTES {
        return;
    }
    if last_end >= MINUTES_PER_DAY && last_end - MINUTES_PER_DAY <= NIGHT_OVERRUN_BAND_END {
        return;
    }
    // Midnight-crossing shift ends cannot be expressed as a same-day gap;
    // the overrun band above has already excluded the normal cases.
    if shift_end > MINUTES_PER_DAY {
        return;
    }

    let length = shift_end - last_end;
    if length <= MIN_GAP_MINUTES || length >= MAX_GAP_MINUTES {
        return;
    }
    let uncovered = length - justified_cover(justified, last_end, shift_end);
    if uncovered > MIN_GAP_MINUTES {
        day_gaps.push(Gap {
            date,
            start: last_end as u16,
            end: shift_end as u16,
        });
    }
}

/// Workday deviation: the day's worked plus justified minutes fall short of
/// the standard day, and neither the day's gap findings nor its short breaks
/// account for the shortfall.
fn detect_deviation(
    date: NaiveDate,
    day_punches: &[&PunchRecord],
    timeline: &[(i64, i64, IntervalKind)],
    day_gaps: &[Gap],
) -> Option<WorkdayDeviation> {
    let worked: i64 = timeline
        .iter()
        .filter(|(_, _, kind)| *kind == IntervalKind::Work)
        .map(|(start, end, _)| end - start)
        .sum();
    let justified_total: i64 = timeline
        .iter()
        .filter(|(_, _, kind)| matches!(kind, IntervalKind::Justified(_)))
        .map(|(start, end, _)| end - start)
        .sum();
    let breaks: i64 = timeline
        .iter()
        .filter(|(_, _, kind)| *kind == IntervalKind::Break)
        .map(|(start, end, _)| end - start)
        .sum();

    let accounted = worked + justified_total;
    if accounted >= STANDARD_DAY_MINUTES {
        return None;
    }

    let shortfall = STANDARD_DAY_MINUTES - accounted;
    let gap_total: i64 = day_gaps
        .iter()
        .map(|g| i64::from(g.end) - i64::from(g.start))
        .sum();
    if shortfall - gap_total - breaks <= DEVIATION_TOLERANCE_MINUTES {
        return None;
    }

    let first_punch = day_punches.iter().map(|p| p.minute).min()?;
    let last_punch = day_punches.iter().map(|p| p.minute).max()?;
    Some(WorkdayDeviation {
        date,
        actual_hours: to_hours(worked),
        first_punch,
        last_punch,
    })
}
