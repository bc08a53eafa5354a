//! Splitting work intervals across time-of-day and day-type buckets.
//!
//! A festive day sends the whole interval to the Festive bucket. Otherwise
//! the interval is intersected against fixed clock windows chosen by the
//! shift family; midnight-crossing intervals are split into per-day
//! sub-spans first. Per interval, the bucket contributions always sum to the
//! full duration.

use chrono::{Days, NaiveDate};

use crate::config::ShiftWindow;
use crate::models::{CalendarContext, Interval};

use super::time_math::{MINUTES_PER_DAY, overlap_minutes};

/// Start of the shared day window, 07:00.
pub const DAY_WINDOW_START: i64 = 420;
/// End of the shared day window, 15:00.
pub const DAY_WINDOW_END: i64 = 900;
/// End of the day-family overtime window, 20:00.
pub const OVERTIME1_WINDOW_END: i64 = 1200;
/// End of the evening window, 23:00.
pub const EVENING_WINDOW_END: i64 = 1380;
/// Shifts starting at or after 15:00 use the evening-family mapping.
pub const EVENING_FAMILY_START: u16 = 900;
/// End of the post-midnight carry-over band, 06:00.
pub const CARRY_OVER_BAND_END: i64 = 360;

/// The two bucket mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftFamily {
    /// Morning/central shifts: Day, Overtime-1, Night.
    Day,
    /// Evening/night shifts: Day (early arrivals), Evening, Night.
    Evening,
}

/// The bucket mapping a shift window uses.
pub fn shift_family(window: &ShiftWindow) -> ShiftFamily {
    if window.start_minute >= EVENING_FAMILY_START {
        ShiftFamily::Evening
    } else {
        ShiftFamily::Day
    }
}

/// Per-bucket minute totals. Conversion to decimal hours happens once, at
/// ledger assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketMinutes {
    /// Minutes in the 07:00–15:00 window.
    pub day: i64,
    /// Minutes in the 15:00–20:00 window of day-family shifts.
    pub overtime1: i64,
    /// Minutes in the 15:00–23:00 window of evening-family shifts.
    pub evening: i64,
    /// Minutes in the night window.
    pub night: i64,
    /// Minutes on festive days.
    pub festive: i64,
}

impl BucketMinutes {
    /// Sum over all buckets.
    pub fn total(&self) -> i64 {
        self.day + self.overtime1 + self.evening + self.night + self.festive
    }

    /// Adds another contribution into this one.
    pub fn merge(&mut self, other: &BucketMinutes) {
        self.day += other.day;
        self.overtime1 += other.overtime1;
        self.evening += other.evening;
        self.night += other.night;
        self.festive += other.festive;
    }
}

/// Bucket minutes contributed to one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayContribution {
    /// The calendar day the minutes land on.
    pub date: NaiveDate,
    /// The per-bucket minutes.
    pub minutes: BucketMinutes,
}

/// Splits one work interval across buckets, one contribution per calendar
/// day touched.
///
/// `window` is the shift window resolved for the interval's start day. The
/// post-midnight 00:00–06:00 portion of an evening-family shift that started
/// the previous (non-festive) day stays in Night even when the new day is
/// festive, so a shift's natural overrun is never misclassified.
pub fn allocate_interval(
    interval: &Interval,
    window: &ShiftWindow,
    calendar: &CalendarContext,
) -> Vec<DayContribution> {
    let family = shift_family(window);
    let start_day_festive = calendar.is_festive(interval.start_date);
    let mut contributions = Vec::new();

    for (date, span_start, span_end) in split_at_midnight(interval) {
        let length = span_end - span_start;
        if length <= 0 {
            continue;
        }

        let festive = calendar.is_festive(date);
        let carried_overrun =
            date > interval.start_date && family == ShiftFamily::Evening && !start_day_festive;

        let mut minutes = BucketMinutes::default();
        if festive {
            if carried_overrun {
                let night_part = overlap_minutes(span_start, span_end, 0, CARRY_OVER_BAND_END);
                minutes.night += night_part;
                minutes.festive += length - night_part;
            } else {
                minutes.festive += length;
            }
        } else {
            minutes.day += overlap_minutes(span_start, span_end, DAY_WINDOW_START, DAY_WINDOW_END);
            match family {
                ShiftFamily::Day => {
                    minutes.overtime1 +=
                        overlap_minutes(span_start, span_end, DAY_WINDOW_END, OVERTIME1_WINDOW_END);
                    minutes.night += overlap_minutes(
                        span_start,
                        span_end,
                        OVERTIME1_WINDOW_END,
                        MINUTES_PER_DAY,
                    ) + overlap_minutes(span_start, span_end, 0, DAY_WINDOW_START);
                }
                ShiftFamily::Evening => {
                    minutes.evening +=
                        overlap_minutes(span_start, span_end, DAY_WINDOW_END, EVENING_WINDOW_END);
                    minutes.night += overlap_minutes(
                        span_start,
                        span_end,
                        EVENING_WINDOW_END,
                        MINUTES_PER_DAY,
                    ) + overlap_minutes(span_start, span_end, 0, DAY_WINDOW_START);
                }
            }
        }

        contributions.push(DayContribution { date, minutes });
    }

    contributions
}

/// Splits an interval into per-day `(date, start, end)` sub-spans with ends
/// up to 1440. Bounded: punch-derived intervals span at most two days, and
/// the cursor advances one day per step.
fn split_at_midnight(interval: &Interval) -> Vec<(NaiveDate, i64, i64)> {
    let mut spans = Vec::new();
    let mut date = interval.start_date;
    let mut start = i64::from(interval.start_minute);

    while date < interval.end_date {
        spans.push((date, start, MINUTES_PER_DAY));
        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => return spans,
        };
        start = 0;
    }
    spans.push((date, start, i64::from(interval.end_minute)));
    spans
}
