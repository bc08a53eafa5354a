//! Pure minute-of-day arithmetic.
//!
//! All intermediate engine sums stay in whole minutes; conversion to decimal
//! hours happens once, at final aggregation, so rounding error never
//! compounds.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 1440;

/// Clamped overlap between two minute ranges.
///
/// Either range may cross midnight; an end smaller than its start is
/// normalized by adding one day. The result is never negative.
///
/// # Example
///
/// ```
/// use attendance_engine::reconcile::overlap_minutes;
///
/// assert_eq!(overlap_minutes(420, 900, 420, 900), 480);
/// assert_eq!(overlap_minutes(432, 900, 900, 1200), 0);
/// // 23:00-07:00 against 22:00-02:00
/// assert_eq!(overlap_minutes(1380, 420, 1320, 120), 180);
/// ```
pub fn overlap_minutes(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> i64 {
    let a_end = if a_end < a_start {
        a_end + MINUTES_PER_DAY
    } else {
        a_end
    };
    let b_end = if b_end < b_start {
        b_end + MINUTES_PER_DAY
    } else {
        b_end
    };
    (a_end.min(b_end) - a_start.max(b_start)).max(0)
}

/// Converts whole minutes to hours, rounded to 2 decimals half-up.
///
/// Only called at the final aggregation step.
///
/// # Example
///
/// ```
/// use attendance_engine::reconcile::to_hours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(to_hours(480), Decimal::from_str("8.00").unwrap());
/// assert_eq!(to_hours(468), Decimal::from_str("7.80").unwrap());
/// assert_eq!(to_hours(100), Decimal::from_str("1.67").unwrap());
/// ```
pub fn to_hours(minutes: i64) -> Decimal {
    let mut hours = (Decimal::from(minutes) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Fix the scale so ledgers serialize uniformly ("8.00", not "8").
    hours.rescale(2);
    hours
}

/// Days since the common era, used as an integer day key so per-day state
/// lives in sorted maps with O(1) adjacency checks and no string parsing.
pub fn day_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Shortest circular distance between two minutes of day.
pub fn circular_minute_distance(a: i64, b: i64) -> i64 {
    let d = (a - b).rem_euclid(MINUTES_PER_DAY);
    d.min(MINUTES_PER_DAY - d)
}
