//! Chronological pairing of punches into typed intervals.
//!
//! The pairer walks one employee's sorted punch stream with an explicit
//! cursor, pairing each entry with the next exit at or after it. Pairs are
//! consumed by advancing the cursor past the exit, so no punch is ever
//! double-counted. Every scan is bounded so malformed input can never hang
//! the engine.

use std::collections::BTreeMap;

use crate::config::ShiftWindow;
use crate::error::{EngineError, EngineResult};
use crate::models::{Interval, IntervalKind, MissingClockOut, PunchKind, PunchRecord};

use super::time_math::day_ordinal;

/// Hard cap on forward-search steps when looking for a closing exit.
pub const PAIRING_LOOKAHEAD_CAP: usize = 64;

/// How close an explicit range start must sit to the entry punch for the
/// range to replace the punch times as the interval's true extent.
pub const EXPLICIT_RANGE_ANCHOR_TOLERANCE_MINUTES: i64 = 1;

/// An exit further than this from its entry can never close it; it belongs
/// to a later shift.
pub const MAX_PAIR_SPAN_MINUTES: i64 = 1440;

/// Overall scan budget per input punch. Sized so the structurally bounded
/// scans (at most two capped lookaheads per punch) can never trip it; the
/// budget exists to guarantee termination even if those bounds regress.
const SCAN_BUDGET_FACTOR: usize = 4 * PAIRING_LOOKAHEAD_CAP;

/// Everything the pairing pass produces.
#[derive(Debug, Clone, Default)]
pub struct PairingOutcome {
    /// Reconciled intervals, in stream order.
    pub intervals: Vec<Interval>,
    /// Orphaned entries with no matching exit.
    pub missing_clock_outs: Vec<MissingClockOut>,
}

/// Pairs a sorted punch stream into typed intervals.
///
/// `windows` holds the resolved shift window per day ordinal; it is needed to
/// recognize orphaned entries that a later justified exit explicitly closes
/// out to the shift's theoretical end.
///
/// # Errors
///
/// Returns [`EngineError::ScanBudgetExceeded`] if the total scanning work
/// exceeds a budget proportional to the input length. This aborts only the
/// current employee.
pub fn pair_punches(
    employee_id: i64,
    punches: &[PunchRecord],
    windows: &BTreeMap<i64, ShiftWindow>,
) -> EngineResult<PairingOutcome> {
    let mut outcome = PairingOutcome::default();
    let mut budget = punches.len().saturating_mul(SCAN_BUDGET_FACTOR) + 16;
    let mut cursor = 0;

    while cursor < punches.len() {
        spend(&mut budget, employee_id)?;
        let punch = &punches[cursor];

        if !punch.kind.is_entry() {
            // An exit with no open entry is ignored for pairing; gap
            // detection still observes the surrounding intervals.
            cursor += 1;
            continue;
        }

        match find_closing_exit(punches, cursor, &mut budget, employee_id)? {
            Some(exit_index) => {
                outcome
                    .intervals
                    .push(make_interval(punch, &punches[exit_index]));
                cursor = exit_index + 1;
            }
            None => {
                if !closed_by_later_justified_exit(
                    punches,
                    cursor,
                    windows,
                    &mut budget,
                    employee_id,
                )? {
                    outcome.missing_clock_outs.push(MissingClockOut {
                        date: punch.date,
                        time: punch.minute,
                    });
                }
                cursor += 1;
            }
        }
    }

    Ok(outcome)
}

fn spend(budget: &mut usize, employee_id: i64) -> EngineResult<()> {
    if *budget == 0 {
        return Err(EngineError::ScanBudgetExceeded {
            employee_id,
            context: "pairing punches".to_string(),
        });
    }
    *budget -= 1;
    Ok(())
}

/// Finds the next exit at or after the entry at `entry_index`.
///
/// The search is bounded both by a step cap and by the calendar: an exit
/// more than one shift-length (24h) past the entry can never close it, so a
/// forgotten clock-out does not steal the next day's exit.
fn find_closing_exit(
    punches: &[PunchRecord],
    entry_index: usize,
    budget: &mut usize,
    employee_id: i64,
) -> EngineResult<Option<usize>> {
    let entry = &punches[entry_index];

    for (steps, index) in (entry_index + 1..punches.len()).enumerate() {
        if steps >= PAIRING_LOOKAHEAD_CAP {
            break;
        }
        spend(budget, employee_id)?;

        let candidate = &punches[index];
        let span = (day_ordinal(candidate.date) - day_ordinal(entry.date)) * 1440
            + i64::from(candidate.minute)
            - i64::from(entry.minute);
        if span > MAX_PAIR_SPAN_MINUTES {
            break;
        }
        if candidate.kind.is_exit() && span >= 0 {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Builds the interval for one entry/exit pair.
///
/// When the exit carries an explicit range anchored at the entry punch, the
/// range (not the raw punch times) defines the interval's true extent, so a
/// single pair can represent a longer or shorter justified period than the
/// physical clock action.
fn make_interval(entry: &PunchRecord, exit: &PunchRecord) -> Interval {
    let kind = match exit.kind {
        PunchKind::OrdinaryExit => IntervalKind::Work,
        PunchKind::ShortBreakExit => IntervalKind::Break,
        PunchKind::JustifiedExit(category) => IntervalKind::Justified(category),
        PunchKind::OrdinaryEntry => IntervalKind::Work,
    };

    if let Some((range_start, range_end)) = exit.explicit_range {
        let anchor_offset = i64::from(range_start) - i64::from(entry.minute);
        if anchor_offset.abs() <= EXPLICIT_RANGE_ANCHOR_TOLERANCE_MINUTES {
            return Interval::on_day(entry.date, range_start, range_end, kind);
        }
    }

    Interval {
        start_date: entry.date,
        start_minute: entry.minute,
        end_date: exit.date,
        end_minute: exit.minute,
        kind,
    }
}

/// Whether a later justified exit explicitly closes the orphaned entry out
/// to its shift's theoretical end.
///
/// Such an exit sits beyond the pairing horizon (otherwise it would have
/// closed the entry as a normal pair), typically an operator correction
/// recorded days later. It suppresses the MissingClockOut finding without
/// producing an interval.
fn closed_by_later_justified_exit(
    punches: &[PunchRecord],
    entry_index: usize,
    windows: &BTreeMap<i64, ShiftWindow>,
    budget: &mut usize,
    employee_id: i64,
) -> EngineResult<bool> {
    let entry = &punches[entry_index];
    let Some(window) = windows.get(&day_ordinal(entry.date)) else {
        return Ok(false);
    };
    if window.is_virtual {
        return Ok(false);
    }

    for (steps, index) in (entry_index + 1..punches.len()).enumerate() {
        if steps >= PAIRING_LOOKAHEAD_CAP {
            break;
        }
        spend(budget, employee_id)?;

        let candidate = &punches[index];
        if matches!(candidate.kind, PunchKind::JustifiedExit(_))
            && candidate
                .explicit_range
                .is_some_and(|(_, range_end)| range_end >= window.end_minute)
        {
            return Ok(true);
        }
    }
    Ok(false)
}
