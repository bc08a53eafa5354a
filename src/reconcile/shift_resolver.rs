//! Shift-window resolution for one employee-day.
//!
//! An explicit shift hint always wins. Without one, the resolver picks the
//! physical window whose start is closest to the first entry's time of day,
//! penalizing windows that have not started yet: arriving early to a future
//! shift is judged less likely than arriving late to one already underway.

use crate::config::{ShiftTable, ShiftWindow};
use crate::models::PunchRecord;

use super::time_math::{MINUTES_PER_DAY, circular_minute_distance};

/// Resolves the shift window for one day from that day's punches.
///
/// Resolution order:
/// 1. the first non-empty shift hint that names a known window;
/// 2. the closest-start heuristic against the first entry (falling back to
///    the first punch of any kind);
/// 3. the configured default window when the day has no punches.
///
/// The caller caches the result per (employee, day) for reuse by every later
/// component that day.
pub fn resolve_shift<'a>(table: &'a ShiftTable, day_punches: &[PunchRecord]) -> &'a ShiftWindow {
    if let Some(window) = day_punches
        .iter()
        .filter_map(|p| p.shift_hint.as_deref())
        .find_map(|hint| table.find(hint))
    {
        return window;
    }

    let reference = day_punches
        .iter()
        .find(|p| p.kind.is_entry())
        .or_else(|| day_punches.first());

    match reference {
        Some(punch) => closest_window(table, i64::from(punch.minute)),
        None => table.default_window(),
    }
}

/// Picks the physical window with the lowest start-distance score.
///
/// Ties keep the earlier window in table order.
fn closest_window<'a>(table: &'a ShiftTable, entry_minute: i64) -> &'a ShiftWindow {
    let mut best: Option<(&ShiftWindow, i64)> = None;
    for window in table.physical_windows() {
        let score = start_distance_score(window, entry_minute, table.early_start_penalty);
        match best {
            Some((_, best_score)) if best_score <= score => {}
            _ => best = Some((window, score)),
        }
    }
    best.map(|(w, _)| w).unwrap_or_else(|| table.default_window())
}

/// Circular distance from the entry to the window start, multiplied by the
/// early-start penalty when the window has not started yet.
fn start_distance_score(window: &ShiftWindow, entry_minute: i64, penalty: u32) -> i64 {
    let start = i64::from(window.start_minute);
    let raw = circular_minute_distance(start, entry_minute);
    let minutes_until_start = (start - entry_minute).rem_euclid(MINUTES_PER_DAY);
    if minutes_until_start > 0 && minutes_until_start < MINUTES_PER_DAY / 2 {
        raw * i64::from(penalty)
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PunchKind, PunchRecord};
    use chrono::NaiveDate;

    fn punch(minute: u16, kind: PunchKind, hint: Option<&str>) -> PunchRecord {
        PunchRecord {
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
            minute,
            kind,
            explicit_range: None,
            holiday_flagged: false,
            shift_hint: hint.map(str::to_string),
        }
    }

    fn entry(minute: u16) -> PunchRecord {
        punch(minute, PunchKind::OrdinaryEntry, None)
    }

    #[test]
    fn test_hint_wins_over_heuristic() {
        let table = ShiftTable::default();
        // An arrival at 07:02 would resolve to morning, but the hint says evening.
        let punches = vec![punch(422, PunchKind::OrdinaryEntry, Some("evening"))];
        assert_eq!(resolve_shift(&table, &punches).name, "evening");
    }

    #[test]
    fn test_hint_is_case_insensitive() {
        let table = ShiftTable::default();
        let punches = vec![punch(422, PunchKind::OrdinaryEntry, Some("Night"))];
        assert_eq!(resolve_shift(&table, &punches).name, "night");
    }

    #[test]
    fn test_unknown_hint_falls_back_to_heuristic() {
        let table = ShiftTable::default();
        let punches = vec![punch(422, PunchKind::OrdinaryEntry, Some("graveyard"))];
        assert_eq!(resolve_shift(&table, &punches).name, "morning");
    }

    #[test]
    fn test_hint_can_select_virtual_window() {
        let table = ShiftTable::default();
        let punches = vec![punch(422, PunchKind::OrdinaryEntry, Some("vacation"))];
        let window = resolve_shift(&table, &punches);
        assert!(window.is_virtual);
    }

    #[test]
    fn test_on_time_morning_arrival() {
        let table = ShiftTable::default();
        assert_eq!(resolve_shift(&table, &[entry(420)]).name, "morning");
    }

    #[test]
    fn test_late_morning_arrival_still_morning() {
        // 07:40 is 40 past morning and 20 before central; the unstarted
        // central window is penalized 3x, so morning wins.
        let table = ShiftTable::default();
        assert_eq!(resolve_shift(&table, &[entry(460)]).name, "morning");
    }

    #[test]
    fn test_central_arrival() {
        let table = ShiftTable::default();
        assert_eq!(resolve_shift(&table, &[entry(480)]).name, "central");
    }

    #[test]
    fn test_evening_arrival() {
        let table = ShiftTable::default();
        assert_eq!(resolve_shift(&table, &[entry(905)]).name, "evening");
    }

    #[test]
    fn test_night_arrival_before_start() {
        // 22:50: ten minutes before night start; the 3x penalty still beats
        // evening, which started 110 minutes ago.
        let table = ShiftTable::default();
        assert_eq!(resolve_shift(&table, &[entry(1370)]).name, "night");
    }

    #[test]
    fn test_post_midnight_arrival_resolves_night() {
        // 00:10 is 70 minutes after the night start across midnight.
        let table = ShiftTable::default();
        assert_eq!(resolve_shift(&table, &[entry(10)]).name, "night");
    }

    #[test]
    fn test_exit_only_day_uses_first_punch() {
        let table = ShiftTable::default();
        let punches = vec![punch(910, PunchKind::OrdinaryExit, None)];
        assert_eq!(resolve_shift(&table, &punches).name, "evening");
    }

    #[test]
    fn test_no_punches_defaults_to_morning() {
        let table = ShiftTable::default();
        assert_eq!(resolve_shift(&table, &[]).name, "morning");
    }

    #[test]
    fn test_penalty_factor_is_configurable() {
        let mut table = ShiftTable::default();
        table.early_start_penalty = 1;
        // Without the penalty, 07:40 is closer to central (20) than morning (40).
        assert_eq!(resolve_shift(&table, &[entry(460)]).name, "central");
    }
}
