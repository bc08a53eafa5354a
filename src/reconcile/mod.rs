//! Reconciliation logic for the engine.
//!
//! This module contains the passes that turn a punch stream into a ledger:
//! minute arithmetic, shift resolution, interval pairing, bucket allocation,
//! absence accumulation, anomaly detection, absent-day scanning and the
//! per-employee orchestration that composes them.

mod absence;
mod absent_days;
mod anomalies;
mod buckets;
mod ledger_builder;
mod pairing;
mod shift_resolver;
mod time_math;

pub use absence::{
    AbsenceAccumulation, STANDARD_DAY_MINUTES, accumulate, annual_credits,
    totals_in_reporting_units,
};
pub use absent_days::scan_absent_days;
pub use anomalies::{
    AnomalyReport, CLOSING_WINDOW_MINUTES, DEVIATION_TOLERANCE_MINUTES,
    LATE_ARRIVAL_GRACE_MINUTES, MAX_GAP_MINUTES, MIN_DELAY_MINUTES, MIN_GAP_MINUTES,
    NIGHT_OVERRUN_BAND_END, detect_anomalies,
};
pub use buckets::{
    BucketMinutes, CARRY_OVER_BAND_END, DAY_WINDOW_END, DAY_WINDOW_START, DayContribution,
    EVENING_FAMILY_START, EVENING_WINDOW_END, OVERTIME1_WINDOW_END, ShiftFamily,
    allocate_interval, shift_family,
};
pub use ledger_builder::build_ledger;
pub use pairing::{
    EXPLICIT_RANGE_ANCHOR_TOLERANCE_MINUTES, PAIRING_LOOKAHEAD_CAP, PairingOutcome, pair_punches,
};
pub use shift_resolver::resolve_shift;
pub use time_math::{
    MINUTES_PER_DAY, circular_minute_distance, day_ordinal, overlap_minutes, to_hours,
};
