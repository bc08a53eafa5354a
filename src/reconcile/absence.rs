//! Absence-category accumulation and annual-credit arithmetic.
//!
//! Justified interval durations are routed into per-category minute totals;
//! short breaks get their own counter; whole-day vacation overrides consume
//! vacation days. Year-to-date consumption re-runs the same accumulator over
//! the January-through-period-end range and feeds the credit snapshot.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::EntitlementConfig;
use crate::models::{
    AbsenceCategory, AnnualCredit, CalendarContext, Interval, IntervalKind, ReportPeriod,
    is_weekend,
};

use super::time_math::to_hours;

/// Minutes in the standard working day; vacation-family totals divide by
/// this to become days.
pub const STANDARD_DAY_MINUTES: i64 = 480;

/// Raw accumulation output, all in minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsenceAccumulation {
    /// Justified minutes per category.
    pub minutes_by_category: BTreeMap<AbsenceCategory, i64>,
    /// Number of short breaks taken.
    pub short_break_count: u32,
    /// Total short-break minutes.
    pub short_break_minutes: i64,
    /// Short-break minutes taken on festive days, credited to the Festive
    /// bucket so festive totals always equal actual presence.
    pub festive_break_credits: Vec<(NaiveDate, i64)>,
}

impl AbsenceAccumulation {
    /// Justified minutes recorded for one category.
    pub fn minutes_for(&self, category: AbsenceCategory) -> i64 {
        self.minutes_by_category.get(&category).copied().unwrap_or(0)
    }
}

/// Accumulates justified intervals, short breaks and whole-day vacation
/// overrides whose start date falls inside `period`.
pub fn accumulate(
    intervals: &[Interval],
    calendar: &CalendarContext,
    period: &ReportPeriod,
) -> AbsenceAccumulation {
    let mut accumulation = AbsenceAccumulation::default();

    for interval in intervals {
        if !period.contains(interval.start_date) {
            continue;
        }
        match interval.kind {
            IntervalKind::Justified(category) => {
                *accumulation
                    .minutes_by_category
                    .entry(category)
                    .or_insert(0) += interval.duration_minutes();
            }
            IntervalKind::Break => {
                accumulation.short_break_count += 1;
                accumulation.short_break_minutes += interval.duration_minutes();
                if calendar.is_festive(interval.start_date) {
                    accumulation
                        .festive_break_credits
                        .push((interval.start_date, interval.duration_minutes()));
                }
            }
            IntervalKind::Work => {}
        }
    }

    // Whole-day vacation overrides on working days consume a full day each.
    for date in period.days() {
        if calendar.is_vacation_override(date) && !is_weekend(date) && !calendar.is_festive(date) {
            *accumulation
                .minutes_by_category
                .entry(AbsenceCategory::Vacation)
                .or_insert(0) += STANDARD_DAY_MINUTES;
        }
    }

    accumulation
}

/// Converts minute totals to reporting units: days for the vacation family,
/// hours for everything else, both to 2 decimals.
pub fn totals_in_reporting_units(
    accumulation: &AbsenceAccumulation,
) -> BTreeMap<AbsenceCategory, Decimal> {
    accumulation
        .minutes_by_category
        .iter()
        .map(|(&category, &minutes)| {
            let amount = if category.is_vacation_family() {
                let mut days = (Decimal::from(minutes) / Decimal::from(STANDARD_DAY_MINUTES))
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                days.rescale(2);
                days
            } else {
                to_hours(minutes)
            };
            (category, amount)
        })
        .collect()
}

/// Builds the annual-credit snapshot from year-to-date totals.
///
/// `remaining = entitlement - consumed_ytd`; over-consumption goes negative
/// and is surfaced as-is.
pub fn annual_credits(
    ytd_totals: &BTreeMap<AbsenceCategory, Decimal>,
    entitlements: &EntitlementConfig,
) -> Vec<AnnualCredit> {
    let entitled = [
        (AbsenceCategory::Medical, entitlements.medical_hours),
        (AbsenceCategory::Vacation, entitlements.vacation_days),
        (AbsenceCategory::FreeDisposal, entitlements.free_disposal_hours),
        (AbsenceCategory::FamilyLaw, entitlements.family_law_hours),
    ];

    entitled
        .into_iter()
        .map(|(category, entitlement)| {
            let consumed_ytd = ytd_totals.get(&category).copied().unwrap_or(Decimal::ZERO);
            AnnualCredit {
                category,
                entitlement,
                consumed_ytd,
                remaining: entitlement - consumed_ytd,
            }
        })
        .collect()
}
