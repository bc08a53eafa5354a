//! Punch records and absence classification.
//!
//! This module defines the wire-shaped [`RawPunch`] supplied by the transport
//! layer, the normalized [`PunchRecord`] the engine computes from, and the
//! [`PunchKind`]/[`AbsenceCategory`] taxonomy that classifies every record
//! once at ingestion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Absence code meaning "short break" (TAJ), tracked as its own punch kind.
pub const SHORT_BREAK_CODE: i32 = 14;

/// The closed set of justified-absence categories.
///
/// Each category maps from exactly one numeric absence code; codes 0, 1 and
/// absent codes denote ordinary punches, code 14 is the short break, and any
/// unrecognized code degrades to [`AbsenceCategory::Other`] rather than
/// failing the run.
///
/// # Example
///
/// ```
/// use attendance_engine::models::AbsenceCategory;
///
/// assert_eq!(AbsenceCategory::from_code(2), AbsenceCategory::Medical);
/// assert_eq!(AbsenceCategory::from_code(99), AbsenceCategory::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceCategory {
    /// Medical appointment or treatment (code 2), consumed in hours.
    Medical,
    /// Official leave (code 3).
    OfficialLeave,
    /// Personal leave (code 4).
    PersonalLeave,
    /// Current-year vacation (code 5), consumed in days.
    Vacation,
    /// Specialist consultation or accident follow-up (code 6).
    Specialist,
    /// Free-disposal hours (code 7), consumed in hours.
    FreeDisposal,
    /// Vacation carried over from the prior year (code 8), consumed in days.
    VacationPriorYear,
    /// Union duties (code 9).
    Union,
    /// Work-accident leave (code 10).
    WorkAccidentLeave,
    /// Common-illness leave (code 11).
    CommonIllnessLeave,
    /// Family-law leave (code 13), consumed in hours.
    FamilyLaw,
    /// Any absence code outside the closed table.
    Other,
}

impl AbsenceCategory {
    /// Maps a numeric absence code to its category.
    ///
    /// Callers are expected to have already filtered out ordinary codes
    /// (0, 1, absent) and the short-break code 14.
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => AbsenceCategory::Medical,
            3 => AbsenceCategory::OfficialLeave,
            4 => AbsenceCategory::PersonalLeave,
            5 => AbsenceCategory::Vacation,
            6 => AbsenceCategory::Specialist,
            7 => AbsenceCategory::FreeDisposal,
            8 => AbsenceCategory::VacationPriorYear,
            9 => AbsenceCategory::Union,
            10 => AbsenceCategory::WorkAccidentLeave,
            11 => AbsenceCategory::CommonIllnessLeave,
            13 => AbsenceCategory::FamilyLaw,
            _ => AbsenceCategory::Other,
        }
    }

    /// Returns true for the vacation-family categories, which are reported
    /// and credited in days rather than hours.
    pub fn is_vacation_family(&self) -> bool {
        matches!(
            self,
            AbsenceCategory::Vacation | AbsenceCategory::VacationPriorYear
        )
    }
}

/// The classified role of a single punch, assigned once at ingestion.
///
/// All downstream components pattern-match on this instead of re-inspecting
/// raw field combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    /// A clock-in.
    OrdinaryEntry,
    /// A plain clock-out with no absence code.
    OrdinaryExit,
    /// A clock-out that opens a justified absence of the given category.
    JustifiedExit(AbsenceCategory),
    /// A clock-out for a short break (TAJ).
    ShortBreakExit,
}

impl PunchKind {
    /// Classifies a punch from its direction flag and absence code.
    pub fn classify(is_entry: bool, absence_code: Option<i32>) -> Self {
        if is_entry {
            return PunchKind::OrdinaryEntry;
        }
        match absence_code {
            None | Some(0) | Some(1) => PunchKind::OrdinaryExit,
            Some(SHORT_BREAK_CODE) => PunchKind::ShortBreakExit,
            Some(code) => PunchKind::JustifiedExit(AbsenceCategory::from_code(code)),
        }
    }

    /// Returns true for clock-ins.
    pub fn is_entry(&self) -> bool {
        matches!(self, PunchKind::OrdinaryEntry)
    }

    /// Returns true for any clock-out variant.
    pub fn is_exit(&self) -> bool {
        !self.is_entry()
    }

    /// Returns the absence category carried by a justified exit, if any.
    pub fn category(&self) -> Option<AbsenceCategory> {
        match self {
            PunchKind::JustifiedExit(category) => Some(*category),
            _ => None,
        }
    }
}

/// A punch record exactly as the upstream transport supplies it.
///
/// Dates and times arrive as strings and are normalized defensively; a record
/// that cannot be normalized is excluded from pairing and surfaced as a
/// data-quality warning instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPunch {
    /// Identifier of the employee the record belongs to.
    pub employee_id: i64,
    /// ISO calendar date, e.g. "2025-03-17".
    pub date: String,
    /// Time of day, "HH:MM:SS" (seconds and leading zeros optional).
    pub time: String,
    /// 1 for a clock-in, 0 for a clock-out.
    pub is_entry: u8,
    /// Absence code; null, 0 and 1 all denote an ordinary punch.
    #[serde(default)]
    pub absence_code: Option<i32>,
    /// Optional explicit range start, "HH:MM".
    #[serde(default)]
    pub explicit_start: Option<String>,
    /// Optional explicit range end, "HH:MM".
    #[serde(default)]
    pub explicit_end: Option<String>,
    /// 1 marks the day as a company holiday.
    #[serde(default)]
    pub day_type_flag: Option<u8>,
    /// Free-text or coded shift hint, if the source system carries one.
    #[serde(default)]
    pub shift_hint: Option<String>,
}

/// A normalized, immutable punch record.
///
/// Within one employee's stream, records are totally ordered by
/// `(date, minute)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchRecord {
    /// Identifier of the employee the record belongs to.
    pub employee_id: i64,
    /// Calendar day of the punch.
    pub date: NaiveDate,
    /// Minute of day (0..=1439), seconds dropped.
    pub minute: u16,
    /// Classified role of the punch.
    pub kind: PunchKind,
    /// Explicit range carried by the punch, as minutes of day.
    pub explicit_range: Option<(u16, u16)>,
    /// True when the record flags its day as a company holiday.
    pub holiday_flagged: bool,
    /// Shift hint carried by the record, if any.
    pub shift_hint: Option<String>,
}

impl PunchRecord {
    /// Normalizes a raw punch into an engine record.
    ///
    /// Returns a description of the problem when the record cannot be
    /// normalized to a valid date and time; callers report it as a
    /// data-quality issue rather than an error.
    pub fn normalize(raw: &RawPunch) -> Result<Self, String> {
        let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("unparseable date '{}'", raw.date))?;
        let minute = parse_minute_of_day(&raw.time)
            .ok_or_else(|| format!("unparseable time '{}' on {}", raw.time, raw.date))?;

        // A half-present explicit range is treated as absent.
        let explicit_range = match (&raw.explicit_start, &raw.explicit_end) {
            (Some(start), Some(end)) => match (parse_minute_of_day(start), parse_minute_of_day(end))
            {
                (Some(start), Some(end)) => Some((start, end)),
                _ => {
                    return Err(format!(
                        "unparseable explicit range '{}'-'{}' on {}",
                        start, end, raw.date
                    ));
                }
            },
            _ => None,
        };

        Ok(PunchRecord {
            employee_id: raw.employee_id,
            date,
            minute,
            kind: PunchKind::classify(raw.is_entry == 1, raw.absence_code),
            explicit_range,
            holiday_flagged: raw.day_type_flag == Some(1),
            shift_hint: raw
                .shift_hint
                .as_ref()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty()),
        })
    }
}

/// Parses "HH:MM" or "HH:MM:SS" into a minute of day, tolerating missing
/// leading zeros. Seconds are validated and dropped.
pub fn parse_minute_of_day(time: &str) -> Option<u16> {
    let mut parts = time.trim().split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = parts.next()?.trim().parse().ok()?;
    if let Some(seconds) = parts.next() {
        let seconds: u32 = seconds.trim().parse().ok()?;
        if seconds > 59 {
            return None;
        }
    }
    if parts.next().is_some() || hour > 23 || minute > 59 {
        return None;
    }
    Some((hour * 60 + minute) as u16)
}
