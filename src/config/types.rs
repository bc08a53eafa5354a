//! Configuration types for the reconciliation engine.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from YAML configuration files. Everything carries complete
//! in-code defaults so the engine also runs without any files on disk.

use rust_decimal::Decimal;
use serde::Deserialize;

/// A named shift window in minutes of day.
///
/// Virtual windows (Vacation, Free, Holiday) are zero-length placeholders:
/// they can be selected by an explicit shift hint but are never chosen by the
/// arrival-time heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShiftWindow {
    /// Window name, matched case-insensitively against shift hints.
    pub name: String,
    /// Minute of day the shift starts.
    pub start_minute: u16,
    /// Minute of day the shift ends; less than the start for windows that
    /// cross midnight.
    pub end_minute: u16,
    /// Marks a zero-length placeholder window.
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
}

impl ShiftWindow {
    /// Returns true when the window continues past midnight.
    pub fn crosses_midnight(&self) -> bool {
        !self.is_virtual && self.end_minute < self.start_minute
    }

    /// Scheduled length of the window in minutes.
    pub fn duration_minutes(&self) -> i64 {
        if self.is_virtual {
            return 0;
        }
        let start = i64::from(self.start_minute);
        let end = i64::from(self.end_minute);
        if end >= start { end - start } else { 1440 - start + end }
    }
}

fn default_early_start_penalty() -> u32 {
    3
}

fn default_shift_name() -> String {
    "morning".to_string()
}

/// The configured table of named shift windows.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftTable {
    /// All known windows, physical and virtual.
    pub windows: Vec<ShiftWindow>,
    /// Distance multiplier applied to windows whose start lies ahead of the
    /// first entry. A tuned heuristic, kept configurable for domain review.
    #[serde(default = "default_early_start_penalty")]
    pub early_start_penalty: u32,
    /// Name of the window assumed when a day has no punches.
    #[serde(default = "default_shift_name")]
    pub default_shift: String,
}

impl ShiftTable {
    /// Looks up a window by name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&ShiftWindow> {
        let name = name.trim();
        self.windows
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(name))
    }

    /// The window assumed for days without punches.
    ///
    /// Falls back to the first physical window if the configured default
    /// name does not resolve.
    pub fn default_window(&self) -> &ShiftWindow {
        self.find(&self.default_shift)
            .or_else(|| self.windows.iter().find(|w| !w.is_virtual))
            .expect("shift table must contain at least one physical window")
    }

    /// Iterates the physical (non-virtual) windows.
    pub fn physical_windows(&self) -> impl Iterator<Item = &ShiftWindow> {
        self.windows.iter().filter(|w| !w.is_virtual)
    }
}

impl Default for ShiftTable {
    fn default() -> Self {
        let window = |name: &str, start: u16, end: u16| ShiftWindow {
            name: name.to_string(),
            start_minute: start,
            end_minute: end,
            is_virtual: false,
        };
        let virtual_window = |name: &str| ShiftWindow {
            name: name.to_string(),
            start_minute: 0,
            end_minute: 0,
            is_virtual: true,
        };
        Self {
            windows: vec![
                window("morning", 420, 900),
                window("evening", 900, 1380),
                window("central", 480, 1020),
                window("night", 1380, 420),
                virtual_window("vacation"),
                virtual_window("free"),
                virtual_window("holiday"),
            ],
            early_start_penalty: default_early_start_penalty(),
            default_shift: default_shift_name(),
        }
    }
}

/// Caller-configurable annual entitlements.
///
/// Vacation-family entitlements are in days, the rest in hours.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntitlementConfig {
    /// Annual medical hours.
    #[serde(default = "EntitlementConfig::default_medical_hours")]
    pub medical_hours: Decimal,
    /// Annual vacation days.
    #[serde(default = "EntitlementConfig::default_vacation_days")]
    pub vacation_days: Decimal,
    /// Annual free-disposal hours.
    #[serde(default = "EntitlementConfig::default_free_disposal_hours")]
    pub free_disposal_hours: Decimal,
    /// Annual family-law hours.
    #[serde(default = "EntitlementConfig::default_family_law_hours")]
    pub family_law_hours: Decimal,
}

impl EntitlementConfig {
    fn default_medical_hours() -> Decimal {
        Decimal::from(35)
    }

    fn default_vacation_days() -> Decimal {
        Decimal::from(22)
    }

    fn default_free_disposal_hours() -> Decimal {
        Decimal::from(24)
    }

    fn default_family_law_hours() -> Decimal {
        Decimal::from(40)
    }
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            medical_hours: Self::default_medical_hours(),
            vacation_days: Self::default_vacation_days(),
            free_disposal_hours: Self::default_free_disposal_hours(),
            family_law_hours: Self::default_family_law_hours(),
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// The shift-window table.
    pub shifts: ShiftTable,
    /// Annual entitlements.
    pub entitlements: EntitlementConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_contains_spec_windows() {
        let table = ShiftTable::default();
        let morning = table.find("morning").unwrap();
        assert_eq!((morning.start_minute, morning.end_minute), (420, 900));
        let evening = table.find("evening").unwrap();
        assert_eq!((evening.start_minute, evening.end_minute), (900, 1380));
        let central = table.find("central").unwrap();
        assert_eq!((central.start_minute, central.end_minute), (480, 1020));
        let night = table.find("night").unwrap();
        assert_eq!((night.start_minute, night.end_minute), (1380, 420));
        assert!(table.find("vacation").unwrap().is_virtual);
        assert!(table.find("free").unwrap().is_virtual);
        assert!(table.find("holiday").unwrap().is_virtual);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let table = ShiftTable::default();
        assert!(table.find("Morning").is_some());
        assert!(table.find("NIGHT").is_some());
        assert!(table.find(" evening ").is_some());
        assert!(table.find("graveyard").is_none());
    }

    #[test]
    fn test_night_crosses_midnight() {
        let table = ShiftTable::default();
        assert!(table.find("night").unwrap().crosses_midnight());
        assert!(!table.find("morning").unwrap().crosses_midnight());
        assert!(!table.find("vacation").unwrap().crosses_midnight());
    }

    #[test]
    fn test_window_durations() {
        let table = ShiftTable::default();
        assert_eq!(table.find("morning").unwrap().duration_minutes(), 480);
        assert_eq!(table.find("night").unwrap().duration_minutes(), 480);
        assert_eq!(table.find("central").unwrap().duration_minutes(), 540);
        assert_eq!(table.find("vacation").unwrap().duration_minutes(), 0);
    }

    #[test]
    fn test_default_window_is_morning() {
        let table = ShiftTable::default();
        assert_eq!(table.default_window().name, "morning");
    }

    #[test]
    fn test_physical_windows_exclude_virtual() {
        let table = ShiftTable::default();
        assert_eq!(table.physical_windows().count(), 4);
    }

    #[test]
    fn test_entitlement_defaults() {
        let entitlements = EntitlementConfig::default();
        assert_eq!(entitlements.medical_hours, Decimal::from(35));
        assert_eq!(entitlements.vacation_days, Decimal::from(22));
        assert_eq!(entitlements.free_disposal_hours, Decimal::from(24));
        assert_eq!(entitlements.family_law_hours, Decimal::from(40));
    }

    #[test]
    fn test_shift_table_deserialization_with_defaults() {
        let yaml = r#"
windows:
  - name: morning
    start_minute: 420
    end_minute: 900
  - name: vacation
    start_minute: 0
    end_minute: 0
    virtual: true
"#;
        let table: ShiftTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.early_start_penalty, 3);
        assert_eq!(table.default_shift, "morning");
        assert!(table.find("vacation").unwrap().is_virtual);
    }

    #[test]
    fn test_entitlement_deserialization_partial() {
        let yaml = "vacation_days: 25\n";
        let entitlements: EntitlementConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(entitlements.vacation_days, Decimal::from(25));
        assert_eq!(entitlements.medical_hours, Decimal::from(35));
    }
}
