//! Weekly blocking schedule (`blockRules`) and its evaluator.
//!
//! A schedule is active at an instant when it is enabled, the instant's
//! weekday is one of `days` (0 = Sunday .. 6 = Saturday) and its wall-clock
//! `HH:MM` lies inside one of `time_ranges`.

mod time_range;

pub use time_range::{normalize_hhmm, TimeRange};

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Weekday index, 0 = Sunday .. 6 = Saturday.
pub type WeekdayIndex = u8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub days: BTreeSet<WeekdayIndex>,
    #[serde(default)]
    pub time_ranges: Vec<TimeRange>,
}

impl Default for Schedule {
    /// Disabled, Monday to Friday, 09:00-17:00.
    fn default() -> Self {
        Self {
            enabled: false,
            days: [1, 2, 3, 4, 5].into_iter().collect(),
            time_ranges: vec![TimeRange {
                start: "09:00".into(),
                end: "17:00".into(),
            }],
        }
    }
}

impl Schedule {
    pub fn new(
        enabled: bool,
        days: impl IntoIterator<Item = WeekdayIndex>,
        time_ranges: Vec<TimeRange>,
    ) -> Result<Self, ValidationError> {
        let schedule = Self {
            enabled,
            days: days.into_iter().collect(),
            time_ranges,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Whether blocking by schedule applies at `now`.
    pub fn is_active_now<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        if !self.enabled {
            return false;
        }

        let day = now.weekday().num_days_from_sunday() as WeekdayIndex;
        if !self.days.contains(&day) {
            return false;
        }

        let time = format!("{:02}:{:02}", now.hour(), now.minute());
        self.time_ranges.iter().any(|r| r.contains(&time))
    }

    /// Reject weekday indexes above 6 and non-canonical times.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(&bad) = self.days.iter().find(|&&d| d > 6) {
            return Err(ValidationError::InvalidWeekday(bad));
        }
        for range in &self.time_ranges {
            range.validate()?;
        }
        Ok(())
    }

    /// Ranges that can never match because they wrap past midnight.
    pub fn midnight_spanning_ranges(&self) -> impl Iterator<Item = &TimeRange> {
        self.time_ranges.iter().filter(|r| r.spans_midnight())
    }

    /// True when enabled with nothing to match against.
    pub fn is_vacuous(&self) -> bool {
        self.enabled && (self.days.is_empty() || self.time_ranges.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn workday_schedule() -> Schedule {
        Schedule::new(true, [1, 2, 3, 4, 5], vec![TimeRange::new("09:00", "17:00").unwrap()])
            .unwrap()
    }

    #[test]
    fn default_is_disabled_weekday_office_hours() {
        let s = Schedule::default();
        assert!(!s.enabled);
        assert_eq!(s.days.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(s.time_ranges, vec![TimeRange::new("09:00", "17:00").unwrap()]);
    }

    #[test]
    fn active_inside_window_on_listed_day() {
        // 2026-10-14 is a Wednesday.
        assert!(workday_schedule().is_active_now(&at(2026, 10, 14, 10, 30)));
    }

    #[test]
    fn inactive_on_unlisted_day() {
        // 2026-10-18 is a Sunday.
        assert!(!workday_schedule().is_active_now(&at(2026, 10, 18, 10, 30)));
    }

    #[test]
    fn boundaries_are_inclusive_to_the_minute() {
        let s = workday_schedule();
        assert!(s.is_active_now(&at(2026, 10, 14, 9, 0)));
        assert!(s.is_active_now(&Utc.with_ymd_and_hms(2026, 10, 14, 17, 0, 59).unwrap()));
        assert!(!s.is_active_now(&at(2026, 10, 14, 8, 59)));
        assert!(!s.is_active_now(&at(2026, 10, 14, 17, 1)));
    }

    #[test]
    fn disabled_schedule_is_never_active() {
        let mut s = workday_schedule();
        s.enabled = false;
        assert!(!s.is_active_now(&at(2026, 10, 14, 10, 30)));
    }

    #[test]
    fn any_of_several_ranges_matches() {
        let s = Schedule::new(
            true,
            [3],
            vec![
                TimeRange::new("06:00", "07:00").unwrap(),
                TimeRange::new("20:00", "23:59").unwrap(),
            ],
        )
        .unwrap();
        assert!(s.is_active_now(&at(2026, 10, 14, 21, 0)));
        assert!(!s.is_active_now(&at(2026, 10, 14, 12, 0)));
    }

    #[test]
    fn uses_the_wall_clock_of_the_given_offset() {
        let tokyo = chrono::FixedOffset::east_opt(9 * 3600).unwrap();
        // 2026-10-14 01:30 UTC is 10:30 Wednesday in UTC+9.
        let now = at(2026, 10, 14, 1, 30).with_timezone(&tokyo);
        assert!(workday_schedule().is_active_now(&now));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(Schedule::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "enabled": false,
                "days": [1, 2, 3, 4, 5],
                "timeRanges": [{"start": "09:00", "end": "17:00"}]
            })
        );
    }

    #[test]
    fn rejects_weekday_out_of_range() {
        let err = Schedule::new(true, [7], vec![]).unwrap_err();
        assert_eq!(err, ValidationError::InvalidWeekday(7));
    }

    #[test]
    fn vacuous_when_enabled_without_days() {
        let s = Schedule::new(true, [], vec![TimeRange::new("00:00", "23:59").unwrap()]).unwrap();
        assert!(s.is_vacuous());
        assert!(!s.is_active_now(&at(2026, 10, 14, 12, 0)));
    }
}
