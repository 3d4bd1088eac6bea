//! Uptime breakdown for `/Uptime`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Calendar-free breakdown of the time since the last boot.
///
/// Each unit wraps at its natural range and `days` wraps at 365; larger
/// units are not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UptimeReport {
    /// Days, modulo 365.
    pub days: u64,
    /// Hours, modulo 24.
    pub hours: u64,
    /// Minutes, modulo 60.
    pub minutes: u64,
    /// Seconds, modulo 60.
    pub seconds: u64,
}

impl UptimeReport {
    /// Break down a number of elapsed milliseconds.
    #[must_use]
    pub const fn from_millis(elapsed_ms: u64) -> Self {
        let seconds = elapsed_ms / 1000;
        let minutes = seconds / 60;
        let hours = minutes / 60;
        let days = hours / 24;

        Self {
            days: days % 365,
            hours: hours % 24,
            minutes: minutes % 60,
            seconds: seconds % 60,
        }
    }

    /// Uptime between `start` and `now`. A `start` in the future yields zero.
    #[must_use]
    pub fn between(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed_ms = (now - start).num_milliseconds().max(0);
        Self::from_millis(elapsed_ms.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    #[test]
    fn test_zero() {
        assert_eq!(UptimeReport::from_millis(0), UptimeReport::default());
    }

    #[test]
    fn test_mixed_units() {
        // 1d 2h 3m 4s 999ms
        let ms = ((((24 + 2) * 60 + 3) * 60 + 4) * 1000) + 999;
        let report = UptimeReport::from_millis(ms);
        assert_eq!(
            report,
            UptimeReport {
                days: 1,
                hours: 2,
                minutes: 3,
                seconds: 4,
            }
        );
    }

    #[test]
    fn test_days_wrap_at_365() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let now = start + Duration::days(366) + Duration::hours(5);
        let report = UptimeReport::between(start, now);
        assert_eq!(report.days, 1);
        assert_eq!(report.hours, 5);
    }

    #[test]
    fn test_future_start_is_zero() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let start = now + Duration::minutes(10);
        assert_eq!(UptimeReport::between(start, now), UptimeReport::default());
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(UptimeReport::from_millis(61_000)).unwrap();
        assert_eq!(json["days"], 0);
        assert_eq!(json["hours"], 0);
        assert_eq!(json["minutes"], 1);
        assert_eq!(json["seconds"], 1);
    }

    proptest! {
        #[test]
        fn prop_fields_within_range(elapsed_ms in 0u64..=u64::MAX / 2) {
            let report = UptimeReport::from_millis(elapsed_ms);
            prop_assert!(report.days < 365);
            prop_assert!(report.hours < 24);
            prop_assert!(report.minutes < 60);
            prop_assert!(report.seconds < 60);
        }

        #[test]
        fn prop_between_matches_elapsed(secs in 0i64..10_000_000_000) {
            let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
            let now = start + Duration::seconds(secs);
            let report = UptimeReport::between(start, now);
            let secs = secs as u64;
            prop_assert_eq!(report.seconds, secs % 60);
            prop_assert_eq!(report.minutes, (secs / 60) % 60);
            prop_assert_eq!(report.hours, (secs / 3600) % 24);
            prop_assert_eq!(report.days, (secs / 86_400) % 365);
        }
    }
}
