use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time left until the delivery date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_past: bool,
}

impl Countdown {
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let remaining = (target - now).num_seconds();
        if remaining <= 0 {
            return Self {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0,
                is_past: true,
            };
        }
        Self {
            days: remaining / 86_400,
            hours: remaining % 86_400 / 3_600,
            minutes: remaining % 3_600 / 60,
            seconds: remaining % 60,
            is_past: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_countdown_breakdown() {
        let target = Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 2, 12, 21, 29, 50).unwrap();
        let c = Countdown::until(target, now);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (1, 2, 30, 10));
        assert!(!c.is_past);
    }

    #[test]
    fn test_countdown_past() {
        let target = Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap();
        let c = Countdown::until(target, target);
        assert!(c.is_past);
        assert_eq!(c.days, 0);
    }
}
