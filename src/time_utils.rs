// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting and bucketing.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Day key (`YYYY-MM-DD`) for a UTC timestamp.
pub fn day_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Number of whole 7-day periods elapsed between `then` and `today`.
///
/// Returns `None` when `then` does not parse or lies in the future.
pub fn weeks_ago(then: &str, today: DateTime<Utc>) -> Option<u32> {
    let then = DateTime::parse_from_rfc3339(then).ok()?.with_timezone(&Utc);
    let elapsed = today.signed_duration_since(then);
    if elapsed.num_seconds() < 0 {
        return None;
    }
    Some((elapsed.num_days() / 7) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_key() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap();
        assert_eq!(day_key(ts), "2024-03-05");
    }

    #[test]
    fn test_weeks_ago_boundaries() {
        let today = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        assert_eq!(weeks_ago("2024-03-15T10:00:00Z", today), Some(0));
        assert_eq!(weeks_ago("2024-03-09T12:00:00Z", today), Some(0));
        assert_eq!(weeks_ago("2024-03-08T11:00:00Z", today), Some(1));
        assert_eq!(weeks_ago("2024-02-01T00:00:00Z", today), Some(6));
        // Future timestamps and garbage are skipped, not bucketed
        assert_eq!(weeks_ago("2024-03-16T00:00:00Z", today), None);
        assert_eq!(weeks_ago("not-a-date", today), None);
    }
}
