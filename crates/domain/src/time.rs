//! Time and timestamp helpers.

use chrono::{DateTime, Duration, Utc};

/// UTC timestamp used for slot boundaries, departures, forecast points, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whole minutes from `now` until `at`, rounded towards negative infinity.
///
/// A departure 30 seconds in the past yields `-1`, one 59 seconds ahead
/// yields `0`.
#[must_use]
pub fn minutes_until(at: Timestamp, now: Timestamp) -> i64 {
    (at - now).num_milliseconds().div_euclid(60_000)
}

/// Absolute distance between two timestamps.
#[must_use]
pub fn abs_diff(a: Timestamp, b: Timestamp) -> Duration {
    (a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_floor_minutes_until_for_future_times() {
        let base = Utc::now();
        assert_eq!(minutes_until(base + Duration::seconds(59), base), 0);
        assert_eq!(minutes_until(base + Duration::seconds(60), base), 1);
        assert_eq!(minutes_until(base + Duration::minutes(12), base), 12);
    }

    #[test]
    fn should_floor_minutes_until_for_past_times() {
        let base = Utc::now();
        assert_eq!(minutes_until(base - Duration::seconds(1), base), -1);
        assert_eq!(minutes_until(base - Duration::minutes(5), base), -5);
    }

    #[test]
    fn should_compute_symmetric_abs_diff() {
        let base = Utc::now();
        let later = base + Duration::minutes(3);
        assert_eq!(abs_diff(base, later), Duration::minutes(3));
        assert_eq!(abs_diff(later, base), Duration::minutes(3));
    }
}
