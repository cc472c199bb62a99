//! Timestamp and duration conversion.

use chrono::{DateTime, SecondsFormat, Utc};
use prost_types::{Duration, Timestamp};
use serde_json::Value;

/// Wire timestamp for a UTC instant.
pub fn to_timestamp(time: &DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: time.timestamp(),
        nanos: time.timestamp_subsec_nanos() as i32,
    }
}

/// UTC instant for a wire timestamp, `None` when out of range.
pub fn from_timestamp(timestamp: &Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.seconds, timestamp.nanos.max(0) as u32)
}

/// RFC 3339 string for a wire timestamp, `null` when out of range.
pub fn timestamp_json(timestamp: &Timestamp) -> Value {
    from_timestamp(timestamp)
        .map(|time| Value::String(time.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
        .unwrap_or(Value::Null)
}

/// Wire duration for fractional seconds.
pub fn to_duration(seconds: f64) -> Duration {
    let whole = seconds.trunc();
    Duration {
        seconds: whole as i64,
        nanos: ((seconds - whole) * 1e9).round() as i32,
    }
}

/// Fractional seconds for a wire duration.
pub fn duration_secs(duration: &Duration) -> f64 {
    duration.seconds as f64 + f64::from(duration.nanos) / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_conversion() {
        let time = Utc.with_ymd_and_hms(2021, 6, 1, 12, 30, 0).unwrap();
        let timestamp = to_timestamp(&time);
        assert_eq!(timestamp.seconds, 1_622_550_600);
        assert_eq!(from_timestamp(&timestamp), Some(time));
        assert_eq!(timestamp_json(&timestamp), Value::from("2021-06-01T12:30:00Z"));
    }

    #[test]
    fn test_duration_conversion() {
        let duration = to_duration(1.5);
        assert_eq!(duration.seconds, 1);
        assert_eq!(duration.nanos, 500_000_000);
        assert!((duration_secs(&duration) - 1.5).abs() < f64::EPSILON);
        assert_eq!(to_duration(3600.0).seconds, 3600);
    }
}
