//! Conversion between the client's 100ns "ticks since 0001-01-01" timestamps and UTC.

use chrono::{DateTime, Utc};

const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 0001-01-01 and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Ticks at 9999-12-31 23:59:59.9999999, the last representable instant.
const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

/// Converts ticks to a UTC timestamp.
///
/// Negative or out-of-range tick counts are not valid dates and yield `None`
/// instead of an error.
pub fn ticks_to_datetime(ticks: i64) -> Option<DateTime<Utc>> {
    if !(0..=MAX_TICKS).contains(&ticks) {
        return None;
    }
    let since_unix = ticks - UNIX_EPOCH_TICKS;
    let secs = since_unix.div_euclid(TICKS_PER_SECOND);
    let nanos = (since_unix.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

/// Converts a UTC timestamp back to ticks, truncating below 100ns.
pub fn datetime_to_ticks(value: DateTime<Utc>) -> i64 {
    value.timestamp() * TICKS_PER_SECOND
        + i64::from(value.timestamp_subsec_nanos() / 100)
        + UNIX_EPOCH_TICKS
}
