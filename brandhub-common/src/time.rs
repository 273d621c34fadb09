//! Timestamp utilities
//!
//! All timestamps are persisted as RFC 3339 UTC strings with millisecond
//! precision so that lexical order in SQLite matches chronological order.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::{Error, Result};

/// Years representable by [`to_db_timestamp`] and [`parse_db_timestamp`]
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Naive date-time layouts accepted from forms (interpreted in local time)
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the Unix epoch, used to namespace storage paths
pub fn millis_timestamp(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Canonical database representation of a timestamp
pub fn to_db_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp previously written by [`to_db_timestamp`]
pub fn parse_db_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Persistence(format!("Invalid stored timestamp '{}': {}", value, e)))
}

/// Build a fixed UTC offset from a minute count (e.g. `120` for UTC+02:00)
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(minutes.saturating_mul(60))
        .ok_or_else(|| Error::validation(format!("Invalid UTC offset: {} minutes", minutes)))
}

/// Normalize a user-supplied date to a canonical UTC timestamp
///
/// Accepts RFC 3339 (its own offset wins), a naive date-time such as the
/// `datetime-local` form value `2024-06-01T09:30`, or a bare `2024-06-01`.
/// Naive inputs are interpreted in `local`; bare dates map to local midnight.
pub fn normalize_date_input(input: &str, local: FixedOffset) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::validation("A date is required"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return storable(dt.with_timezone(&Utc), input);
    }

    let naive = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(input, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| Error::validation(format!("Unrecognized date: '{}'", input)))?;

    let at = local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::validation(format!("Ambiguous local date: '{}'", input)))?;
    storable(at, input)
}

fn storable(at: DateTime<Utc>, input: &str) -> Result<DateTime<Utc>> {
    if STORABLE_YEARS.contains(&at.year()) {
        Ok(at)
    } else {
        Err(Error::validation(format!(
            "Date out of range (years {}-{}): '{}'",
            STORABLE_YEARS.start(),
            STORABLE_YEARS.end(),
            input
        )))
    }
}
