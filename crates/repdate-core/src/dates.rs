//! Parsing of user-supplied dates and resolution of "today".

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_english::{parse_date_string, Dialect};

use crate::error::CoreError;
use crate::models::datetime_from_timestamp;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a date the way a form field would receive it.
///
/// Accepted inputs, tried in order:
/// - eight digits as a compact calendar date (`20240101`), read as UTC midnight
/// - any other run of digits as a Unix timestamp in seconds (`1704067200`)
/// - RFC 3339 (`2024-01-01T09:00:00+02:00`)
/// - `YYYY-MM-DD HH:MM[:SS]` or `YYYY-MM-DDTHH:MM:SS`, read as UTC
/// - `YYYY-MM-DD`, read as UTC midnight
/// - English phrases relative to `now` ("tomorrow", "next friday 9am")
pub fn parse_date(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, CoreError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CoreError::InvalidDate("empty date".to_string()));
    }

    if input.bytes().all(|b| b.is_ascii_digit()) {
        if input.len() == 8 {
            if let Some(midnight) = NaiveDate::parse_from_str(input, "%Y%m%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
            {
                return Ok(midnight.and_utc());
            }
        }
        if let Ok(seconds) = input.parse::<i64>() {
            return datetime_from_timestamp(seconds);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(parsed.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    parse_date_string(input, now, Dialect::Us)
        .map_err(|e| CoreError::InvalidDate(format!("'{}': {}", input, e)))
}

/// Resolves the reference "today" used by upcoming-date queries.
///
/// An override (for example from configuration) wins when it parses;
/// otherwise `now` is used.
pub fn resolve_today(override_value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    override_value
        .and_then(|value| parse_date(value, now).ok())
        .unwrap_or(now)
}
