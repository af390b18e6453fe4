use crate::error::CoreError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Display format for a single occurrence, e.g. "Mon 09:30 am 2024".
pub const OCCURRENCE_FORMAT: &str = "%a %I:%M %P %Y";

/// Parses an IANA timezone name.
pub fn parse_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone)
        .map_err(|_| CoreError::InvalidTimezone(format!("Invalid timezone: {}", timezone)))
}

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<(), CoreError> {
    parse_timezone(timezone).map(|_| ())
}

/// Format datetime with timezone-aware display
pub fn format_with_timezone(
    datetime: DateTime<Utc>,
    timezone: &str,
    format: &str,
) -> Result<String, CoreError> {
    let tz = parse_timezone(timezone)?;
    Ok(datetime.with_timezone(&tz).format(format).to_string())
}

/// Formats an occurrence for listings.
pub fn format_occurrence(datetime: DateTime<Utc>, timezone: &str) -> Result<String, CoreError> {
    format_with_timezone(datetime, timezone, OCCURRENCE_FORMAT)
}
