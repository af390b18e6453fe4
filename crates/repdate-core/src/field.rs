//! Raw field input as submitted from a form, and its conversion into a rule.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::dates::parse_date;
use crate::error::CoreError;
use crate::recurrence::{RecurrenceRule, RepeatMode};

/// Unvalidated repeating date input. Every part is optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldInput {
    pub start: Option<String>,
    pub end: Option<String>,
    pub units: Option<String>,
    pub mode: Option<String>,
}

impl FieldInput {
    /// Checks the input before it is saved.
    ///
    /// # Arguments
    /// * `label` - Field label used in the error message
    /// * `now` - Reference time for relative dates
    ///
    /// # Behavior
    /// - Start and end must be present and parseable
    /// - Units must not be negative; zero or garbage later becomes 1
    pub fn validate(&self, label: &str, now: DateTime<Utc>) -> Result<(), CoreError> {
        if !is_valid_date(self.start.as_deref(), now) {
            return Err(CoreError::InvalidInput(format!(
                "The start date specified in '{}' is invalid.",
                label
            )));
        }

        if !is_valid_date(self.end.as_deref(), now) {
            return Err(CoreError::InvalidInput(format!(
                "The end date specified in '{}' is invalid.",
                label
            )));
        }

        if self.units.as_deref().map(parse_units).unwrap_or(1) < 0 {
            return Err(CoreError::InvalidInput(format!(
                "The number of repeats specified in '{}' must be greater or equal to 1.",
                label
            )));
        }

        Ok(())
    }

    /// Builds the rule to expand. Units default to 1 and mode to weekly.
    pub fn into_rule(self, now: DateTime<Utc>) -> Result<RecurrenceRule, CoreError> {
        let start = parse_date(self.start.as_deref().unwrap_or_default(), now)?;
        let end = parse_date(self.end.as_deref().unwrap_or_default(), now)?;
        let units = self.units.as_deref().map(parse_units).unwrap_or(1);
        let mode = self
            .mode
            .as_deref()
            .map(RepeatMode::from_keyword)
            .unwrap_or_default();

        Ok(RecurrenceRule::new(start, end, mode, units))
    }
}

fn is_valid_date(value: Option<&str>, now: DateTime<Utc>) -> bool {
    value.is_some_and(|v| parse_date(v, now).is_ok())
}

/// Reads the leading integer of `raw`, as a lenient numeric cast would.
/// Text without a leading number reads as 0.
fn parse_units(raw: &str) -> i64 {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|value| sign * value)
        .unwrap_or(0)
}
