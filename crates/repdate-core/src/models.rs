use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;
use crate::recurrence::{RecurrenceRule, RepeatMode};

/// A stored repeating date field value for one host entry.
///
/// Timestamps are kept as Unix seconds, the same representation the
/// occurrence table uses, so range comparisons stay numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RepeatingDate {
    pub id: i64,
    pub entry_id: i64,
    /// Groups all stored occurrences of this entry
    pub link_id: Uuid,
    pub start_at: i64,
    pub end_at: i64,
    pub units: i64,
    pub mode: RepeatMode,
}

impl RepeatingDate {
    pub fn start(&self) -> Result<DateTime<Utc>, CoreError> {
        datetime_from_timestamp(self.start_at)
    }

    pub fn end(&self) -> Result<DateTime<Utc>, CoreError> {
        datetime_from_timestamp(self.end_at)
    }

    /// Rebuilds the recurrence rule this entry was saved with.
    pub fn rule(&self) -> Result<RecurrenceRule, CoreError> {
        Ok(RecurrenceRule::new(self.start()?, self.end()?, self.mode, self.units))
    }
}

/// Outcome of saving an entry.
#[derive(Debug, Clone)]
pub struct SavedEntry {
    pub entry: RepeatingDate,
    /// Number of occurrences stored for the entry's link
    pub occurrence_count: usize,
    /// Whether the expansion hit the occurrence cap
    pub truncated: bool,
}

/// One stored occurrence, tagged with the link it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Occurrence {
    pub link_id: Uuid,
    pub value: i64,
}

impl Occurrence {
    pub fn at(&self) -> Result<DateTime<Utc>, CoreError> {
        datetime_from_timestamp(self.value)
    }
}

/// Ordering applied to entries and occurrence listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
    Random,
}

impl SortOrder {
    /// `ORDER BY` body sorting on `expression`.
    pub(crate) fn order_by(&self, expression: &str) -> String {
        match self {
            SortOrder::Asc => format!("{} ASC", expression),
            SortOrder::Desc => format!("{} DESC", expression),
            SortOrder::Random => "RANDOM()".to_string(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    /// Unrecognized orders sort ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "desc" => SortOrder::Desc,
            "random" => SortOrder::Random,
            _ => SortOrder::Asc,
        })
    }
}

pub fn datetime_from_timestamp(seconds: i64) -> Result<DateTime<Utc>, CoreError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| CoreError::InvalidDate(format!("Timestamp {} is out of range", seconds)))
}
