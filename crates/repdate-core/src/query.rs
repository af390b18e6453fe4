use chrono::{DateTime, Utc};
use serde::Serialize;

/// Date condition used to select entries and occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateFilter {
    /// Inclusive range `from..=to`
    Range {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    /// A single reference date
    From(DateTime<Utc>),
}

impl DateFilter {
    /// Builds a range filter, swapping the bounds if given in reverse.
    pub fn range(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        if from <= to {
            DateFilter::Range { from, to }
        } else {
            DateFilter::Range { from: to, to: from }
        }
    }

    /// Whether an occurrence at `at` satisfies the filter.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match *self {
            DateFilter::Range { from, to } => from <= at && at <= to,
            DateFilter::From(from) => at >= from,
        }
    }

    /// The `(from, to)` pair for range filters.
    pub fn as_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match *self {
            DateFilter::Range { from, to } => Some((from, to)),
            DateFilter::From(_) => None,
        }
    }
}
