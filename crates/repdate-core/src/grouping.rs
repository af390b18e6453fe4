//! Calendar grouping of entries by the days they occur on.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// Year → month → day buckets, each day listing the entries occurring on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarGroups {
    pub years: BTreeMap<i32, YearGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearGroup {
    pub months: BTreeMap<u32, MonthGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthGroup {
    pub days: BTreeMap<u32, Vec<i64>>,
}

impl CalendarGroups {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Entry ids listed under one day, if any.
    pub fn entries_on(&self, year: i32, month: u32, day: u32) -> Option<&[i64]> {
        self.years
            .get(&year)?
            .months
            .get(&month)?
            .days
            .get(&day)
            .map(Vec::as_slice)
    }

    /// Iterates `(year, month, day, entry_ids)` in calendar order.
    pub fn iter_days(&self) -> impl Iterator<Item = (i32, u32, u32, &[i64])> + '_ {
        self.years.iter().flat_map(|(year, y)| {
            y.months.iter().flat_map(move |(month, m)| {
                m.days
                    .iter()
                    .map(move |(day, ids)| (*year, *month, *day, ids.as_slice()))
            })
        })
    }
}

/// Groups `(entry_id, occurrences)` pairs by UTC calendar day.
///
/// Entries keep the order they are given in within a day. An entry that
/// occurs more than once on the same day is listed once per occurrence.
pub fn group_by_calendar<I>(entries: I) -> CalendarGroups
where
    I: IntoIterator<Item = (i64, Vec<DateTime<Utc>>)>,
{
    let mut groups = CalendarGroups::default();

    for (entry_id, occurrences) in entries {
        for at in occurrences {
            groups
                .years
                .entry(at.year())
                .or_default()
                .months
                .entry(at.month())
                .or_default()
                .days
                .entry(at.day())
                .or_default()
                .push(entry_id);
        }
    }

    groups
}
