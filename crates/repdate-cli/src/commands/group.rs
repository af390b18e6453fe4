use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use repdate_core::grouping::group_by_calendar;
use repdate_core::models::RepeatingDate;
use repdate_core::query::DateFilter;
use repdate_core::repository::{Repository, GROUP_OCCURRENCE_LIMIT};

use crate::cli::GroupCommand;
use crate::config::Config;
use crate::query_parser::parse_filter;
use crate::views::table::display_groups;

/// Groups entries by the days their dates fall on. Without a filter the
/// upcoming dates of every entry are used.
pub async fn group_entries(repo: &impl Repository, command: GroupCommand, config: &Config) -> Result<()> {
    let now = Utc::now();
    let today = config.today(now);
    let filter = command
        .filter
        .as_deref()
        .map(|f| parse_filter(f, now))
        .transpose()?;

    let entries = match &filter {
        Some(filter) => repo.find_entries_matching(filter).await?,
        None => repo.find_entries().await?,
    };

    let dated = match filter {
        Some(DateFilter::Range { from, to }) => range_dates(repo, entries, from, to).await?,
        _ => {
            let mut dated = Vec::with_capacity(entries.len());
            for entry in entries {
                let dates = repo
                    .entry_dates(entry.link_id, filter, today, config.default_limit)
                    .await?;
                dated.push((entry.entry_id, dates));
            }
            dated
        }
    };

    let groups = group_by_calendar(dated);
    if command.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        display_groups(&groups);
    }

    Ok(())
}

/// Fetches the occurrences of every entry in `from..=to` with a single query
/// and hands them back per entry, in entry order.
async fn range_dates(
    repo: &impl Repository,
    entries: Vec<RepeatingDate>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<(i64, Vec<DateTime<Utc>>)>> {
    let link_ids: Vec<_> = entries.iter().map(|entry| entry.link_id).collect();
    let occurrences = repo
        .find_occurrences_between_for_links(&link_ids, from, to, Some(GROUP_OCCURRENCE_LIMIT))
        .await?;

    let entry_for_link: HashMap<_, i64> = entries
        .iter()
        .map(|entry| (entry.link_id, entry.entry_id))
        .collect();
    let mut by_entry: HashMap<i64, Vec<DateTime<Utc>>> = HashMap::new();
    for occurrence in occurrences {
        if let Some(entry_id) = entry_for_link.get(&occurrence.link_id) {
            by_entry.entry(*entry_id).or_default().push(occurrence.at()?);
        }
    }

    Ok(entries
        .into_iter()
        .map(|entry| {
            let dates = by_entry.remove(&entry.entry_id).unwrap_or_default();
            (entry.entry_id, dates)
        })
        .collect())
}
