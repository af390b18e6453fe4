use std::collections::HashSet;

use anyhow::Result;
use chrono::Utc;
use repdate_core::repository::Repository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::query_parser::parse_filter;
use crate::views::table::{display_entries, ViewEntry};

pub async fn list_entries(repo: &impl Repository, command: ListCommand, config: &Config) -> Result<()> {
    let now = Utc::now();
    let today = config.today(now);

    let mut entries = repo.find_entries_sorted(command.sort.into(), today).await?;

    if let Some(filter) = command.filter.as_deref() {
        let filter = parse_filter(filter, now)?;
        let matching: HashSet<i64> = repo
            .find_entries_matching(&filter)
            .await?
            .into_iter()
            .map(|e| e.entry_id)
            .collect();
        entries.retain(|e| matching.contains(&e.entry_id));
    }

    let mut view_entries = Vec::with_capacity(entries.len());
    for entry in entries {
        let next = repo.next_occurrence_on_or_after(entry.link_id, today).await?;
        view_entries.push(ViewEntry {
            entry_id: entry.entry_id,
            mode: entry.mode,
            units: entry.units,
            start: entry.start()?,
            end: entry.end()?,
            next,
        });
    }

    display_entries(&view_entries, &config.display_timezone, now);
    Ok(())
}
