use anyhow::Result;
use chrono::Utc;
use repdate_core::error::CoreError;
use repdate_core::repository::Repository;

use crate::cli::DatesCommand;
use crate::config::Config;
use crate::query_parser::parse_filter;
use crate::views::table::display_occurrences;

pub async fn list_dates(repo: &impl Repository, command: DatesCommand, config: &Config) -> Result<()> {
    let now = Utc::now();
    let filter = command
        .filter
        .as_deref()
        .map(|f| parse_filter(f, now))
        .transpose()?;

    let link_id = repo
        .link_id_for_entry(command.entry_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(command.entry_id.to_string()))?;

    let limit = command.limit.unwrap_or(config.default_limit);
    let dates = repo.entry_dates(link_id, filter, config.today(now), limit).await?;

    display_occurrences(&dates, &config.display_timezone, now);
    Ok(())
}
