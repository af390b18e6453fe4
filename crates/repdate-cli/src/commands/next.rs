use anyhow::Result;
use chrono::Utc;
use repdate_core::dates::parse_date;
use repdate_core::error::CoreError;
use repdate_core::repository::Repository;
use repdate_core::timezone::format_occurrence;

use crate::cli::NextCommand;
use crate::config::Config;

pub async fn next_date(repo: &impl Repository, command: NextCommand, config: &Config) -> Result<()> {
    let now = Utc::now();
    let after = match command.after.as_deref() {
        Some(after) => parse_date(after, now)?,
        None => config.today(now),
    };

    let link_id = repo
        .link_id_for_entry(command.entry_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(command.entry_id.to_string()))?;

    match repo.next_occurrence_on_or_after(link_id, after).await? {
        Some(at) => println!("{}", format_occurrence(at, &config.display_timezone)?),
        None => println!("No upcoming occurrences."),
    }

    Ok(())
}
