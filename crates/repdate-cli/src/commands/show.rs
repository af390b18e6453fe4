use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use repdate_core::error::CoreError;
use repdate_core::repository::Repository;
use repdate_core::timezone::format_occurrence;

use crate::cli::ShowCommand;
use crate::config::Config;

pub async fn show_entry(repo: &impl Repository, command: ShowCommand, config: &Config) -> Result<()> {
    let entry = repo
        .find_entry(command.entry_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(command.entry_id.to_string()))?;
    let tz = &config.display_timezone;
    let today = config.today(Utc::now());
    let next = repo.next_occurrence_on_or_after(entry.link_id, today).await?;

    println!("{}", "Entry Information".blue().bold());
    println!("Entry: {}", entry.entry_id.yellow());
    println!("Link: {}", entry.link_id.yellow());
    println!("Repeats: {} (every {})", entry.mode.label().green(), entry.units);
    println!("Start: {}", format_occurrence(entry.start()?, tz)?);
    println!("End: {}", format_occurrence(entry.end()?, tz)?);
    match next {
        Some(at) => println!("Next: {}", format_occurrence(at, tz)?.cyan()),
        None => println!("Next: {}", "none".dimmed()),
    }

    Ok(())
}
