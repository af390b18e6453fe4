use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use repdate_core::field::FieldInput;
use repdate_core::recurrence::MAX_OCCURRENCES;
use repdate_core::repository::Repository;

use crate::cli::SaveCommand;

pub async fn save_entry(repo: &impl Repository, command: SaveCommand) -> Result<()> {
    let now = Utc::now();
    let input = FieldInput {
        start: command.start,
        end: command.end,
        units: command.units,
        mode: command.mode,
    };
    input.validate(&command.label, now)?;

    let rule = input.into_rule(now)?;
    let saved = repo.save_entry(command.entry_id, &rule).await?;

    println!(
        "Saved entry {} with {} occurrences ({}, every {})",
        saved.entry.entry_id.to_string().cyan(),
        saved.occurrence_count,
        saved.entry.mode.label(),
        saved.entry.units
    );
    if saved.truncated {
        println!(
            "{}",
            format!("Only the first {} occurrences were stored.", MAX_OCCURRENCES).yellow()
        );
    }

    Ok(())
}
