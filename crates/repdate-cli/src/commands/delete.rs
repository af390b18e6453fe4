use anyhow::Result;
use dialoguer::Confirm;
use repdate_core::error::CoreError;
use repdate_core::repository::Repository;

use crate::cli::DeleteCommand;

pub async fn delete_entry(repo: &impl Repository, command: DeleteCommand) -> Result<()> {
    let entry = repo
        .find_entry(command.entry_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(command.entry_id.to_string()))?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete entry {} and its occurrences?",
                entry.entry_id
            ))
            .default(false)
            .interact()?;

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_entry(entry.entry_id).await?;
    println!("Deleted entry {}.", entry.entry_id);
    Ok(())
}
