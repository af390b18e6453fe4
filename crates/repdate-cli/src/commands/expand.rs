use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use repdate_core::dates::parse_date;
use repdate_core::recurrence::{expand_with_diagnostics, RecurrenceRule, MAX_OCCURRENCES};

use crate::cli::ExpandCommand;
use crate::config::Config;
use crate::views::table::display_occurrences;

pub fn expand_dates(command: ExpandCommand, config: &Config) -> Result<()> {
    let now = Utc::now();
    let start = parse_date(&command.start, now)?;
    let end = parse_date(&command.end, now)?;

    let rule = RecurrenceRule::from_keyword(start, end, &command.mode, command.units);
    let expansion = expand_with_diagnostics(&rule);

    if command.json {
        println!("{}", serde_json::to_string_pretty(&expansion.occurrences)?);
    } else {
        display_occurrences(&expansion.occurrences, &config.display_timezone, config.today(now));
    }

    if expansion.truncated {
        eprintln!(
            "{}",
            format!("Only the first {} occurrences were generated.", MAX_OCCURRENCES).yellow()
        );
    }

    Ok(())
}
