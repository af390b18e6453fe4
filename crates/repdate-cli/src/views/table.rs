use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use repdate_core::grouping::CalendarGroups;
use repdate_core::recurrence::RepeatMode;
use repdate_core::timezone::format_occurrence;

#[derive(Debug, Clone)]
pub struct ViewEntry {
    pub entry_id: i64,
    pub mode: RepeatMode,
    pub units: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub next: Option<DateTime<Utc>>,
}

fn occurrence_cell(at: DateTime<Utc>, timezone: &str) -> Cell {
    match format_occurrence(at, timezone) {
        Ok(text) => Cell::new(text),
        Err(_) => Cell::new(at.to_rfc3339()),
    }
}

fn relative_cell(at: DateTime<Utc>, now: DateTime<Utc>) -> Cell {
    let cell = Cell::new(HumanTime::from(at - now).to_string());
    if at < now {
        cell.fg(Color::DarkGrey)
    } else {
        cell.fg(Color::Green)
    }
}

/// Prints occurrences as a numbered table.
pub fn display_occurrences(occurrences: &[DateTime<Utc>], timezone: &str, now: DateTime<Utc>) {
    if occurrences.is_empty() {
        println!("No occurrences found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Occurrence", "UTC", "When"]);

    for (index, at) in occurrences.iter().enumerate() {
        let mut row = Row::new();
        row.add_cell(Cell::new(index + 1));
        row.add_cell(occurrence_cell(*at, timezone));
        row.add_cell(Cell::new(at.format("%Y-%m-%d %H:%M").to_string()));
        row.add_cell(relative_cell(*at, now));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_entries(entries: &[ViewEntry], timezone: &str, now: DateTime<Utc>) {
    if entries.is_empty() {
        println!("No entries found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Entry", "Repeats", "Every", "Start", "End", "Next"]);

    for entry in entries {
        let mut row = Row::new();
        row.add_cell(Cell::new(entry.entry_id).add_attribute(Attribute::Bold));
        row.add_cell(Cell::new(entry.mode.label()));
        row.add_cell(Cell::new(entry.units));
        row.add_cell(occurrence_cell(entry.start, timezone));
        row.add_cell(occurrence_cell(entry.end, timezone));
        match entry.next {
            Some(next) => row.add_cell(relative_cell(next, now)),
            None => row.add_cell(Cell::new("-").fg(Color::DarkGrey)),
        };
        table.add_row(row);
    }

    println!("{table}");
}

/// Prints one row per calendar day with the entries occurring on it.
pub fn display_groups(groups: &CalendarGroups) {
    if groups.is_empty() {
        println!("No entries found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Year", "Month", "Day", "Entries"]);

    for (year, month, day, entry_ids) in groups.iter_days() {
        let ids: Vec<String> = entry_ids.iter().map(|id| id.to_string()).collect();
        table.add_row(vec![
            Cell::new(year),
            Cell::new(format!("{:02}", month)),
            Cell::new(format!("{:02}", day)),
            Cell::new(ids.join(", ")),
        ]);
    }

    println!("{table}");
}
