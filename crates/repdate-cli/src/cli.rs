use clap::{Parser, Subcommand, ValueEnum};
use repdate_core::models::SortOrder;

/// Expand, store and query repeating dates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Reference "today" for upcoming-date queries (overrides configuration)
    #[arg(long, global = true)]
    pub today: Option<String>,
    /// Timezone used to display occurrences (IANA name)
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Expand a rule and print its occurrences without storing anything
    Expand(ExpandCommand),
    /// Save the repeating date of an entry and store its occurrences
    Save(SaveCommand),
    /// Show the stored rule of an entry
    Show(ShowCommand),
    /// List stored occurrences of an entry
    Dates(DatesCommand),
    /// Print the next occurrence of an entry
    Next(NextCommand),
    /// List entries ordered by their next occurrence
    List(ListCommand),
    /// Group entries by the calendar days they occur on
    Group(GroupCommand),
    /// Delete an entry and its occurrences
    Delete(DeleteCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct ExpandCommand {
    /// First occurrence
    pub start: String,
    /// Last moment an occurrence may fall on
    pub end: String,
    /// Number of periods between occurrences; values below 1 mean 1
    #[arg(short, long, default_value_t = 1, allow_hyphen_values = true)]
    pub units: i64,
    /// Repeat mode (days, weeks, months-by-date, months-by-weekday, years-by-date, years-by-weekday)
    #[arg(short, long, default_value = "weeks")]
    pub mode: String,
    /// Print occurrences as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SaveCommand {
    /// The id of the entry the dates belong to
    pub entry_id: i64,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
    #[arg(short, long, allow_hyphen_values = true)]
    pub units: Option<String>,
    #[arg(short, long)]
    pub mode: Option<String>,
    /// Field label used in validation messages
    #[arg(long, default_value = "Date")]
    pub label: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    pub entry_id: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct DatesCommand {
    pub entry_id: i64,
    /// Date filter: "<date> to <date>" or a single date
    #[arg(short, long)]
    pub filter: Option<String>,
    /// Maximum number of dates (at least 2)
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct NextCommand {
    pub entry_id: i64,
    /// Look for the first occurrence on or after this date instead of today
    #[arg(long)]
    pub after: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Sort order of the next occurrence
    #[arg(short, long, value_enum, default_value_t = SortArg::Asc)]
    pub sort: SortArg,
    /// Only entries matching this date filter
    #[arg(short, long)]
    pub filter: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct GroupCommand {
    /// Date filter: "<date> to <date>" or a single date
    #[arg(short, long)]
    pub filter: Option<String>,
    /// Print the groups as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    pub entry_id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Asc,
    Desc,
    Random,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Asc,
            SortArg::Desc => SortOrder::Desc,
            SortArg::Random => SortOrder::Random,
        }
    }
}
