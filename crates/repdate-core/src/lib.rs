//! # Repdate Core Library
//!
//! Repeating date fields for content entries: a start, an end, an interval and
//! a repeat mode, expanded into the concrete occurrences that fall inside the
//! window and stored so they can be listed, filtered and sorted.
//!
//! ## Features
//!
//! - **Six Repeat Modes**: daily, weekly, monthly and yearly stepping, plus
//!   "same weekday in the same week of the month/year" patterns
//! - **Bounded Expansion**: at most [`recurrence::MAX_OCCURRENCES`] dates per rule
//! - **Occurrence Storage**: SQLite-backed occurrence sets grouped by link id
//! - **Date Filters**: `"<date> to <date>"` ranges and single-date filters
//! - **Calendar Grouping**: year, month and day buckets of entry ids
//!
//! ## Core Modules
//!
//! - [`recurrence`]: Repeat modes, rules and the expansion algorithm
//! - [`field`]: Validation and normalization of raw field input
//! - [`dates`]: Free-form date parsing and "today" resolution
//! - [`query`]: Date filters applied to stored occurrences
//! - [`grouping`]: Calendar grouping of entries by occurrence
//! - [`repository`]: Entry and occurrence storage
//! - [`db`]: Database connection and migration management
//! - [`timezone`]: Timezone validation and display formatting
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use repdate_core::{
//!     db, field::FieldInput,
//!     repository::{EntryRepository, SqliteRepository},
//! };
//! use chrono::Utc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("repdate.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let input = FieldInput {
//!         start: Some("2024-01-01".to_string()),
//!         end: Some("2024-06-30".to_string()),
//!         units: Some("1".to_string()),
//!         mode: Some("months-by-weekday".to_string()),
//!     };
//!     let now = Utc::now();
//!     input.validate("Event dates", now)?;
//!
//!     let saved = repo.save_entry(7, &input.into_rule(now)?).await?;
//!     println!("Stored {} occurrences", saved.occurrence_count);
//!
//!     Ok(())
//! }
//! ```

pub mod dates;
pub mod db;
pub mod error;
pub mod field;
pub mod grouping;
pub mod models;
pub mod query;
pub mod recurrence;
pub mod repository;
pub mod timezone;
