use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{Occurrence, RepeatingDate, SavedEntry, SortOrder};
use crate::query::DateFilter;
use crate::recurrence::RecurrenceRule;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod entries;
pub mod occurrences;

/// Smallest listing size `entry_dates` will honour.
pub const MIN_ENTRY_DATES_LIMIT: u32 = 2;

/// Default listing size for `entry_dates`.
pub const DEFAULT_ENTRY_DATES_LIMIT: u32 = 31;

/// Cap on the occurrences fetched at once when grouping entries by day.
pub const GROUP_OCCURRENCE_LIMIT: u32 = 99;

/// Storage of expanded occurrences, keyed by link id.
#[async_trait]
pub trait OccurrenceRepository {
    /// Replaces every stored occurrence of `link_id` with `occurrences`.
    async fn replace_occurrences(&self, link_id: Uuid, occurrences: &[DateTime<Utc>]) -> Result<usize, CoreError>;
    async fn find_occurrences_between(
        &self,
        link_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        order: SortOrder,
        limit: Option<u32>,
    ) -> Result<Vec<DateTime<Utc>>, CoreError>;
    async fn find_occurrences_between_for_links(
        &self,
        link_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: Option<u32>,
    ) -> Result<Vec<Occurrence>, CoreError>;
    /// Smallest stored occurrence `>= at`.
    async fn next_occurrence_on_or_after(&self, link_id: Uuid, at: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, CoreError>;
    async fn entry_dates(
        &self,
        link_id: Uuid,
        filter: Option<DateFilter>,
        today: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<DateTime<Utc>>, CoreError>;
}

/// Storage of repeating date entries.
#[async_trait]
pub trait EntryRepository {
    async fn save_entry(&self, entry_id: i64, rule: &RecurrenceRule) -> Result<SavedEntry, CoreError>;
    async fn find_entry(&self, entry_id: i64) -> Result<Option<RepeatingDate>, CoreError>;
    async fn find_entries(&self) -> Result<Vec<RepeatingDate>, CoreError>;
    async fn link_id_for_entry(&self, entry_id: i64) -> Result<Option<Uuid>, CoreError>;
    async fn delete_entry(&self, entry_id: i64) -> Result<(), CoreError>;
    async fn find_entries_sorted(&self, order: SortOrder, today: DateTime<Utc>) -> Result<Vec<RepeatingDate>, CoreError>;
    async fn find_entries_matching(&self, filter: &DateFilter) -> Result<Vec<RepeatingDate>, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository: EntryRepository + OccurrenceRepository {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
