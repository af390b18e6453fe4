use crate::error::CoreError;
use crate::models::{RepeatingDate, SavedEntry, SortOrder};
use crate::query::DateFilter;
use crate::recurrence::{expand_with_diagnostics, RecurrenceRule};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

const ENTRY_COLUMNS: &str = "id, entry_id, link_id, start_at, end_at, units, mode";

#[async_trait]
impl super::EntryRepository for SqliteRepository {
    /// Saves the field value of `entry_id` and regenerates its occurrences.
    ///
    /// An entry that already has a link id keeps it; otherwise a fresh one is
    /// allocated. Old occurrences are removed before the new expansion is
    /// written, all inside one transaction.
    async fn save_entry(&self, entry_id: i64, rule: &RecurrenceRule) -> Result<SavedEntry, CoreError> {
        let mut tx = self.pool().begin().await?;

        let link_id = match Self::link_id_in_transaction(&mut tx, entry_id).await? {
            Some(link_id) => link_id,
            None => Uuid::now_v7(),
        };

        let expansion = expand_with_diagnostics(rule);
        let values: Vec<i64> = expansion.occurrences.iter().map(|at| at.timestamp()).collect();
        let occurrence_count =
            Self::replace_occurrences_in_transaction(&mut tx, link_id, &values).await?;

        sqlx::query(
            r#"INSERT INTO repeating_dates (entry_id, link_id, start_at, end_at, units, mode)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(entry_id) DO UPDATE SET
                link_id = excluded.link_id,
                start_at = excluded.start_at,
                end_at = excluded.end_at,
                units = excluded.units,
                mode = excluded.mode"#,
        )
        .bind(entry_id)
        .bind(link_id)
        .bind(rule.start().timestamp())
        .bind(rule.end().timestamp())
        .bind(i64::from(rule.interval()))
        .bind(rule.mode())
        .execute(&mut *tx)
        .await?;

        let entry = sqlx::query_as::<_, RepeatingDate>(&format!(
            "SELECT {} FROM repeating_dates WHERE entry_id = $1",
            ENTRY_COLUMNS
        ))
        .bind(entry_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            entry_id,
            %link_id,
            mode = rule.mode().as_str(),
            occurrences = occurrence_count,
            truncated = expansion.truncated,
            "saved repeating date"
        );

        Ok(SavedEntry {
            entry,
            occurrence_count,
            truncated: expansion.truncated,
        })
    }

    async fn find_entry(&self, entry_id: i64) -> Result<Option<RepeatingDate>, CoreError> {
        let entry = sqlx::query_as::<_, RepeatingDate>(&format!(
            "SELECT {} FROM repeating_dates WHERE entry_id = $1",
            ENTRY_COLUMNS
        ))
        .bind(entry_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(entry)
    }

    async fn find_entries(&self) -> Result<Vec<RepeatingDate>, CoreError> {
        let entries = sqlx::query_as::<_, RepeatingDate>(&format!(
            "SELECT {} FROM repeating_dates ORDER BY entry_id ASC",
            ENTRY_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn link_id_for_entry(&self, entry_id: i64) -> Result<Option<Uuid>, CoreError> {
        let link_id = sqlx::query_scalar("SELECT link_id FROM repeating_dates WHERE entry_id = $1")
            .bind(entry_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(link_id)
    }

    async fn delete_entry(&self, entry_id: i64) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        let link_id = Self::link_id_in_transaction(&mut tx, entry_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(entry_id.to_string()))?;

        let removed = sqlx::query("DELETE FROM occurrences WHERE link_id = $1")
            .bind(link_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM repeating_dates WHERE entry_id = $1")
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(entry_id, %link_id, occurrences = removed, "deleted repeating date");
        Ok(())
    }

    /// Orders entries by their next occurrence on or after `today`.
    ///
    /// Entries with nothing left to occur sort last; ties fall back to `entry_id`.
    async fn find_entries_sorted(&self, order: SortOrder, today: DateTime<Utc>) -> Result<Vec<RepeatingDate>, CoreError> {
        let order_by = match order {
            SortOrder::Random => order.order_by("next_at"),
            _ => format!("next_at IS NULL, {}, r.entry_id ASC", order.order_by("next_at")),
        };

        let sql = format!(
            r#"SELECT r.id, r.entry_id, r.link_id, r.start_at, r.end_at, r.units, r.mode,
                (SELECT MIN(o.value) FROM occurrences o
                 WHERE o.link_id = r.link_id AND o.value >= $1) AS next_at
            FROM repeating_dates r
            ORDER BY {}"#,
            order_by
        );
        debug!(sql = %sql, "sorting entries");

        let entries = sqlx::query_as::<_, RepeatingDate>(&sql)
            .bind(today.timestamp())
            .fetch_all(self.pool())
            .await?;
        Ok(entries)
    }

    /// Entries with an occurrence inside a range filter, or whose window is
    /// still open after a single-date filter.
    async fn find_entries_matching(&self, filter: &DateFilter) -> Result<Vec<RepeatingDate>, CoreError> {
        let entries = match filter {
            DateFilter::Range { from, to } => {
                sqlx::query_as::<_, RepeatingDate>(
                    r#"SELECT r.id, r.entry_id, r.link_id, r.start_at, r.end_at, r.units, r.mode
                    FROM repeating_dates r
                    WHERE EXISTS (
                        SELECT 1 FROM occurrences o
                        WHERE o.link_id = r.link_id AND o.value BETWEEN $1 AND $2
                    )
                    ORDER BY r.entry_id ASC"#,
                )
                .bind(from.timestamp())
                .bind(to.timestamp())
                .fetch_all(self.pool())
                .await?
            }
            DateFilter::From(from) => {
                sqlx::query_as::<_, RepeatingDate>(&format!(
                    "SELECT {} FROM repeating_dates WHERE end_at > $1 ORDER BY entry_id ASC",
                    ENTRY_COLUMNS
                ))
                .bind(from.timestamp())
                .fetch_all(self.pool())
                .await?
            }
        };
        Ok(entries)
    }
}

impl SqliteRepository {
    async fn link_id_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        entry_id: i64,
    ) -> Result<Option<Uuid>, CoreError> {
        let link_id = sqlx::query_scalar("SELECT link_id FROM repeating_dates WHERE entry_id = $1")
            .bind(entry_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(link_id)
    }
}
