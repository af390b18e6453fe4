use crate::error::CoreError;
use crate::models::{datetime_from_timestamp, Occurrence, SortOrder};
use crate::query::DateFilter;
use crate::repository::{SqliteRepository, MIN_ENTRY_DATES_LIMIT};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, Transaction};
use tracing::debug;
use uuid::Uuid;

/// Rows per INSERT statement, keeping well under SQLite's bind limit.
const INSERT_CHUNK_SIZE: usize = 400;

#[async_trait]
impl super::OccurrenceRepository for SqliteRepository {
    async fn replace_occurrences(&self, link_id: Uuid, occurrences: &[DateTime<Utc>]) -> Result<usize, CoreError> {
        let values: Vec<i64> = occurrences.iter().map(|at| at.timestamp()).collect();

        let mut tx = self.pool().begin().await?;
        let inserted = Self::replace_occurrences_in_transaction(&mut tx, link_id, &values).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    async fn find_occurrences_between(
        &self,
        link_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        order: SortOrder,
        limit: Option<u32>,
    ) -> Result<Vec<DateTime<Utc>>, CoreError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT value FROM occurrences WHERE link_id = ");
        qb.push_bind(link_id);
        qb.push(" AND value BETWEEN ");
        qb.push_bind(from.timestamp());
        qb.push(" AND ");
        qb.push_bind(to.timestamp());
        qb.push(" ORDER BY ");
        qb.push(order.order_by("value"));
        push_limit(&mut qb, limit);

        let values: Vec<i64> = qb.build_query_scalar().fetch_all(self.pool()).await?;
        to_datetimes(values)
    }

    async fn find_occurrences_between_for_links(
        &self,
        link_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: Option<u32>,
    ) -> Result<Vec<Occurrence>, CoreError> {
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT link_id, value FROM occurrences WHERE link_id IN (");
        let mut separated = qb.separated(", ");
        for link_id in link_ids {
            separated.push_bind(*link_id);
        }
        separated.push_unseparated(") AND value BETWEEN ");
        qb.push_bind(from.timestamp());
        qb.push(" AND ");
        qb.push_bind(to.timestamp());
        qb.push(" ORDER BY value DESC");
        push_limit(&mut qb, limit);

        let occurrences = qb.build_query_as::<Occurrence>().fetch_all(self.pool()).await?;
        Ok(occurrences)
    }

    async fn next_occurrence_on_or_after(&self, link_id: Uuid, at: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, CoreError> {
        let value: Option<i64> = sqlx::query_scalar(
            r#"SELECT value FROM occurrences
            WHERE link_id = $1 AND value >= $2
            ORDER BY value ASC
            LIMIT 1"#,
        )
        .bind(link_id)
        .bind(at.timestamp())
        .fetch_optional(self.pool())
        .await?;

        value.map(datetime_from_timestamp).transpose()
    }

    /// Lists dates of one link the way entry listings show them.
    ///
    /// # Behavior
    /// - `limit` is raised to at least [`MIN_ENTRY_DATES_LIMIT`]
    /// - Without a range filter: the next `limit + 1` occurrences on or after
    ///   `today` (or the filter's date), ascending
    /// - With a range filter: up to `limit` occurrences in range, newest first
    async fn entry_dates(
        &self,
        link_id: Uuid,
        filter: Option<DateFilter>,
        today: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<DateTime<Utc>>, CoreError> {
        let limit = limit.max(MIN_ENTRY_DATES_LIMIT);

        match filter {
            Some(DateFilter::Range { from, to }) => {
                self.find_occurrences_between(link_id, from, to, SortOrder::Desc, Some(limit))
                    .await
            }
            other => {
                let from = match other {
                    Some(DateFilter::From(from)) => from,
                    _ => today,
                };
                let values: Vec<i64> = sqlx::query_scalar(
                    r#"SELECT value FROM occurrences
                    WHERE link_id = $1 AND value >= $2
                    ORDER BY value ASC
                    LIMIT $3"#,
                )
                .bind(link_id)
                .bind(from.timestamp())
                .bind(i64::from(limit) + 1)
                .fetch_all(self.pool())
                .await?;
                to_datetimes(values)
            }
        }
    }
}

impl SqliteRepository {
    /// Deletes the link's occurrences and inserts `values` within an existing transaction.
    pub(crate) async fn replace_occurrences_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        link_id: Uuid,
        values: &[i64],
    ) -> Result<usize, CoreError> {
        let removed = sqlx::query("DELETE FROM occurrences WHERE link_id = $1")
            .bind(link_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        for chunk in values.chunks(INSERT_CHUNK_SIZE) {
            let mut qb: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO occurrences (link_id, value) ");
            qb.push_values(chunk, |mut row, value| {
                row.push_bind(link_id).push_bind(*value);
            });
            qb.build().execute(&mut **tx).await?;
        }

        debug!(%link_id, removed, inserted = values.len(), "replaced occurrences");
        Ok(values.len())
    }
}

fn push_limit(qb: &mut QueryBuilder<'_, Sqlite>, limit: Option<u32>) {
    if let Some(limit) = limit {
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(limit));
    }
}

fn to_datetimes(values: Vec<i64>) -> Result<Vec<DateTime<Utc>>, CoreError> {
    values.into_iter().map(datetime_from_timestamp).collect()
}
