//! PostgreSQL implementation of the persistence layer: reply tables and
//! places. User and event queries live in [`super::users`] and
//! [`super::events`].

use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use super::models::{PlaceRow, ReplyRow};
use crate::error::ExplorerError;

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pub(super) pool: PgPool,
}

/// The two static request→response lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTable {
    /// `commands`, keyed by `command`.
    Commands,
    /// `messages`, keyed by `message`.
    Messages,
}

impl ReplyTable {
    /// Table name.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Commands => "commands",
            Self::Messages => "messages",
        }
    }

    /// Name of the unique lookup column.
    #[must_use]
    pub const fn key_column(self) -> &'static str {
        match self {
            Self::Commands => "command",
            Self::Messages => "message",
        }
    }

    /// Singular noun used in error messages.
    #[must_use]
    pub const fn entity(self) -> &'static str {
        self.key_column()
    }
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Starts a unit of work. Dropping it without commit rolls back.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] if no connection
    /// can be acquired.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, ExplorerError> {
        Ok(self.pool.begin().await?)
    }

    // ── Reply tables ────────────────────────────────────────────────────

    /// Lists every row of a reply table in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn list_replies(&self, table: ReplyTable) -> Result<Vec<ReplyRow>, ExplorerError> {
        let sql = format!(
            "SELECT id, {} AS key, response FROM {} ORDER BY id",
            table.key_column(),
            table.table()
        );
        let rows = sqlx::query_as::<_, ReplyRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Looks up one reply by its key.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn find_reply(
        &self,
        table: ReplyTable,
        key: &str,
    ) -> Result<Option<ReplyRow>, ExplorerError> {
        let sql = format!(
            "SELECT id, {col} AS key, response FROM {} WHERE {col} = $1",
            table.table(),
            col = table.key_column()
        );
        let row = sqlx::query_as::<_, ReplyRow>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Inserts a reply.
    ///
    /// # Errors
    ///
    /// A duplicate key surfaces as [`ExplorerError::Conflict`].
    pub async fn insert_reply(
        &self,
        table: ReplyTable,
        key: &str,
        response: &str,
    ) -> Result<ReplyRow, ExplorerError> {
        let sql = format!(
            "INSERT INTO {} ({col}, response) VALUES ($1, $2) RETURNING id, {col} AS key, response",
            table.table(),
            col = table.key_column()
        );
        let row = sqlx::query_as::<_, ReplyRow>(&sql)
            .bind(key)
            .bind(response)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Replaces key and response of the row currently keyed by `key`.
    /// Returns `None` if no such row exists.
    ///
    /// # Errors
    ///
    /// Renaming onto an existing key surfaces as [`ExplorerError::Conflict`].
    pub async fn update_reply(
        &self,
        table: ReplyTable,
        key: &str,
        new_key: &str,
        new_response: &str,
    ) -> Result<Option<ReplyRow>, ExplorerError> {
        let sql = format!(
            "UPDATE {} SET {col} = $2, response = $3 WHERE {col} = $1 \
             RETURNING id, {col} AS key, response",
            table.table(),
            col = table.key_column()
        );
        let row = sqlx::query_as::<_, ReplyRow>(&sql)
            .bind(key)
            .bind(new_key)
            .bind(new_response)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    // ── Places ──────────────────────────────────────────────────────────

    /// Returns the place row for `place_id`, creating it on first
    /// reference. A non-empty `name` refreshes the cached name.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn ensure_place<'e, E: PgExecutor<'e>>(
        executor: E,
        place_id: &str,
        name: Option<&str>,
    ) -> Result<PlaceRow, ExplorerError> {
        let row = sqlx::query_as::<_, PlaceRow>(
            "INSERT INTO places (place_id, name) VALUES ($1, $2) \
             ON CONFLICT (place_id) DO UPDATE SET name = COALESCE(EXCLUDED.name, places.name) \
             RETURNING id, place_id, name",
        )
        .bind(place_id)
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_tables_name_their_columns() {
        assert_eq!(ReplyTable::Commands.table(), "commands");
        assert_eq!(ReplyTable::Commands.key_column(), "command");
        assert_eq!(ReplyTable::Messages.table(), "messages");
        assert_eq!(ReplyTable::Messages.key_column(), "message");
    }
}
