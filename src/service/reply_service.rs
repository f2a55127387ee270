//! Static request→response lookups for the bot instruction interface.

use crate::config::ReplyDefaults;
use crate::error::ExplorerError;
use crate::persistence::models::ReplyRow;
use crate::persistence::{PostgresPersistence, ReplyTable};

/// Reads and writes the `commands` and `messages` tables.
#[derive(Debug, Clone)]
pub struct ReplyService {
    store: PostgresPersistence,
    defaults: ReplyDefaults,
}

impl ReplyService {
    /// Creates a new `ReplyService`.
    #[must_use]
    pub fn new(store: PostgresPersistence, defaults: ReplyDefaults) -> Self {
        Self { store, defaults }
    }

    fn fallback_key(&self, table: ReplyTable) -> &str {
        match table {
            ReplyTable::Commands => &self.defaults.command_key,
            ReplyTable::Messages => &self.defaults.message_key,
        }
    }

    /// All rows of a table.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::Empty`] when the table has no rows.
    pub async fn list(&self, table: ReplyTable) -> Result<Vec<ReplyRow>, ExplorerError> {
        let rows = self.store.list_replies(table).await?;
        if rows.is_empty() {
            return Err(ExplorerError::Empty(table.table()));
        }
        Ok(rows)
    }

    /// The reply for `key`, or the configured instruction reply when
    /// `key` is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] naming the fallback key when
    /// neither row exists.
    pub async fn lookup(&self, table: ReplyTable, key: &str) -> Result<ReplyRow, ExplorerError> {
        if let Some(row) = self.store.find_reply(table, key).await? {
            return Ok(row);
        }
        let fallback = self.fallback_key(table);
        tracing::debug!(table = table.table(), key, fallback, "reply miss, using fallback");
        self.store
            .find_reply(table, fallback)
            .await?
            .ok_or_else(|| ExplorerError::not_found(table.entity(), fallback))
    }

    /// Inserts a row.
    ///
    /// # Errors
    ///
    /// A duplicate key surfaces as [`ExplorerError::Conflict`].
    pub async fn create(
        &self,
        table: ReplyTable,
        key: &str,
        response: &str,
    ) -> Result<ReplyRow, ExplorerError> {
        let row = self.store.insert_reply(table, key, response).await?;
        tracing::info!(table = table.table(), key, "reply created");
        Ok(row)
    }

    /// Rewrites the row keyed by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if `key` does not exist.
    pub async fn update(
        &self,
        table: ReplyTable,
        key: &str,
        new_key: &str,
        new_response: &str,
    ) -> Result<ReplyRow, ExplorerError> {
        let row = self
            .store
            .update_reply(table, key, new_key, new_response)
            .await?
            .ok_or_else(|| ExplorerError::not_found(table.entity(), key))?;
        tracing::info!(table = table.table(), key, new_key, "reply updated");
        Ok(row)
    }
}
