//! Association tables with explicitly named directions.
//!
//! A [`Junction`] describes a pure many-to-many table: its name and the
//! two key columns. Rows are written and removed through the junction
//! so that every association goes through the same primary-key
//! constraint. Reads name a [`Direction`]: for the self-referential
//! `user_subscriptions` table, [`Direction::Forward`] yields the users a
//! user follows and [`Direction::Inverse`] yields its followers.

use std::marker::PhantomData;

use sqlx::{Decode, Encode, PgExecutor, Postgres, Type};

use crate::domain::TelegramId;
use crate::error::ExplorerError;

/// A value usable as one side of a junction row.
pub trait JunctionKey:
    for<'q> Encode<'q, Postgres> + for<'r> Decode<'r, Postgres> + Type<Postgres> + Clone + Send + Sync + Unpin + 'static
{
}

impl JunctionKey for TelegramId {}
impl JunctionKey for String {}
impl JunctionKey for i32 {}

/// Which way to walk an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the left column to the right one.
    Forward,
    /// From the right column back to the left one.
    Inverse,
}

/// A many-to-many association table keyed by `(left, right)`.
#[derive(Debug)]
pub struct Junction<L, R> {
    table: &'static str,
    left: &'static str,
    right: &'static str,
    _keys: PhantomData<fn() -> (L, R)>,
}

/// `user_subscriptions`: subscriber → followed user.
pub const USER_SUBSCRIPTIONS: Junction<TelegramId, TelegramId> =
    Junction::new("user_subscriptions", "subscriber_telegram_id", "target_telegram_id");

/// `place_user_association`: user → favorite place.
pub const FAVORITE_PLACES: Junction<TelegramId, String> =
    Junction::new("place_user_association", "user_telegram_id", "place_id");

/// `event_participants`: user → attended event.
pub const EVENT_PARTICIPANTS: Junction<TelegramId, i32> =
    Junction::new("event_participants", "user_telegram_id", "event_id");

impl<L: JunctionKey, R: JunctionKey> Junction<L, R> {
    /// Describes a junction table. Names must be trusted identifiers.
    #[must_use]
    pub const fn new(table: &'static str, left: &'static str, right: &'static str) -> Self {
        Self {
            table,
            left,
            right,
            _keys: PhantomData,
        }
    }

    /// Table name.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// `(key column, yielded column)` when walking in `direction`.
    #[must_use]
    pub const fn columns(&self, direction: Direction) -> (&'static str, &'static str) {
        match direction {
            Direction::Forward => (self.left, self.right),
            Direction::Inverse => (self.right, self.left),
        }
    }

    /// Inserts the `(left, right)` pair.
    ///
    /// # Errors
    ///
    /// A duplicate pair surfaces as [`ExplorerError::Conflict`], a
    /// missing referenced row as [`ExplorerError::NotFound`], a violated
    /// check (self-subscription) as [`ExplorerError::InvalidRequest`].
    pub async fn link<'e, E: PgExecutor<'e>>(
        &self,
        executor: E,
        left: &L,
        right: &R,
    ) -> Result<(), ExplorerError> {
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES ($1, $2)",
            self.table, self.left, self.right
        );
        sqlx::query(&sql)
            .bind(left.clone())
            .bind(right.clone())
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Deletes the `(left, right)` pair. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::PersistenceError`] on database failure.
    pub async fn unlink<'e, E: PgExecutor<'e>>(
        &self,
        executor: E,
        left: &L,
        right: &R,
    ) -> Result<bool, ExplorerError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1 AND {} = $2",
            self.table, self.left, self.right
        );
        let result = sqlx::query(&sql)
            .bind(left.clone())
            .bind(right.clone())
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Right-hand keys associated with `left`.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::PersistenceError`] on database failure.
    pub async fn rights_of<'e, E: PgExecutor<'e>>(
        &self,
        executor: E,
        left: &L,
    ) -> Result<Vec<R>, ExplorerError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.right, self.table, self.left
        );
        let keys = sqlx::query_scalar::<_, R>(&sql)
            .bind(left.clone())
            .fetch_all(executor)
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_directions_are_mirrored() {
        assert_eq!(
            USER_SUBSCRIPTIONS.columns(Direction::Forward),
            ("subscriber_telegram_id", "target_telegram_id")
        );
        assert_eq!(
            USER_SUBSCRIPTIONS.columns(Direction::Inverse),
            ("target_telegram_id", "subscriber_telegram_id")
        );
    }

    #[test]
    fn tables_match_schema() {
        assert_eq!(USER_SUBSCRIPTIONS.table(), "user_subscriptions");
        assert_eq!(FAVORITE_PLACES.table(), "place_user_association");
        assert_eq!(EVENT_PARTICIPANTS.table(), "event_participants");
    }
}
