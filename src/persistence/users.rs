//! User queries and the user-side associations (follows, favorites).

use super::junction::{Direction, FAVORITE_PLACES, USER_SUBSCRIPTIONS};
use super::models::{NewUser, PlaceRow, UserChanges, UserRow};
use super::postgres::PostgresPersistence;
use crate::domain::TelegramId;
use crate::error::ExplorerError;

/// Column list for `users`, qualified with the `u` alias.
const USER_COLUMNS: &str = "u.id, u.telegram_id, u.telegram_username, u.role, u.first_name, \
     u.last_name, u.language_code, u.is_bot, u.created_date, u.modified_date, u.comment";

impl PostgresPersistence {
    /// Lists all users by row id.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn list_users(&self) -> Result<Vec<UserRow>, ExplorerError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u ORDER BY u.id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Finds a user by telegram id.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn find_user(&self, telegram_id: &TelegramId) -> Result<Option<UserRow>, ExplorerError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.telegram_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Returns whether a user with this telegram id exists.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn user_exists(&self, telegram_id: &TelegramId) -> Result<bool, ExplorerError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE telegram_id = $1)")
                .bind(telegram_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// A duplicate telegram id surfaces as [`ExplorerError::Conflict`].
    pub async fn insert_user(&self, user: &NewUser) -> Result<UserRow, ExplorerError> {
        let sql = format!(
            "INSERT INTO users AS u (telegram_id, telegram_username, role, first_name, last_name, \
             language_code, is_bot, comment) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.telegram_id)
            .bind(&user.telegram_username)
            .bind(user.role)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.language_code)
            .bind(user.is_bot)
            .bind(&user.comment)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Replaces the profile fields of a user. Returns `None` if the user
    /// does not exist. `modified_date` is refreshed by trigger.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn update_user(
        &self,
        telegram_id: &TelegramId,
        changes: &UserChanges,
    ) -> Result<Option<UserRow>, ExplorerError> {
        let sql = format!(
            "UPDATE users AS u SET telegram_username = $2, first_name = $3, last_name = $4, \
             language_code = $5, comment = $6 WHERE u.telegram_id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(telegram_id)
            .bind(&changes.telegram_username)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.language_code)
            .bind(&changes.comment)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    // ── Follows ─────────────────────────────────────────────────────────

    /// Users `telegram_id` follows ([`Direction::Forward`]) or users that
    /// follow it ([`Direction::Inverse`]).
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn related_users(
        &self,
        telegram_id: &TelegramId,
        direction: Direction,
    ) -> Result<Vec<UserRow>, ExplorerError> {
        let (key_col, yield_col) = USER_SUBSCRIPTIONS.columns(direction);
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN {table} j ON j.{yield_col} = u.telegram_id \
             WHERE j.{key_col} = $1 ORDER BY u.id",
            table = USER_SUBSCRIPTIONS.table()
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(telegram_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Makes `subscriber` follow `target`.
    ///
    /// # Errors
    ///
    /// See [`super::Junction::link`].
    pub async fn subscribe_user(
        &self,
        subscriber: &TelegramId,
        target: &TelegramId,
    ) -> Result<(), ExplorerError> {
        USER_SUBSCRIPTIONS.link(&self.pool, subscriber, target).await
    }

    /// Removes a follow. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn unsubscribe_user(
        &self,
        subscriber: &TelegramId,
        target: &TelegramId,
    ) -> Result<bool, ExplorerError> {
        USER_SUBSCRIPTIONS.unlink(&self.pool, subscriber, target).await
    }

    // ── Favorite places ─────────────────────────────────────────────────

    /// Places the user has favorited.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn favorite_places(&self, telegram_id: &TelegramId) -> Result<Vec<PlaceRow>, ExplorerError> {
        let (key_col, yield_col) = FAVORITE_PLACES.columns(Direction::Forward);
        let sql = format!(
            "SELECT p.id, p.place_id, p.name FROM places p \
             JOIN {table} j ON j.{yield_col} = p.place_id WHERE j.{key_col} = $1 ORDER BY p.id",
            table = FAVORITE_PLACES.table()
        );
        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(telegram_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Ids of the places the user has favorited.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn favorite_place_ids(&self, telegram_id: &TelegramId) -> Result<Vec<String>, ExplorerError> {
        FAVORITE_PLACES.rights_of(&self.pool, telegram_id).await
    }

    /// Creates the place if needed and favorites it, in one unit of work.
    ///
    /// # Errors
    ///
    /// A duplicate favorite surfaces as [`ExplorerError::Conflict`]; the
    /// place insert is rolled back with it.
    pub async fn add_favorite_place(
        &self,
        telegram_id: &TelegramId,
        place_id: &str,
        name: Option<&str>,
    ) -> Result<PlaceRow, ExplorerError> {
        let mut tx = self.begin().await?;
        let place = Self::ensure_place(&mut *tx, place_id, name).await?;
        FAVORITE_PLACES
            .link(&mut *tx, telegram_id, &place.place_id)
            .await?;
        tx.commit().await?;
        Ok(place)
    }

    /// Removes a favorite. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn remove_favorite_place(
        &self,
        telegram_id: &TelegramId,
        place_id: &str,
    ) -> Result<bool, ExplorerError> {
        FAVORITE_PLACES
            .unlink(&self.pool, telegram_id, &place_id.to_string())
            .await
    }
}
