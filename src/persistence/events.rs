//! Event queries, attendance, and the active-events lookup used to
//! annotate geodata results.

use chrono::NaiveDateTime;

use super::junction::{Direction, EVENT_PARTICIPANTS};
use super::models::{ActiveEventRow, EventFields, EventRow, UserRow};
use super::postgres::PostgresPersistence;
use crate::domain::TelegramId;
use crate::error::ExplorerError;

/// Column list for `events` with the participant count, alias `e`.
const EVENT_COLUMNS: &str = "e.id, e.name, e.description, e.start_datetime, e.end_datetime, \
     e.comment, e.place_id, e.organizer_telegram_id, \
     (SELECT COUNT(*) FROM event_participants p WHERE p.event_id = e.id) AS participant_count";

impl PostgresPersistence {
    /// Lists all events, latest start first.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn list_events(&self) -> Result<Vec<EventRow>, ExplorerError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events e ORDER BY e.start_datetime DESC, e.id DESC");
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Finds one event.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn find_event(&self, event_id: i32) -> Result<Option<EventRow>, ExplorerError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Creates the place if needed and inserts the event, in one unit
    /// of work.
    ///
    /// # Errors
    ///
    /// An unknown organizer surfaces as [`ExplorerError::NotFound`]; the
    /// place insert is rolled back with it.
    pub async fn insert_event(
        &self,
        organizer: &TelegramId,
        fields: &EventFields,
        place_name: Option<&str>,
    ) -> Result<EventRow, ExplorerError> {
        let mut tx = self.begin().await?;
        Self::ensure_place(&mut *tx, &fields.place_id, place_name).await?;
        let sql = format!(
            "INSERT INTO events AS e (name, description, start_datetime, end_datetime, comment, \
             place_id, organizer_telegram_id) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.start_datetime)
            .bind(fields.end_datetime)
            .bind(&fields.comment)
            .bind(&fields.place_id)
            .bind(organizer)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Rewrites an event, creating its (possibly new) place if needed.
    /// Returns `None` if the event does not exist; nothing is written then.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn update_event(
        &self,
        event_id: i32,
        fields: &EventFields,
        place_name: Option<&str>,
    ) -> Result<Option<EventRow>, ExplorerError> {
        let mut tx = self.begin().await?;
        Self::ensure_place(&mut *tx, &fields.place_id, place_name).await?;
        let sql = format!(
            "UPDATE events AS e SET name = $2, description = $3, start_datetime = $4, \
             end_datetime = $5, comment = $6, place_id = $7 WHERE e.id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.start_datetime)
            .bind(fields.end_datetime)
            .bind(&fields.comment)
            .bind(&fields.place_id)
            .fetch_optional(&mut *tx)
            .await?;
        if row.is_some() {
            tx.commit().await?;
        }
        Ok(row)
    }

    /// Users attending an event.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn event_participants(&self, event_id: i32) -> Result<Vec<UserRow>, ExplorerError> {
        let (key_col, yield_col) = EVENT_PARTICIPANTS.columns(Direction::Inverse);
        let sql = format!(
            "SELECT u.id, u.telegram_id, u.telegram_username, u.role, u.first_name, u.last_name, \
             u.language_code, u.is_bot, u.created_date, u.modified_date, u.comment \
             FROM users u JOIN {table} j ON j.{yield_col} = u.telegram_id \
             WHERE j.{key_col} = $1 ORDER BY u.id",
            table = EVENT_PARTICIPANTS.table()
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Records that a user attends an event.
    ///
    /// # Errors
    ///
    /// A repeated attendance surfaces as [`ExplorerError::Conflict`], an
    /// unknown user or event as [`ExplorerError::NotFound`].
    pub async fn add_participant(
        &self,
        telegram_id: &TelegramId,
        event_id: i32,
    ) -> Result<(), ExplorerError> {
        EVENT_PARTICIPANTS
            .link(&self.pool, telegram_id, &event_id)
            .await
    }

    /// Events at any of `place_ids` that have not ended by `now`, each
    /// joined with its organizer.
    ///
    /// # Errors
    ///
    /// Returns a [`ExplorerError::PersistenceError`] on database failure.
    pub async fn active_events_at(
        &self,
        place_ids: &[String],
        now: NaiveDateTime,
    ) -> Result<Vec<ActiveEventRow>, ExplorerError> {
        if place_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, ActiveEventRow>(
            "SELECT e.id, e.name, e.description, e.start_datetime, e.end_datetime, e.place_id, \
             e.organizer_telegram_id, u.telegram_username AS organizer_username, \
             u.first_name AS organizer_first_name, u.last_name AS organizer_last_name \
             FROM events e JOIN users u ON u.telegram_id = e.organizer_telegram_id \
             WHERE e.place_id = ANY($1) AND e.end_datetime > $2 \
             ORDER BY e.start_datetime, e.id",
        )
        .bind(place_ids)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
