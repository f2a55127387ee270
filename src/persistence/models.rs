//! Database row types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::domain::{TelegramId, UserRole};

/// A row from `commands` or `messages`; `key` is the lookup text.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReplyRow {
    /// Auto-increment row ID.
    pub id: i32,
    /// Command or message text.
    pub key: String,
    /// Canned reply.
    pub response: String,
}

/// A row from `users`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserRow {
    /// Auto-increment row ID; internal only.
    pub id: i32,
    /// Messaging-platform id.
    pub telegram_id: TelegramId,
    /// Platform username.
    pub telegram_username: Option<String>,
    /// Role of the user.
    pub role: UserRole,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// IETF language tag reported by the client.
    pub language_code: Option<String>,
    /// Whether the account is a bot.
    pub is_bot: bool,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Last update, set by trigger.
    pub modified_date: Option<DateTime<Utc>>,
    /// Free-text note.
    pub comment: Option<String>,
}

impl UserRow {
    /// Name shown next to events this user organizes.
    ///
    /// Username first, then the full name, then the raw telegram id.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(
            &self.telegram_id,
            self.telegram_username.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Messaging-platform id.
    pub telegram_id: TelegramId,
    /// Platform username.
    pub telegram_username: Option<String>,
    /// Initial role.
    pub role: UserRole,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Language tag.
    pub language_code: Option<String>,
    /// Bot flag.
    pub is_bot: bool,
    /// Free-text note.
    pub comment: Option<String>,
}

/// Profile fields replaced by `PUT /users/{telegram_id}`.
#[derive(Debug, Clone)]
pub struct UserChanges {
    /// Platform username.
    pub telegram_username: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Language tag.
    pub language_code: Option<String>,
    /// Free-text note.
    pub comment: Option<String>,
}

/// A row from `places`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlaceRow {
    /// Auto-increment row ID.
    pub id: i32,
    /// External geodata id (`node/55`).
    pub place_id: String,
    /// Cached display name.
    pub name: Option<String>,
}

/// A row from `events` with its participant count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EventRow {
    /// Auto-increment row ID.
    pub id: i32,
    /// Event title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Start, naive UTC.
    pub start_datetime: NaiveDateTime,
    /// End, naive UTC.
    pub end_datetime: NaiveDateTime,
    /// Free-text note.
    pub comment: Option<String>,
    /// Place the event happens at.
    pub place_id: String,
    /// Organizing user.
    pub organizer_telegram_id: TelegramId,
    /// Number of attending users.
    pub participant_count: i64,
}

/// Fields written by event create and update.
#[derive(Debug, Clone)]
pub struct EventFields {
    /// Event title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Start, naive UTC.
    pub start_datetime: NaiveDateTime,
    /// End, naive UTC.
    pub end_datetime: NaiveDateTime,
    /// Free-text note.
    pub comment: Option<String>,
    /// Place the event happens at.
    pub place_id: String,
}

/// An unfinished event joined with its organizer, used when annotating
/// geodata results.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActiveEventRow {
    /// Event row ID.
    pub id: i32,
    /// Event title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Start, naive UTC.
    pub start_datetime: NaiveDateTime,
    /// End, naive UTC.
    pub end_datetime: NaiveDateTime,
    /// Place the event happens at.
    pub place_id: String,
    /// Organizing user.
    pub organizer_telegram_id: TelegramId,
    /// Organizer's username.
    pub organizer_username: Option<String>,
    /// Organizer's given name.
    pub organizer_first_name: Option<String>,
    /// Organizer's family name.
    pub organizer_last_name: Option<String>,
}

impl ActiveEventRow {
    /// Display name of the organizer, see [`UserRow::display_name`].
    #[must_use]
    pub fn organizer_name(&self) -> String {
        display_name(
            &self.organizer_telegram_id,
            self.organizer_username.as_deref(),
            self.organizer_first_name.as_deref(),
            self.organizer_last_name.as_deref(),
        )
    }
}

fn display_name(
    telegram_id: &TelegramId,
    username: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> String {
    if let Some(username) = username.map(str::trim).filter(|u| !u.is_empty()) {
        return username.to_string();
    }
    let full = format!(
        "{} {}",
        first_name.unwrap_or_default(),
        last_name.unwrap_or_default()
    );
    let full = full.trim();
    if full.is_empty() {
        telegram_id.to_string()
    } else {
        full.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn tid(raw: &str) -> TelegramId {
        let Ok(id) = TelegramId::parse(raw) else {
            panic!("valid id");
        };
        id
    }

    #[test]
    fn display_name_prefers_username() {
        assert_eq!(
            display_name(&tid("1"), Some("alice"), Some("Alice"), Some("Smith")),
            "alice"
        );
    }

    #[test]
    fn display_name_falls_back_to_full_name() {
        assert_eq!(
            display_name(&tid("1"), Some(" "), Some("Alice"), None),
            "Alice"
        );
        assert_eq!(
            display_name(&tid("1"), None, Some("Alice"), Some("Smith")),
            "Alice Smith"
        );
    }

    #[test]
    fn display_name_falls_back_to_telegram_id() {
        assert_eq!(display_name(&tid("100"), None, None, Some("")), "100");
    }
}
