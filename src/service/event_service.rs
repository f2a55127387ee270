//! Event creation, updates and listing with the derived finished state.

use chrono::{NaiveDateTime, Utc};

use crate::domain::{EventWindow, PlaceId, TelegramId};
use crate::error::ExplorerError;
use crate::persistence::PostgresPersistence;
use crate::persistence::models::{EventFields, EventRow, UserRow};

/// Name given to events created without one.
pub const DEFAULT_EVENT_NAME: &str = "Событие";

/// Input for creating or rewriting an event.
#[derive(Debug, Clone)]
pub struct EventDraft {
    /// Title; [`DEFAULT_EVENT_NAME`] when `None` or blank.
    pub name: Option<String>,
    /// Free-text description.
    pub description: String,
    /// Validated start/end.
    pub window: EventWindow,
    /// Free-text note.
    pub comment: Option<String>,
    /// Where the event happens.
    pub place_id: PlaceId,
    /// Name to cache for the place, if known.
    pub place_name: Option<String>,
}

impl EventDraft {
    fn fields(&self) -> EventFields {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_EVENT_NAME)
            .to_string();
        EventFields {
            name,
            description: self.description.clone(),
            start_datetime: self.window.start(),
            end_datetime: self.window.end(),
            comment: self.comment.clone(),
            place_id: self.place_id.to_string(),
        }
    }
}

/// An event as read at a given instant.
#[derive(Debug, Clone)]
pub struct EventSummary {
    /// Stored event.
    pub event: EventRow,
    /// `end_datetime` is not after the read time.
    pub is_finished: bool,
}

impl EventSummary {
    /// Classifies `event` against `now`.
    #[must_use]
    pub fn at(event: EventRow, now: NaiveDateTime) -> Self {
        let is_finished = crate::domain::event_window::is_finished(event.end_datetime, now);
        Self { event, is_finished }
    }
}

/// An event together with its participants.
#[derive(Debug, Clone)]
pub struct EventDetail {
    /// Event and finished state.
    pub summary: EventSummary,
    /// Attending users.
    pub participants: Vec<UserRow>,
}

/// Orchestrates event reads and writes.
#[derive(Debug, Clone)]
pub struct EventService {
    store: PostgresPersistence,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: PostgresPersistence) -> Self {
        Self { store }
    }

    /// All events, latest start first, classified at the time of the call.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::Empty`] when there are no events.
    pub async fn list(&self) -> Result<Vec<EventSummary>, ExplorerError> {
        let rows = self.store.list_events().await?;
        if rows.is_empty() {
            return Err(ExplorerError::Empty("events"));
        }
        let now = Utc::now().naive_utc();
        Ok(rows
            .into_iter()
            .map(|row| EventSummary::at(row, now))
            .collect())
    }

    /// One event with its participants.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the event does not exist.
    pub async fn get(&self, event_id: i32) -> Result<EventDetail, ExplorerError> {
        let row = self
            .store
            .find_event(event_id)
            .await?
            .ok_or_else(|| ExplorerError::not_found("event", event_id))?;
        let participants = self.store.event_participants(event_id).await?;
        Ok(EventDetail {
            summary: EventSummary::at(row, Utc::now().naive_utc()),
            participants,
        })
    }

    /// Creates an event organized by `organizer`.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the organizer is not a
    /// registered user.
    pub async fn create(
        &self,
        organizer: &TelegramId,
        draft: &EventDraft,
    ) -> Result<EventSummary, ExplorerError> {
        if !self.store.user_exists(organizer).await? {
            return Err(ExplorerError::not_found("user", organizer));
        }
        let row = self
            .store
            .insert_event(organizer, &draft.fields(), draft.place_name.as_deref())
            .await?;
        tracing::info!(event_id = row.id, %organizer, place_id = %row.place_id, "event created");
        Ok(EventSummary::at(row, Utc::now().naive_utc()))
    }

    /// Rewrites an event.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NotFound`] if the event does not exist.
    pub async fn update(
        &self,
        event_id: i32,
        draft: &EventDraft,
    ) -> Result<EventSummary, ExplorerError> {
        let row = self
            .store
            .update_event(event_id, &draft.fields(), draft.place_name.as_deref())
            .await?
            .ok_or_else(|| ExplorerError::not_found("event", event_id))?;
        tracing::info!(event_id, "event updated");
        Ok(EventSummary::at(row, Utc::now().naive_utc()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ElementType;

    fn ts(s: &str) -> NaiveDateTime {
        let Ok(t) = s.parse() else {
            panic!("bad timestamp");
        };
        t
    }

    fn draft(name: Option<&str>) -> EventDraft {
        let Ok(window) = EventWindow::new(ts("2030-01-01T10:00:00"), ts("2030-01-01T12:00:00"))
        else {
            panic!("valid window");
        };
        EventDraft {
            name: name.map(str::to_string),
            description: "Coffee".to_string(),
            window,
            comment: None,
            place_id: PlaceId::new(ElementType::Node, 55),
            place_name: None,
        }
    }

    fn row(end: &str) -> EventRow {
        let Ok(organizer) = TelegramId::parse("100") else {
            panic!("valid id");
        };
        EventRow {
            id: 1,
            name: "Meetup".to_string(),
            description: String::new(),
            start_datetime: ts("2030-01-01T10:00:00"),
            end_datetime: ts(end),
            comment: None,
            place_id: "node/55".to_string(),
            organizer_telegram_id: organizer,
            participant_count: 0,
        }
    }

    #[test]
    fn blank_name_gets_default() {
        assert_eq!(draft(None).fields().name, DEFAULT_EVENT_NAME);
        assert_eq!(draft(Some("  ")).fields().name, DEFAULT_EVENT_NAME);
        assert_eq!(draft(Some("Meetup")).fields().name, "Meetup");
    }

    #[test]
    fn fields_store_canonical_place_id() {
        assert_eq!(draft(None).fields().place_id, "node/55");
    }

    #[test]
    fn summary_is_classified_at_read_time() {
        let before = EventSummary::at(row("2030-01-01T12:00:00"), ts("2030-01-01T11:00:00"));
        assert!(!before.is_finished);
        let after = EventSummary::at(row("2030-01-01T12:00:00"), ts("2030-01-01T12:30:00"));
        assert!(after.is_finished);
    }
}
