//! Event DTOs.
//!
//! Timestamps are naive and interpreted as UTC. Both
//! `2030-01-01T10:00:00` and `2030-01-01T10:00:00.000000` are accepted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user_dto::{MAX_PLACE_NAME_LEN, UserDto};
use crate::api::extract::{Validate, limit_text};
use crate::domain::{EventWindow, PlaceId, TelegramId};
use crate::error::ExplorerError;
use crate::service::event_service::{EventDetail, EventDraft, EventSummary};

/// Maximum length of an event name.
pub const MAX_EVENT_NAME_LEN: usize = 100;

/// An event with its derived state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDto {
    /// Event id.
    pub id: i32,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Start, UTC.
    pub start_datetime: NaiveDateTime,
    /// End, UTC. Always after the start.
    pub end_datetime: NaiveDateTime,
    /// Organizer's comment.
    pub comment: Option<String>,
    /// External id of the venue.
    pub place_id: String,
    /// Telegram id of the organizer.
    pub organizer_telegram_id: TelegramId,
    /// Number of attending users.
    pub participant_count: i64,
    /// Whether the event has ended at the time of the response.
    pub is_finished: bool,
}

impl From<EventSummary> for EventDto {
    fn from(summary: EventSummary) -> Self {
        let e = summary.event;
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            start_datetime: e.start_datetime,
            end_datetime: e.end_datetime,
            comment: e.comment,
            place_id: e.place_id,
            organizer_telegram_id: e.organizer_telegram_id,
            participant_count: e.participant_count,
            is_finished: summary.is_finished,
        }
    }
}

/// An event with the users attending it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDetailDto {
    /// The event.
    #[serde(flatten)]
    pub event: EventDto,
    /// Attending users.
    pub participants: Vec<UserDto>,
}

impl From<EventDetail> for EventDetailDto {
    fn from(detail: EventDetail) -> Self {
        Self {
            event: detail.summary.into(),
            participants: detail.participants.into_iter().map(UserDto::from).collect(),
        }
    }
}

/// Editable event fields, the body of `PUT /events/{event_id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EventBody {
    /// Name, `Событие` when blank or omitted.
    #[serde(default)]
    pub name: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Start, UTC.
    pub start_datetime: NaiveDateTime,
    /// End, UTC.
    pub end_datetime: NaiveDateTime,
    /// Organizer's comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// External id of the venue.
    #[schema(value_type = String, example = "node/55")]
    pub place_id: PlaceId,
    /// Venue name cached with the place on first reference.
    #[serde(default)]
    pub place_name: Option<String>,
}

impl EventBody {
    /// Converts to a service draft.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidRequest`] if the event does not end
    /// after it starts.
    pub fn draft(&self) -> Result<EventDraft, ExplorerError> {
        Ok(EventDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            window: EventWindow::new(self.start_datetime, self.end_datetime)?,
            comment: self.comment.clone(),
            place_id: self.place_id,
            place_name: self.place_name.clone(),
        })
    }
}

impl Validate for EventBody {
    fn validate(&self) -> Result<(), ExplorerError> {
        limit_text("name", self.name.as_deref(), MAX_EVENT_NAME_LEN)?;
        limit_text("place_name", self.place_name.as_deref(), MAX_PLACE_NAME_LEN)?;
        self.draft().map(|_| ())
    }
}

/// Body of `POST /events/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Telegram id of the organizer.
    pub telegram_id: TelegramId,
    /// Event fields.
    #[serde(flatten)]
    pub event: EventBody,
}

impl Validate for CreateEventRequest {
    fn validate(&self) -> Result<(), ExplorerError> {
        self.event.validate()
    }
}
