//! Event handlers: list, get, create, update.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CreateEventRequest, EventBody, EventDetailDto, EventDto};
use crate::api::extract::{ApiPath, ValidatedJson};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ExplorerError};

/// `GET /events/`: List events, latest start first.
///
/// # Errors
///
/// Returns [`ExplorerError::Empty`] when no event exists.
#[utoipa::path(
    get,
    path = "/events/",
    tag = "Events",
    summary = "List events",
    description = "Returns every event ordered by start time, newest first. `is_finished` is computed at response time.",
    responses(
        (status = 200, description = "All events", body = Vec<EventDto>),
        (status = 404, description = "No events stored", body = ErrorResponse),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ExplorerError> {
    let events = state.events.list().await?;
    Ok(Json(events.into_iter().map(EventDto::from).collect::<Vec<_>>()))
}

/// `GET /events/{event_id}`: Get one event with its participants.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown event.
#[utoipa::path(
    get,
    path = "/events/{event_id}",
    tag = "Events",
    summary = "Get an event",
    params(("event_id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "The event", body = EventDetailDto),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i32>,
) -> Result<impl IntoResponse, ExplorerError> {
    let detail = state.events.get(event_id).await?;
    Ok(Json(EventDetailDto::from(detail)))
}

/// `POST /events/`: Create an event.
///
/// The venue is stored locally on first reference.
///
/// # Errors
///
/// Returns [`ExplorerError::InvalidRequest`] if the event does not end
/// after it starts and [`ExplorerError::NotFound`] for an unknown organizer.
#[utoipa::path(
    post,
    path = "/events/",
    tag = "Events",
    summary = "Create an event",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Organizer not found", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let draft = req.event.draft()?;
    let event = state.events.create(&req.telegram_id, &draft).await?;
    Ok((StatusCode::CREATED, Json(EventDto::from(event))))
}

/// `PUT /events/{event_id}`: Replace an event's fields.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown event.
#[utoipa::path(
    put,
    path = "/events/{event_id}",
    tag = "Events",
    summary = "Update an event",
    params(("event_id" = i32, Path, description = "Event id")),
    request_body = EventBody,
    responses(
        (status = 200, description = "Event updated", body = EventDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<EventBody>,
) -> Result<impl IntoResponse, ExplorerError> {
    let event = state.events.update(event_id, &body.draft()?).await?;
    Ok(Json(EventDto::from(event)))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/", get(list_events).post(create_event))
        .route("/events/{event_id}", get(get_event).put(update_event))
}
