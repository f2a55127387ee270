//! `messages` lookup table: list, reply lookup, create, rename.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CallerQuery, MessageDto, MessageRequest, ReplyResponse};
use crate::api::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ExplorerError};
use crate::persistence::ReplyTable;

/// `GET /messages/`: List every message.
///
/// # Errors
///
/// Returns [`ExplorerError::Empty`] when the table has no rows.
#[utoipa::path(
    get,
    path = "/messages/",
    tag = "Messages",
    summary = "List messages",
    responses(
        (status = 200, description = "All messages", body = Vec<MessageDto>),
        (status = 404, description = "No messages stored", body = ErrorResponse),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ExplorerError> {
    let rows = state.replies.list(ReplyTable::Messages).await?;
    Ok(Json(
        rows.into_iter().map(MessageDto::from).collect::<Vec<_>>(),
    ))
}

/// `GET /messages/{message}`: Reply for a message.
///
/// Unknown messages are answered with the configured default message.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] if neither the message nor the
/// default exists.
#[utoipa::path(
    get,
    path = "/messages/{message}",
    tag = "Messages",
    summary = "Look up a message reply",
    params(("message" = String, Path, description = "Message text"), CallerQuery),
    responses(
        (status = 200, description = "Reply for the message or the default", body = ReplyResponse),
        (status = 404, description = "Neither message nor default exists", body = ErrorResponse),
    )
)]
pub async fn get_message(
    State(state): State<AppState>,
    ApiPath(message): ApiPath<String>,
    ApiQuery(caller): ApiQuery<CallerQuery>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state.replies.lookup(ReplyTable::Messages, &message).await?;
    Ok(Json(ReplyResponse::new(caller.telegram_id, row.response)))
}

/// `POST /messages/`: Create a message.
///
/// # Errors
///
/// Returns [`ExplorerError::Conflict`] if the message already exists.
#[utoipa::path(
    post,
    path = "/messages/",
    tag = "Messages",
    summary = "Create a message",
    request_body = MessageRequest,
    responses(
        (status = 201, description = "Message created", body = MessageDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Message already exists", body = ErrorResponse),
    )
)]
pub async fn create_message(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<MessageRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state
        .replies
        .create(ReplyTable::Messages, &req.message, &req.response)
        .await?;
    Ok((StatusCode::CREATED, Json(MessageDto::from(row))))
}

/// `PUT /messages/{message}`: Replace a message's text and reply.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] if the message does not exist and
/// [`ExplorerError::Conflict`] if the new text is taken.
#[utoipa::path(
    put,
    path = "/messages/{message}",
    tag = "Messages",
    summary = "Update a message",
    params(("message" = String, Path, description = "Current message text")),
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Message updated", body = MessageDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Message not found", body = ErrorResponse),
        (status = 409, description = "New message text already exists", body = ErrorResponse),
    )
)]
pub async fn update_message(
    State(state): State<AppState>,
    ApiPath(message): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<MessageRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state
        .replies
        .update(ReplyTable::Messages, &message, &req.message, &req.response)
        .await?;
    Ok(Json(MessageDto::from(row)))
}

/// Message routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages/", get(list_messages).post(create_message))
        .route("/messages/{message}", get(get_message).put(update_message))
}
