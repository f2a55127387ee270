//! `commands` lookup table: list, reply lookup, create, rename.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CallerQuery, CommandDto, CommandRequest, ReplyResponse};
use crate::api::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ExplorerError};
use crate::persistence::ReplyTable;

/// `GET /commands/`: List every command.
///
/// # Errors
///
/// Returns [`ExplorerError::Empty`] when the table has no rows.
#[utoipa::path(
    get,
    path = "/commands/",
    tag = "Commands",
    summary = "List commands",
    responses(
        (status = 200, description = "All commands", body = Vec<CommandDto>),
        (status = 404, description = "No commands stored", body = ErrorResponse),
    )
)]
pub async fn list_commands(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ExplorerError> {
    let rows = state.replies.list(ReplyTable::Commands).await?;
    Ok(Json(
        rows.into_iter().map(CommandDto::from).collect::<Vec<_>>(),
    ))
}

/// `GET /commands/{command}`: Reply for a command.
///
/// Unknown commands are answered with the configured default command.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] if neither the command nor the
/// default exists.
#[utoipa::path(
    get,
    path = "/commands/{command}",
    tag = "Commands",
    summary = "Look up a command reply",
    params(("command" = String, Path, description = "Command text"), CallerQuery),
    responses(
        (status = 200, description = "Reply for the command or the default", body = ReplyResponse),
        (status = 404, description = "Neither command nor default exists", body = ErrorResponse),
    )
)]
pub async fn get_command(
    State(state): State<AppState>,
    ApiPath(command): ApiPath<String>,
    ApiQuery(caller): ApiQuery<CallerQuery>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state.replies.lookup(ReplyTable::Commands, &command).await?;
    Ok(Json(ReplyResponse::new(caller.telegram_id, row.response)))
}

/// `POST /commands/`: Create a command.
///
/// # Errors
///
/// Returns [`ExplorerError::Conflict`] if the command already exists.
#[utoipa::path(
    post,
    path = "/commands/",
    tag = "Commands",
    summary = "Create a command",
    request_body = CommandRequest,
    responses(
        (status = 201, description = "Command created", body = CommandDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Command already exists", body = ErrorResponse),
    )
)]
pub async fn create_command(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CommandRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state
        .replies
        .create(ReplyTable::Commands, &req.command, &req.response)
        .await?;
    Ok((StatusCode::CREATED, Json(CommandDto::from(row))))
}

/// `PUT /commands/{command}`: Replace a command's text and reply.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] if the command does not exist and
/// [`ExplorerError::Conflict`] if the new text is taken.
#[utoipa::path(
    put,
    path = "/commands/{command}",
    tag = "Commands",
    summary = "Update a command",
    params(("command" = String, Path, description = "Current command text")),
    request_body = CommandRequest,
    responses(
        (status = 200, description = "Command updated", body = CommandDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Command not found", body = ErrorResponse),
        (status = 409, description = "New command text already exists", body = ErrorResponse),
    )
)]
pub async fn update_command(
    State(state): State<AppState>,
    ApiPath(command): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<CommandRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state
        .replies
        .update(ReplyTable::Commands, &command, &req.command, &req.response)
        .await?;
    Ok(Json(CommandDto::from(row)))
}

/// Command routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/commands/", get(list_commands).post(create_command))
        .route("/commands/{command}", get(get_command).put(update_command))
}
