//! User profile handlers: list, get, create, update.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CreateUserRequest, UpdateUserRequest, UserDto};
use crate::api::extract::{ApiPath, ValidatedJson};
use crate::app_state::AppState;
use crate::domain::TelegramId;
use crate::error::{ErrorResponse, ExplorerError};

/// `GET /users/`: List every user.
///
/// # Errors
///
/// Returns [`ExplorerError::Empty`] when no user exists.
#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    summary = "List users",
    responses(
        (status = 200, description = "All users", body = Vec<UserDto>),
        (status = 404, description = "No users stored", body = ErrorResponse),
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ExplorerError> {
    let rows = state.users.list().await?;
    Ok(Json(rows.into_iter().map(UserDto::from).collect::<Vec<_>>()))
}

/// `GET /users/{telegram_id}`: Get one user.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown telegram id.
#[utoipa::path(
    get,
    path = "/users/{telegram_id}",
    tag = "Users",
    summary = "Get a user",
    params(("telegram_id" = String, Path, description = "Telegram id")),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<TelegramId>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state.users.get(&telegram_id).await?;
    Ok(Json(UserDto::from(row)))
}

/// `POST /users/`: Register a user.
///
/// # Errors
///
/// Returns [`ExplorerError::Conflict`] if the telegram id is taken.
#[utoipa::path(
    post,
    path = "/users/",
    tag = "Users",
    summary = "Create a user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Telegram id already registered", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state.users.create(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(row))))
}

/// `PUT /users/{telegram_id}`: Replace profile fields.
///
/// Role and telegram id cannot be changed here.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown telegram id.
#[utoipa::path(
    put,
    path = "/users/{telegram_id}",
    tag = "Users",
    summary = "Update a user",
    params(("telegram_id" = String, Path, description = "Telegram id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<TelegramId>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let row = state.users.update(&telegram_id, &req.into()).await?;
    Ok(Json(UserDto::from(row)))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route("/users/{telegram_id}", get(get_user).put(update_user))
}
