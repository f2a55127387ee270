//! Association handlers: favorite places, follows, event attendance.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AttendEventRequest, FavoritePlaceDto, FavoritePlaceRequest, FavoritePlacesResponse,
    FollowRequest, FollowsResponse, ReplyResponse,
};
use crate::api::extract::{ApiPath, ValidatedJson};
use crate::app_state::AppState;
use crate::domain::TelegramId;
use crate::error::{ErrorResponse, ExplorerError};

// ── Favorite places ─────────────────────────────────────────────────────

/// `GET /users/{telegram_id}/places/subscription/`: List favorite places.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown user.
#[utoipa::path(
    get,
    path = "/users/{telegram_id}/places/subscription/",
    tag = "Subscriptions",
    summary = "List favorite places",
    params(("telegram_id" = String, Path, description = "Telegram id")),
    responses(
        (status = 200, description = "Favorite places, possibly none", body = FavoritePlacesResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn list_favorite_places(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<TelegramId>,
) -> Result<impl IntoResponse, ExplorerError> {
    let rows = state.users.favorite_places(&telegram_id).await?;
    Ok(Json(FavoritePlacesResponse {
        telegram_id,
        response: rows.into_iter().map(FavoritePlaceDto::from).collect(),
    }))
}

/// `POST /users/{telegram_id}/places/subscription/`: Favorite a place.
///
/// The place is stored locally on first reference.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown user and
/// [`ExplorerError::Conflict`] if already a favorite.
#[utoipa::path(
    post,
    path = "/users/{telegram_id}/places/subscription/",
    tag = "Subscriptions",
    summary = "Add a favorite place",
    params(("telegram_id" = String, Path, description = "Telegram id")),
    request_body = FavoritePlaceRequest,
    responses(
        (status = 201, description = "Favorite added", body = ReplyResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already a favorite", body = ErrorResponse),
    )
)]
pub async fn add_favorite_place(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<TelegramId>,
    ValidatedJson(req): ValidatedJson<FavoritePlaceRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let place = state
        .users
        .add_favorite_place(&telegram_id, req.place_id, req.name.as_deref())
        .await?;
    let message = format!("place {} added to favorites", place.place_id);
    Ok((
        StatusCode::CREATED,
        Json(ReplyResponse::new(Some(telegram_id), message)),
    ))
}

/// `DELETE /users/{telegram_id}/places/subscription/`: Unfavorite a place.
///
/// Only the `(user, place)` pair is removed; the place row stays.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] if the place is not a favorite.
#[utoipa::path(
    delete,
    path = "/users/{telegram_id}/places/subscription/",
    tag = "Subscriptions",
    summary = "Remove a favorite place",
    params(("telegram_id" = String, Path, description = "Telegram id")),
    request_body = FavoritePlaceRequest,
    responses(
        (status = 200, description = "Favorite removed", body = ReplyResponse),
        (status = 404, description = "Not a favorite", body = ErrorResponse),
    )
)]
pub async fn remove_favorite_place(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<TelegramId>,
    ValidatedJson(req): ValidatedJson<FavoritePlaceRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    state
        .users
        .remove_favorite_place(&telegram_id, req.place_id)
        .await?;
    let message = format!("place {} removed from favorites", req.place_id);
    Ok(Json(ReplyResponse::new(Some(telegram_id), message)))
}

// ── Follows ─────────────────────────────────────────────────────────────

/// `GET /users/{telegram_id}/subscription/`: Follows in both directions.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown user.
#[utoipa::path(
    get,
    path = "/users/{telegram_id}/subscription/",
    tag = "Subscriptions",
    summary = "List follows",
    params(("telegram_id" = String, Path, description = "Telegram id")),
    responses(
        (status = 200, description = "Subscriptions and subscribers", body = FollowsResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn list_follows(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<TelegramId>,
) -> Result<impl IntoResponse, ExplorerError> {
    let graph = state.users.follows(&telegram_id).await?;
    Ok(Json(FollowsResponse::new(telegram_id, graph)))
}

/// `POST /users/{telegram_id}/subscription/`: Follow another user.
///
/// # Errors
///
/// Returns [`ExplorerError::InvalidRequest`] for a self-follow,
/// [`ExplorerError::NotFound`] for an unknown user on either side and
/// [`ExplorerError::Conflict`] if already following.
#[utoipa::path(
    post,
    path = "/users/{telegram_id}/subscription/",
    tag = "Subscriptions",
    summary = "Follow a user",
    params(("telegram_id" = String, Path, description = "Telegram id of the follower")),
    request_body = FollowRequest,
    responses(
        (status = 201, description = "Now following", body = ReplyResponse),
        (status = 400, description = "Self-follow or invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already following", body = ErrorResponse),
    )
)]
pub async fn follow_user(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<TelegramId>,
    ValidatedJson(req): ValidatedJson<FollowRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    let target = state.users.subscribe(&telegram_id, &req.telegram_id).await?;
    let message = format!("subscribed to {}", target.display_name());
    Ok((
        StatusCode::CREATED,
        Json(ReplyResponse::new(Some(telegram_id), message)),
    ))
}

/// `DELETE /users/{telegram_id}/subscription/`: Unfollow a user.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] if the follow does not exist.
#[utoipa::path(
    delete,
    path = "/users/{telegram_id}/subscription/",
    tag = "Subscriptions",
    summary = "Unfollow a user",
    params(("telegram_id" = String, Path, description = "Telegram id of the follower")),
    request_body = FollowRequest,
    responses(
        (status = 200, description = "No longer following", body = ReplyResponse),
        (status = 404, description = "Not following", body = ErrorResponse),
    )
)]
pub async fn unfollow_user(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<TelegramId>,
    ValidatedJson(req): ValidatedJson<FollowRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    state
        .users
        .unsubscribe(&telegram_id, &req.telegram_id)
        .await?;
    let message = format!("unsubscribed from {}", req.telegram_id);
    Ok(Json(ReplyResponse::new(Some(telegram_id), message)))
}

// ── Attendance ──────────────────────────────────────────────────────────

/// `POST /users/events/subscription/`: Attend an event.
///
/// # Errors
///
/// Returns [`ExplorerError::NotFound`] for an unknown user or event and
/// [`ExplorerError::Conflict`] if already attending.
#[utoipa::path(
    post,
    path = "/users/events/subscription/",
    tag = "Subscriptions",
    summary = "Attend an event",
    request_body = AttendEventRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = ReplyResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User or event not found", body = ErrorResponse),
        (status = 409, description = "Already attending", body = ErrorResponse),
    )
)]
pub async fn attend_event(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AttendEventRequest>,
) -> Result<impl IntoResponse, ExplorerError> {
    state
        .users
        .attend_event(&req.telegram_id, req.event_id)
        .await?;
    let message = format!("attending event {}", req.event_id);
    Ok((
        StatusCode::CREATED,
        Json(ReplyResponse::new(Some(req.telegram_id), message)),
    ))
}

/// Favorite, follow and attendance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{telegram_id}/places/subscription/",
            get(list_favorite_places)
                .post(add_favorite_place)
                .delete(remove_favorite_place),
        )
        .route(
            "/users/{telegram_id}/subscription/",
            get(list_follows).post(follow_user).delete(unfollow_user),
        )
        .route("/users/events/subscription/", post(attend_event))
}
