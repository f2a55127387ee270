//! User profile, favorite-place, follow and attendance DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::extract::{Validate, limit_text};
use crate::domain::{PlaceId, TelegramId, UserRole};
use crate::error::ExplorerError;
use crate::persistence::models::{NewUser, PlaceRow, UserChanges, UserRow};
use crate::service::user_service::FollowGraph;

/// Maximum length of username, first and last name.
pub const MAX_NAME_LEN: usize = 64;
/// Maximum length of an IETF language code.
pub const MAX_LANGUAGE_CODE_LEN: usize = 10;
/// Maximum length of a cached place name.
pub const MAX_PLACE_NAME_LEN: usize = 255;

/// A user profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDto {
    /// Internal row id.
    pub id: i32,
    /// Telegram id, the public key of a user.
    pub telegram_id: TelegramId,
    /// Telegram `@username`.
    pub telegram_username: Option<String>,
    /// Role.
    pub role: UserRole,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Language code, e.g. `ru`.
    pub language_code: Option<String>,
    /// Whether the account is a bot.
    pub is_bot: bool,
    /// Creation time.
    pub created_date: DateTime<Utc>,
    /// Last profile update.
    pub modified_date: Option<DateTime<Utc>>,
    /// Free-text comment.
    pub comment: Option<String>,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            telegram_id: row.telegram_id,
            telegram_username: row.telegram_username,
            role: row.role,
            first_name: row.first_name,
            last_name: row.last_name,
            language_code: row.language_code,
            is_bot: row.is_bot,
            created_date: row.created_date,
            modified_date: row.modified_date,
            comment: row.comment,
        }
    }
}

/// Body of `POST /users/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Telegram id of the new user.
    pub telegram_id: TelegramId,
    /// Telegram `@username`.
    #[serde(default)]
    pub telegram_username: Option<String>,
    /// Role, `participant` when omitted.
    #[serde(default)]
    pub role: UserRole,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Language code.
    #[serde(default)]
    pub language_code: Option<String>,
    /// Whether the account is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), ExplorerError> {
        validate_profile(
            self.telegram_username.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.language_code.as_deref(),
        )
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            telegram_id: req.telegram_id,
            telegram_username: req.telegram_username,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            language_code: req.language_code,
            is_bot: req.is_bot,
            comment: req.comment,
        }
    }
}

/// Body of `PUT /users/{telegram_id}`. Omitted fields are cleared.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Telegram `@username`.
    #[serde(default)]
    pub telegram_username: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Language code.
    #[serde(default)]
    pub language_code: Option<String>,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ExplorerError> {
        validate_profile(
            self.telegram_username.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.language_code.as_deref(),
        )
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            telegram_username: req.telegram_username,
            first_name: req.first_name,
            last_name: req.last_name,
            language_code: req.language_code,
            comment: req.comment,
        }
    }
}

fn validate_profile(
    username: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    language_code: Option<&str>,
) -> Result<(), ExplorerError> {
    limit_text("telegram_username", username, MAX_NAME_LEN)?;
    limit_text("first_name", first_name, MAX_NAME_LEN)?;
    limit_text("last_name", last_name, MAX_NAME_LEN)?;
    limit_text("language_code", language_code, MAX_LANGUAGE_CODE_LEN)
}

/// A favorite place as stored locally.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoritePlaceDto {
    /// External place id, e.g. `node/55`.
    pub place_id: String,
    /// Cached display name.
    pub name: Option<String>,
}

impl From<PlaceRow> for FavoritePlaceDto {
    fn from(row: PlaceRow) -> Self {
        Self {
            place_id: row.place_id,
            name: row.name,
        }
    }
}

/// Favorite places of one user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoritePlacesResponse {
    /// Owner of the list.
    pub telegram_id: TelegramId,
    /// Favorites, oldest first.
    pub response: Vec<FavoritePlaceDto>,
}

/// Body of `POST|DELETE /users/{telegram_id}/places/subscription/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FavoritePlaceRequest {
    /// External place id, `<type>/<id>` or a bare node id.
    #[schema(value_type = String, example = "node/55")]
    pub place_id: PlaceId,
    /// Display name cached with the place. Ignored on delete.
    #[serde(default)]
    pub name: Option<String>,
}

impl Validate for FavoritePlaceRequest {
    fn validate(&self) -> Result<(), ExplorerError> {
        limit_text("name", self.name.as_deref(), MAX_PLACE_NAME_LEN)
    }
}

/// Body of `POST|DELETE /users/{telegram_id}/subscription/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FollowRequest {
    /// The user to follow or unfollow.
    pub telegram_id: TelegramId,
}

impl Validate for FollowRequest {
    fn validate(&self) -> Result<(), ExplorerError> {
        Ok(())
    }
}

/// Both directions of a user's follow graph.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FollowsResponse {
    /// The user whose graph this is.
    pub telegram_id: TelegramId,
    /// Users this user follows.
    pub subscriptions: Vec<UserDto>,
    /// Users following this user.
    pub subscribers: Vec<UserDto>,
}

impl FollowsResponse {
    /// Wraps a [`FollowGraph`].
    #[must_use]
    pub fn new(telegram_id: TelegramId, graph: FollowGraph) -> Self {
        Self {
            telegram_id,
            subscriptions: graph.subscriptions.into_iter().map(UserDto::from).collect(),
            subscribers: graph.subscribers.into_iter().map(UserDto::from).collect(),
        }
    }
}

/// Body of `POST /users/events/subscription/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttendEventRequest {
    /// The attending user.
    pub telegram_id: TelegramId,
    /// The event to attend.
    pub event_id: i32,
}

impl Validate for AttendEventRequest {
    fn validate(&self) -> Result<(), ExplorerError> {
        if self.event_id <= 0 {
            return Err(ExplorerError::InvalidRequest(format!(
                "event_id must be positive, got {}",
                self.event_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_user_defaults() {
        let Ok(req) = serde_json::from_str::<CreateUserRequest>(r#"{"telegram_id":"100"}"#) else {
            panic!("should parse");
        };
        assert_eq!(req.role, UserRole::Participant);
        assert!(!req.is_bot);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_telegram_id_is_rejected_at_parse() {
        let parsed = serde_json::from_str::<CreateUserRequest>(r#"{"telegram_id":"  "}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn profile_limits() {
        let req = UpdateUserRequest {
            telegram_username: None,
            first_name: Some("a".repeat(65)),
            last_name: None,
            language_code: None,
            comment: None,
        };
        assert!(req.validate().is_err());
        let req = UpdateUserRequest {
            language_code: Some("en-US-x-long".to_string()),
            first_name: None,
            ..req
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn favorite_request_accepts_bare_node_id() {
        let Ok(req) = serde_json::from_str::<FavoritePlaceRequest>(r#"{"place_id":"55"}"#) else {
            panic!("should parse");
        };
        assert_eq!(req.place_id.to_string(), "node/55");
    }

    #[test]
    fn attendance_needs_positive_event_id() {
        let Ok(id) = TelegramId::parse("100") else {
            panic!("valid id");
        };
        let req = AttendEventRequest {
            telegram_id: id,
            event_id: 0,
        };
        assert!(req.validate().is_err());
    }
}
