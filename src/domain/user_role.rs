//! User roles.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role of a user, stored as the PostgreSQL enum `user_role`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    /// Full access.
    Administrator,
    /// Moderates content.
    Moderator,
    /// Creates events.
    Organizer,
    /// Regular user.
    #[default]
    Participant,
}
