//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::TelegramId;

/// Envelope used by reply lookups and association writes: the caller's
/// telegram id echoed back next to a text payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReplyResponse {
    /// Telegram id of the caller, if one was given.
    pub telegram_id: Option<TelegramId>,
    /// Reply text.
    pub response: String,
}

impl ReplyResponse {
    /// Builds an envelope around `response`.
    #[must_use]
    pub fn new(telegram_id: Option<TelegramId>, response: impl Into<String>) -> Self {
        Self {
            telegram_id,
            response: response.into(),
        }
    }
}

/// `?telegram_id=` query parameter identifying the caller.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallerQuery {
    /// Telegram id of the caller.
    #[serde(default)]
    pub telegram_id: Option<TelegramId>,
}
