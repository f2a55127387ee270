//! Type-safe Telegram user identifier.
//!
//! [`TelegramId`] wraps the messaging-platform id as a string. It is the
//! key every other table uses to reference a user; the internal numeric
//! row id never leaves the persistence layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ExplorerError;

/// Maximum accepted length, matching the `users.telegram_id` column.
pub const MAX_TELEGRAM_ID_LEN: usize = 64;

/// Telegram identifier of a user.
///
/// Immutable once assigned and unique across the system.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct TelegramId(String);

impl TelegramId {
    /// Validates and wraps a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidRequest`] if the id is blank or
    /// longer than [`MAX_TELEGRAM_ID_LEN`].
    pub fn parse(raw: impl Into<String>) -> Result<Self, ExplorerError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExplorerError::InvalidRequest(
                "telegram_id must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_TELEGRAM_ID_LEN {
            return Err(ExplorerError::InvalidRequest(format!(
                "telegram_id longer than {MAX_TELEGRAM_ID_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TelegramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TelegramId {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TelegramId {
    type Error = ExplorerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TelegramId> for String {
    fn from(id: TelegramId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let Ok(id) = TelegramId::parse(" 100 ") else {
            panic!("valid id");
        };
        assert_eq!(id.as_str(), "100");
    }

    #[test]
    fn blank_is_rejected() {
        assert!(TelegramId::parse("   ").is_err());
    }

    #[test]
    fn overlong_is_rejected() {
        let raw = "9".repeat(MAX_TELEGRAM_ID_LEN + 1);
        assert!(TelegramId::parse(raw).is_err());
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<TelegramId>("\"\"").is_err());
        let Ok(id) = serde_json::from_str::<TelegramId>("\"42\"") else {
            panic!("valid id");
        };
        assert_eq!(id.to_string(), "42");
    }
}
