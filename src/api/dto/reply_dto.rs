//! DTOs for the `commands` and `messages` lookup tables.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::extract::{Validate, require_text};
use crate::error::ExplorerError;
use crate::persistence::models::ReplyRow;

/// Maximum length of `commands.command`.
pub const MAX_COMMAND_LEN: usize = 50;
/// Maximum length of `commands.response`.
pub const MAX_COMMAND_RESPONSE_LEN: usize = 250;
/// Maximum length of `messages.message`.
pub const MAX_MESSAGE_LEN: usize = 250;
/// Maximum length of `messages.response`.
pub const MAX_MESSAGE_RESPONSE_LEN: usize = 1000;

/// One row of `commands`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommandDto {
    /// Row id.
    pub id: i32,
    /// Command text, e.g. `start`.
    pub command: String,
    /// Reply sent for the command.
    pub response: String,
}

impl From<ReplyRow> for CommandDto {
    fn from(row: ReplyRow) -> Self {
        Self {
            id: row.id,
            command: row.key,
            response: row.response,
        }
    }
}

/// Body of `POST /commands/` and `PUT /commands/{command}`.
///
/// Unknown fields, such as the `telegram_id` bots attach to every call,
/// are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommandRequest {
    /// Command text. On update this may rename the command.
    pub command: String,
    /// Reply text.
    pub response: String,
}

impl Validate for CommandRequest {
    fn validate(&self) -> Result<(), ExplorerError> {
        require_text("command", &self.command, MAX_COMMAND_LEN)?;
        require_text("response", &self.response, MAX_COMMAND_RESPONSE_LEN)
    }
}

/// One row of `messages`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageDto {
    /// Row id.
    pub id: i32,
    /// Incoming message text.
    pub message: String,
    /// Reply sent for the message.
    pub response: String,
}

impl From<ReplyRow> for MessageDto {
    fn from(row: ReplyRow) -> Self {
        Self {
            id: row.id,
            message: row.key,
            response: row.response,
        }
    }
}

/// Body of `POST /messages/` and `PUT /messages/{message}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MessageRequest {
    /// Message text. On update this may rename the message key.
    pub message: String,
    /// Reply text.
    pub response: String,
}

impl Validate for MessageRequest {
    fn validate(&self) -> Result<(), ExplorerError> {
        require_text("message", &self.message, MAX_MESSAGE_LEN)?;
        require_text("response", &self.response, MAX_MESSAGE_RESPONSE_LEN)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn command(command: &str, response: &str) -> CommandRequest {
        CommandRequest {
            command: command.to_string(),
            response: response.to_string(),
        }
    }

    #[test]
    fn command_limits() {
        assert!(command("start", "Hello").validate().is_ok());
        assert!(command(&"c".repeat(51), "Hello").validate().is_err());
        assert!(command("start", &"r".repeat(251)).validate().is_err());
        assert!(command("", "Hello").validate().is_err());
    }

    #[test]
    fn message_response_allows_a_thousand_chars() {
        let request = MessageRequest {
            message: "hi".to_string(),
            response: "r".repeat(1000),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn caller_id_in_body_is_ignored() {
        let raw = r#"{"telegram_id": "100", "command": "start", "response": "Hello"}"#;
        let Ok(request) = serde_json::from_str::<CommandRequest>(raw) else {
            panic!("should parse");
        };
        assert_eq!(request.command, "start");
        assert!(request.validate().is_ok());
    }
}
