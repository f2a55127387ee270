//! Request extractors that report malformed input as
//! [`ExplorerError::InvalidRequest`] instead of axum's plain-text
//! rejections, so every client error shares the JSON error shape.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ExplorerError;

/// Field-level checks run after deserialization.
pub trait Validate {
    /// Checks lengths and cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidRequest`] describing the first
    /// violated constraint.
    fn validate(&self) -> Result<(), ExplorerError>;
}

/// JSON body that has been deserialized and validated.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ExplorerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ExplorerError::InvalidRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string parsed with JSON-shaped rejections.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ExplorerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ExplorerError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Path parameters parsed with JSON-shaped rejections.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ExplorerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ExplorerError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Rejects a blank or overlong string.
///
/// # Errors
///
/// Returns [`ExplorerError::InvalidRequest`] naming `field`.
pub fn require_text(field: &str, value: &str, max_chars: usize) -> Result<(), ExplorerError> {
    if value.trim().is_empty() {
        return Err(ExplorerError::InvalidRequest(format!(
            "{field} must not be empty"
        )));
    }
    limit_text(field, Some(value), max_chars)
}

/// Rejects an overlong optional string.
///
/// # Errors
///
/// Returns [`ExplorerError::InvalidRequest`] naming `field`.
pub fn limit_text(field: &str, value: Option<&str>, max_chars: usize) -> Result<(), ExplorerError> {
    match value {
        Some(v) if v.chars().count() > max_chars => Err(ExplorerError::InvalidRequest(format!(
            "{field} longer than {max_chars} characters"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_checks_blank_and_length() {
        assert!(require_text("command", "start", 50).is_ok());
        assert!(require_text("command", "  ", 50).is_err());
        assert!(require_text("command", &"x".repeat(51), 50).is_err());
    }

    #[test]
    fn limit_text_counts_characters_not_bytes() {
        assert!(limit_text("name", Some("Событие"), 7).is_ok());
        assert!(limit_text("name", None, 0).is_ok());
    }
}
