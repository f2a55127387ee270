//! Service error types with HTTP status code mapping.
//!
//! [`ExplorerError`] is the central error type. Every variant belongs to
//! one [`ErrorKind`], and the kind alone decides the HTTP status. The
//! translation happens once, in the [`IntoResponse`] impl, so handlers
//! only ever return `Result<_, ExplorerError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE for `check_violation`.
const PG_CHECK_VIOLATION: &str = "23514";

/// Fixed message returned whenever the geodata service cannot be used.
pub const LOCATION_FETCH_FAILED: &str = "location fetch failed";

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "kind": "not_found",
///     "message": "user not found: 100",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, kind tag and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ExplorerError`]).
    pub code: u32,
    /// Coarse error category.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Coarse error category carried by every [`ExplorerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The requested record does not exist.
    NotFound,
    /// The write collides with an existing record or association.
    Conflict,
    /// The external geodata service failed or answered garbage.
    UpstreamUnavailable,
    /// The request is malformed.
    Validation,
    /// Storage or other server-side failure.
    Internal,
}

impl ErrorKind {
    /// HTTP status for this kind.
    ///
    /// Upstream failures stay 404 so existing clients, which treat a 404
    /// from the location endpoints as "nothing to show", keep working.
    #[must_use]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::NotFound | Self::UpstreamUnavailable => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                 |
/// |-----------|------------|-----------------------------|
/// | 1000–1999 | Validation | 400 Bad Request             |
/// | 2000–2999 | Not Found  | 404 Not Found               |
/// | 3000–3999 | Server     | 500 Internal Server Error   |
/// | 4000–4999 | Conflict   | 409 Conflict                |
/// | 5000–5999 | Upstream   | 404 Not Found               |
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A record looked up by key does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of record (e.g. `"user"`).
        entity: &'static str,
        /// The key that missed.
        key: String,
    },

    /// A list endpoint has nothing to return.
    #[error("no {0} available")]
    Empty(&'static str),

    /// A unique key or association already exists.
    #[error("already exists: {0}")]
    Conflict(String),

    /// The geodata service failed, timed out or returned an unreadable body.
    #[error("{}", LOCATION_FETCH_FAILED)]
    UpstreamUnavailable(String),

    /// Persistence layer failure.
    #[error("database error")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ExplorerError {
    /// Shorthand for [`ExplorerError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::Validation,
            Self::NotFound { .. } | Self::Empty(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            Self::PersistenceError(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::NotFound { .. } => 2001,
            Self::Empty(_) => 2002,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::Conflict(_) => 4001,
            Self::UpstreamUnavailable(_) => 5001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Extra context exposed to the client, if any.
    fn details(&self) -> Option<String> {
        match self {
            Self::PersistenceError(detail) => Some(detail.clone()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ExplorerError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let message = db_err.message().to_string();
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => return Self::Conflict(message),
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return Self::NotFound {
                        entity: "referenced record",
                        key: db_err.constraint().unwrap_or("unknown").to_string(),
                    };
                }
                Some(PG_CHECK_VIOLATION) => return Self::InvalidRequest(message),
                _ => {}
            }
        }
        Self::PersistenceError(err.to_string())
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}

impl IntoResponse for ExplorerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self.kind() {
            ErrorKind::Internal => tracing::error!(error = ?self, "request failed"),
            ErrorKind::UpstreamUnavailable => tracing::warn!(error = ?self, "geodata fetch failed"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                kind: self.kind(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
