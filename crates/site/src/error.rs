//! Unified error handling with Sentry integration.
//!
//! Page handlers return [`AppError`], which answers plain text. Control panel
//! write endpoints and the public JSON endpoints return [`ApiError`], which
//! answers `{"success": false, "message": ...}`. Both capture server errors
//! to Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

fn capture(error: &(dyn std::error::Error + 'static)) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        sentry_event_id = %event_id,
        "Request error"
    );
}

/// Application-level error type for page handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            capture(&self);
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::NotFound(_) | Self::Database(RepositoryError::NotFound) => "Not found".to_owned(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_owned(),
            _ => "Internal server error".to_owned(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Body of every JSON error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// Error type for JSON endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Request validation failed; the message is shown to the client.
    #[error("{0}")]
    BadRequest(String),

    /// Entity not found; the message is shown to the client.
    #[error("{0}")]
    NotFound(String),

    /// Not signed in.
    #[error("Authentication required")]
    Unauthorized,

    /// Wrong HTTP method for a write endpoint.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A backend failed; the public message is shown, the cause is logged.
    #[error("{message}: {cause}")]
    Unavailable {
        message: &'static str,
        cause: String,
    },
}

impl ApiError {
    /// Map a repository error for `entity`, turning `NotFound` into
    /// `"<entity> not found."`.
    pub fn for_entity(entity: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |e| match e {
            RepositoryError::NotFound => Self::NotFound(format!("{entity} not found.")),
            other => Self::Database(other),
        }
    }

    /// A 500 with a public `message` and a logged `cause`.
    pub fn unavailable(message: &'static str, cause: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message,
            cause: cause.to_string(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Unavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        Self::Database(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            capture(&self);
        }

        let message = match &self {
            Self::Database(_) => "Internal server error".to_owned(),
            Self::Unavailable { message, .. } => (*message).to_owned(),
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Set the Sentry user context for a signed-in admin.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("post".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_entity_not_found_message() {
        let err = ApiError::for_entity("Product")(RepositoryError::NotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Product not found.");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let err = ApiError::Database(RepositoryError::DataCorruption("secret column".to_owned()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_unavailable_shows_public_message_only() {
        let err = ApiError::unavailable(
            "Failed to create catalog. Please try again later.",
            "connection reset",
        );
        let json = body_json(err.into_response()).await;
        assert_eq!(
            json["message"],
            "Failed to create catalog. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(response).await["message"], "Method not allowed");
    }
}
