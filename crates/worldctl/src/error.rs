//! Unified error type, and the HTTP error response.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use worldctl_lifecycle::{ErrorKind, LifecycleError};
use worldctl_process::ProcessError;
use worldctl_protocol::ErrorResponse;
use worldctl_session::SessionError;

use crate::config::ConfigError;
use crate::server::ServerError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` on each variant lets `?` convert sub-crate errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum WorldctlError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// An error returned from an HTTP handler.
///
/// Rendered as `{ "error": <message>, "kind": <kind> }` with a status code
/// chosen by kind.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The body was not the expected JSON.
    #[error("invalid request body: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Lifecycle(e) => match e.kind() {
                ErrorKind::NameConflict => StatusCode::CONFLICT,
                ErrorKind::InvalidName | ErrorKind::InvalidPort => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::SpawnFailure | ErrorKind::Internal => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lifecycle(e) => e.kind().as_str(),
            Self::BadRequest(_) => "invalid_request",
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::Lifecycle(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_error() {
        let err: WorldctlError = SessionError::NotFound("alpha".into()).into();
        assert!(matches!(err, WorldctlError::Session(_)));
        assert!(err.to_string().contains("alpha"));
    }

    #[test]
    fn test_from_lifecycle_error() {
        let err: WorldctlError = LifecycleError::NotFound("alpha".into()).into();
        assert!(matches!(err, WorldctlError::Lifecycle(_)));
    }

    #[test]
    fn test_api_error_status_by_kind() {
        let cases = [
            (LifecycleError::NameConflict("a".into()), StatusCode::CONFLICT),
            (LifecycleError::InvalidName("a b".into()), StatusCode::BAD_REQUEST),
            (LifecycleError::InvalidPort("0".into()), StatusCode::BAD_REQUEST),
            (LifecycleError::NotFound("a".into()), StatusCode::NOT_FOUND),
            (
                LifecycleError::SpawnFailure {
                    world: "a".into(),
                    reason: "timeout".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_api_error_from_session_error_keeps_kind() {
        let err = ApiError::from(SessionError::InvalidPort("70000 is outside 1-65535".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "invalid_port");
    }
}
