//! Error types for the lifecycle layer.

use std::fmt;

use worldctl_session::SessionError;

/// Errors returned by [`LifecycleController`](crate::LifecycleController)
/// operations.
///
/// Partial failures (a map process that would not start, a stop that timed
/// out) are not errors: they are recorded in the session and reported in
/// [`WorldHandle`](crate::WorldHandle) / [`StopReport`](crate::StopReport).
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// A world with this name is already registered.
    #[error("world '{0}' already exists")]
    NameConflict(String),

    #[error("invalid world name: {0:?}")]
    InvalidName(String),

    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// The game server could not be started. The world was not kept.
    #[error("world '{world}' failed to start: {reason}")]
    SpawnFailure { world: String, reason: String },

    #[error("world '{0}' not found")]
    NotFound(String),

    /// A registry write the controller's own locking should have ruled out.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LifecycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NameConflict(_) => ErrorKind::NameConflict,
            Self::InvalidName(_) => ErrorKind::InvalidName,
            Self::InvalidPort(_) => ErrorKind::InvalidPort,
            Self::SpawnFailure { .. } => ErrorKind::SpawnFailure,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<SessionError> for LifecycleError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NameConflict(name) => Self::NameConflict(name),
            SessionError::NotFound(name) => Self::NotFound(name),
            SessionError::InvalidName(name) => Self::InvalidName(name),
            SessionError::InvalidPort(msg) => Self::InvalidPort(msg),
            other @ SessionError::InvalidTransition { .. } => Self::Internal(other.to_string()),
        }
    }
}

/// Machine-checkable error kind, rendered in snake_case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NameConflict,
    InvalidName,
    InvalidPort,
    SpawnFailure,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameConflict => "name_conflict",
            Self::InvalidName => "invalid_name",
            Self::InvalidPort => "invalid_port",
            Self::SpawnFailure => "spawn_failure",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
