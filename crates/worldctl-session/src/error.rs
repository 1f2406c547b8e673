//! Error types for the session layer.

use worldctl_process::ProcessKind;

use crate::ProcessStatus;

/// Errors that can occur while validating or registering world sessions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A session with this name is already registered.
    #[error("world '{0}' already exists")]
    NameConflict(String),

    /// No session is registered under this name.
    #[error("world '{0}' not found")]
    NotFound(String),

    /// The world name is empty, too long, or has characters outside
    /// `[A-Za-z0-9_]`.
    #[error("invalid world name: {0:?}")]
    InvalidName(String),

    /// A port is out of range, or the map port collides with the game port.
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// A status change that would skip or reverse a lifecycle step.
    #[error("world '{world}': {kind} cannot go from {from} to {to}")]
    InvalidTransition {
        world: String,
        kind: ProcessKind,
        from: ProcessStatus,
        to: ProcessStatus,
    },
}
