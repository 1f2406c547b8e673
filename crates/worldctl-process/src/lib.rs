//! Process abstraction layer for worldctl.
//!
//! Provides the [`ProcessHandle`] and [`ProcessLauncher`] traits that the
//! lifecycle controller drives, so the controller never touches the OS
//! directly. Tests substitute scripted fakes; production uses the
//! [`CommandLauncher`] adapter.
//!
//! # Feature Flags
//!
//! - `command` (default): OS process adapter via `tokio::process`

mod error;
#[cfg(feature = "command")]
mod command;

pub use error::ProcessError;
#[cfg(feature = "command")]
pub use command::{CommandLauncher, CommandProcess, CommandTemplate, LauncherConfig};

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// The three sub-processes that make up one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProcessKind {
    GameServer,
    MapRenderer,
    MapServer,
}

impl ProcessKind {
    /// Startup order. The map renderer needs the game server's world data
    /// and the map server serves what the renderer produces.
    pub const STARTUP_ORDER: [ProcessKind; 3] =
        [Self::GameServer, Self::MapRenderer, Self::MapServer];

    /// Shutdown order: dependents first.
    pub const SHUTDOWN_ORDER: [ProcessKind; 3] =
        [Self::MapServer, Self::MapRenderer, Self::GameServer];

    /// Returns `true` for the sub-processes that only run when the world
    /// was started with a map port.
    pub fn requires_map_port(self) -> bool {
        matches!(self, Self::MapRenderer | Self::MapServer)
    }

    /// The snake_case key used on the wire (`game_server`, ...).
    pub fn as_key(self) -> &'static str {
        match self {
            Self::GameServer => "game_server",
            Self::MapRenderer => "map_renderer",
            Self::MapServer => "map_server",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameServer => write!(f, "game server"),
            Self::MapRenderer => write!(f, "map renderer"),
            Self::MapServer => write!(f, "map server"),
        }
    }
}

/// Everything a launcher needs to know to build one world's commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// The world name. Already validated to `[A-Za-z0-9_]`.
    pub world: String,
    /// Game server port.
    pub port: u16,
    /// Map server port, if mapping was requested.
    pub map_port: Option<u16>,
    /// Whether the game server runs with its auxiliary service enabled.
    pub service_enabled: bool,
}

/// One supervised sub-process.
///
/// The returned futures must be `Send`. Implementors may write `async fn`.
///
/// Callers wrap `start`/`stop` in their own timeout as well; the `timeout`
/// argument lets an implementation size its internal waits.
pub trait ProcessHandle: Send + Sync + 'static {
    /// Which sub-process this handle drives.
    fn kind(&self) -> ProcessKind;

    /// Launches the process. Returns once it is considered up.
    fn start(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), ProcessError>> + Send;

    /// Stops the process. Stopping a handle that never started, or whose
    /// process already exited, succeeds.
    fn stop(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), ProcessError>> + Send;

    /// Returns `true` while the process is running.
    fn is_alive(&mut self) -> impl Future<Output = bool> + Send;
}

/// Builds [`ProcessHandle`]s for a world.
///
/// `prepare` only builds the handle; nothing runs until
/// [`ProcessHandle::start`] is called.
pub trait ProcessLauncher: Send + Sync + 'static {
    /// The handle type produced by this launcher.
    type Handle: ProcessHandle;

    /// Builds an unstarted handle for `kind` in the world described by `spec`.
    fn prepare(
        &self,
        kind: ProcessKind,
        spec: &LaunchSpec,
    ) -> Result<Self::Handle, ProcessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_order_is_reverse_of_startup() {
        let mut reversed = ProcessKind::STARTUP_ORDER;
        reversed.reverse();
        assert_eq!(reversed, ProcessKind::SHUTDOWN_ORDER);
    }

    #[test]
    fn test_requires_map_port() {
        assert!(!ProcessKind::GameServer.requires_map_port());
        assert!(ProcessKind::MapRenderer.requires_map_port());
        assert!(ProcessKind::MapServer.requires_map_port());
    }

    #[test]
    fn test_process_kind_display_and_key() {
        assert_eq!(ProcessKind::MapRenderer.to_string(), "map renderer");
        assert_eq!(ProcessKind::MapServer.as_key(), "map_server");
    }

    #[test]
    fn test_timeout_error_renders_as_timeout() {
        // Controllers record this text verbatim as the failure reason.
        assert_eq!(ProcessError::Timeout.to_string(), "timeout");
    }
}
