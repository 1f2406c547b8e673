/// Errors that can occur while driving a sub-process.
///
/// The `Display` text of each variant is what ends up in a sub-process's
/// `Failed(reason)` status, so messages are kept short.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The process could not be launched at all.
    #[error("spawn failed: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process launched but exited during its startup grace period.
    #[error("exited during startup ({0})")]
    ExitedEarly(String),

    /// Stopping the process failed.
    #[error("stop failed: {0}")]
    Stop(#[source] std::io::Error),

    /// The operation did not finish within its timeout.
    #[error("timeout")]
    Timeout,

    /// `start` was called on a handle that is already running.
    #[error("process already running")]
    AlreadyRunning,

    /// The launch command could not be built for this world.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
