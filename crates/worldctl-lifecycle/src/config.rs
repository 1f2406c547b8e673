//! Controller timeouts.

use std::time::Duration;

/// Bounds on how long the controller waits for a sub-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// How long one sub-process may take to come up. Exceeding it is a
    /// spawn failure with reason `"timeout"`.
    pub spawn_timeout: Duration,

    /// How long one sub-process may take to stop. Exceeding it records the
    /// sub-process as `Failed("timeout")`; the world is still removed.
    pub stop_timeout: Duration,
}

impl ControllerConfig {
    pub fn with_spawn_timeout(mut self, timeout: Duration) -> Self {
        self.spawn_timeout = timeout;
        self
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            spawn_timeout: Duration::from_secs(60),
            stop_timeout: Duration::from_secs(30),
        }
    }
}
