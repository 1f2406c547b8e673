//! Operation outcomes handed back to callers.

use worldctl_process::ProcessKind;
use worldctl_session::WorldSession;

/// A world that was started, as it stood when `start` returned.
///
/// The game server is always active here. Map processes may have failed;
/// those failures are part of the message.
#[derive(Debug, Clone)]
pub struct WorldHandle {
    session: WorldSession,
}

impl WorldHandle {
    pub(crate) fn new(session: WorldSession) -> Self {
        Self { session }
    }

    pub fn name(&self) -> &str {
        self.session.name()
    }

    pub fn session(&self) -> &WorldSession {
        &self.session
    }

    /// `true` if every attempted sub-process came up.
    pub fn is_complete(&self) -> bool {
        self.session.failures().is_empty()
    }

    /// One human-readable line describing the start.
    pub fn message(&self) -> String {
        let failures = self.session.failures();
        if failures.is_empty() {
            return format!("World '{}' started successfully", self.name());
        }
        format!(
            "World '{}' started, but {}",
            self.name(),
            describe(failures.iter().map(|(kind, reason)| (*kind, *reason)))
        )
    }
}

/// What `stop` did to each sub-process.
///
/// A stop always removes the world; failures here are recorded, never
/// raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopReport {
    pub world: String,
    /// Sub-processes that reached `Stopped`, in shutdown order.
    pub stopped: Vec<ProcessKind>,
    /// Sub-processes whose stop failed, with the reason, in shutdown order.
    pub failures: Vec<(ProcessKind, String)>,
}

impl StopReport {
    pub(crate) fn new(world: &str) -> Self {
        Self {
            world: world.to_string(),
            stopped: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// One human-readable line describing the stop.
    pub fn message(&self) -> String {
        if self.is_clean() {
            return format!("World '{}' stopped successfully", self.world);
        }
        format!(
            "World '{}' stopped, but {}",
            self.world,
            describe(self.failures.iter().map(|(kind, reason)| (*kind, reason.as_str())))
        )
    }
}

fn describe<'a>(failures: impl Iterator<Item = (ProcessKind, &'a str)>) -> String {
    failures
        .map(|(kind, reason)| format!("{kind} failed: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use worldctl_session::{ProcessStatus, WorldConfig};

    use super::*;

    #[test]
    fn test_world_handle_message_clean_start() {
        let mut session = WorldSession::new(WorldConfig::new("alpha", 8080));
        session.game_server = ProcessStatus::Active;
        let handle = WorldHandle::new(session);
        assert!(handle.is_complete());
        assert_eq!(handle.message(), "World 'alpha' started successfully");
    }

    #[test]
    fn test_world_handle_message_names_failed_map_process() {
        let mut session = WorldSession::new(WorldConfig::new("beta", 8081).with_map_port(9001));
        session.game_server = ProcessStatus::Active;
        session.map_renderer = ProcessStatus::Failed("exited during startup".into());
        session.map_server = ProcessStatus::Active;
        let handle = WorldHandle::new(session);
        assert!(!handle.is_complete());
        assert_eq!(
            handle.message(),
            "World 'beta' started, but map renderer failed: exited during startup"
        );
    }

    #[test]
    fn test_stop_report_message() {
        let mut report = StopReport::new("gamma");
        report.stopped.push(ProcessKind::GameServer);
        assert_eq!(report.message(), "World 'gamma' stopped successfully");

        report.failures.push((ProcessKind::MapServer, "timeout".into()));
        assert!(!report.is_clean());
        assert_eq!(
            report.message(),
            "World 'gamma' stopped, but map server failed: timeout"
        );
    }
}
