//! Session types: the record of one running world.
//!
//! A session tracks:
//! - WHAT the operator asked for (`WorldConfig`)
//! - WHERE each sub-process is in its lifecycle (`ProcessStatus` × 3)
//! - WHEN the world was admitted (`created_at`)

use std::fmt;

use chrono::{DateTime, Utc};
use worldctl_process::ProcessKind;

use crate::WorldConfig;

// ---------------------------------------------------------------------------
// ProcessStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of one sub-process.
///
/// ```text
///   Stopped ──→ Starting ──→ Active ──→ Stopping ──→ Stopped
///                  │           │  ╲         │
///                  ▼           ▼   ╲        ▼
///               Failed      Failed  ╲─→  Failed
/// ```
///
/// - **Starting** → **Stopping** is also allowed, for a stop that races a
///   spawn that never reported back.
/// - **Failed** is terminal for the lifetime of the session. A world is
///   restarted by stopping it and starting it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    Stopped,
    Starting,
    Active,
    Stopping,
    Failed(String),
}

impl ProcessStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// `true` for the states a stop has to act on.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Starting | Self::Active)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns `true` if moving to `target` follows the state machine.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Self::Stopped, Self::Starting)
                | (Self::Starting, Self::Active | Self::Stopping | Self::Failed(_))
                | (Self::Active, Self::Stopping | Self::Failed(_))
                | (Self::Stopping, Self::Stopped | Self::Failed(_))
        )
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Starting => write!(f, "starting"),
            Self::Active => write!(f, "active"),
            Self::Stopping => write!(f, "stopping"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

// ---------------------------------------------------------------------------
// WorldSession
// ---------------------------------------------------------------------------

/// The in-memory record of one world.
///
/// Owned by the [`SessionRegistry`](crate::SessionRegistry); everyone else
/// gets clones. Only the lifecycle controller changes statuses, through
/// [`SessionRegistry::set_status`](crate::SessionRegistry::set_status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSession {
    pub config: WorldConfig,
    pub game_server: ProcessStatus,
    pub map_renderer: ProcessStatus,
    pub map_server: ProcessStatus,
    pub created_at: DateTime<Utc>,
}

impl WorldSession {
    /// A freshly admitted session.
    ///
    /// The game server starts out `Starting`. The map processes are
    /// `Starting` too when a map port was given, and otherwise `Stopped`
    /// for good.
    pub fn new(config: WorldConfig) -> Self {
        let map_initial = if config.map_port.is_some() {
            ProcessStatus::Starting
        } else {
            ProcessStatus::Stopped
        };
        Self {
            config,
            game_server: ProcessStatus::Starting,
            map_renderer: map_initial.clone(),
            map_server: map_initial,
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn status(&self, kind: ProcessKind) -> &ProcessStatus {
        match kind {
            ProcessKind::GameServer => &self.game_server,
            ProcessKind::MapRenderer => &self.map_renderer,
            ProcessKind::MapServer => &self.map_server,
        }
    }

    pub(crate) fn status_mut(&mut self, kind: ProcessKind) -> &mut ProcessStatus {
        match kind {
            ProcessKind::GameServer => &mut self.game_server,
            ProcessKind::MapRenderer => &mut self.map_renderer,
            ProcessKind::MapServer => &mut self.map_server,
        }
    }

    /// Whether this world ever tries to run `kind`. Map processes are only
    /// attempted when a map port was supplied.
    pub fn attempted(&self, kind: ProcessKind) -> bool {
        !kind.requires_map_port() || self.config.map_port.is_some()
    }

    /// A world is active iff its game server is.
    pub fn is_active(&self) -> bool {
        self.game_server.is_active()
    }

    /// Failure reasons, in startup order.
    pub fn failures(&self) -> Vec<(ProcessKind, &str)> {
        ProcessKind::STARTUP_ORDER
            .into_iter()
            .filter_map(|kind| self.status(kind).failure_reason().map(|r| (kind, r)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_map_port_leaves_map_processes_stopped() {
        let session = WorldSession::new(WorldConfig::new("alpha", 8080));
        assert_eq!(session.game_server, ProcessStatus::Starting);
        assert_eq!(session.map_renderer, ProcessStatus::Stopped);
        assert_eq!(session.map_server, ProcessStatus::Stopped);
        assert!(!session.attempted(ProcessKind::MapRenderer));
        assert!(session.attempted(ProcessKind::GameServer));
    }

    #[test]
    fn test_new_with_map_port_starts_everything() {
        let session = WorldSession::new(WorldConfig::new("beta", 8081).with_map_port(9001));
        for kind in ProcessKind::STARTUP_ORDER {
            assert_eq!(session.status(kind), &ProcessStatus::Starting);
            assert!(session.attempted(kind));
        }
    }

    #[test]
    fn test_is_active_follows_game_server_only() {
        let mut session = WorldSession::new(WorldConfig::new("beta", 8081).with_map_port(9001));
        session.map_renderer = ProcessStatus::Active;
        assert!(!session.is_active());

        session.game_server = ProcessStatus::Active;
        session.map_renderer = ProcessStatus::Failed("boom".into());
        assert!(session.is_active());
    }

    #[test]
    fn test_failures_lists_failed_processes_in_startup_order() {
        let mut session = WorldSession::new(WorldConfig::new("beta", 8081).with_map_port(9001));
        session.map_server = ProcessStatus::Failed("timeout".into());
        session.map_renderer = ProcessStatus::Failed("exited".into());
        assert_eq!(
            session.failures(),
            vec![
                (ProcessKind::MapRenderer, "exited"),
                (ProcessKind::MapServer, "timeout"),
            ]
        );
    }

    #[test]
    fn test_transitions_follow_the_state_machine() {
        use ProcessStatus::*;
        let failed = Failed("x".into());

        assert!(Starting.can_transition_to(&Active));
        assert!(Starting.can_transition_to(&failed));
        assert!(Active.can_transition_to(&Stopping));
        assert!(Active.can_transition_to(&failed));
        assert!(Stopping.can_transition_to(&Stopped));
        assert!(Stopping.can_transition_to(&failed));

        // No skipping steps.
        assert!(!Stopped.can_transition_to(&Active));
        assert!(!Active.can_transition_to(&Stopped));
        // No going backwards.
        assert!(!Active.can_transition_to(&Starting));
        // Failed is terminal.
        assert!(!failed.can_transition_to(&Stopping));
        assert!(!failed.can_transition_to(&Stopped));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ProcessStatus::Active.to_string(), "active");
        assert_eq!(
            ProcessStatus::Failed("timeout".into()).to_string(),
            "failed (timeout)"
        );
    }
}
